//! Field limits and the violation collector shared by task inputs.

use super::{FieldUpdate, FieldViolation, TaskValidationError, ViolationRule, ViolationSource};
use serde_json::Value;

/// Maximum characters in a task title.
pub const TITLE_MAX_CHARS: usize = 255;
/// Maximum characters in a task description.
pub const DESCRIPTION_MAX_CHARS: usize = 1000;
/// Maximum characters in a task status.
pub const STATUS_MAX_CHARS: usize = 50;
/// Maximum characters in a task priority.
pub const PRIORITY_MAX_CHARS: usize = 20;
/// Maximum characters in an owner tag.
pub const USER_ID_MAX_CHARS: usize = 100;

/// Status assigned when the caller supplies none.
pub const DEFAULT_STATUS: &str = "pending";
/// Priority assigned when the caller supplies none.
pub const DEFAULT_PRIORITY: &str = "medium";

/// Accumulates violations so callers see every problem at once.
#[derive(Debug)]
pub(crate) struct Violations {
    source: ViolationSource,
    found: Vec<FieldViolation>,
}

impl Violations {
    pub(crate) const fn new(source: ViolationSource) -> Self {
        Self {
            source,
            found: Vec::new(),
        }
    }

    /// Checks a string against an inclusive character-count range.
    pub(crate) fn check_length(&mut self, field: &str, value: &str, min: usize, max: usize) {
        let length = value.chars().count();
        let rule = if length < min {
            ViolationRule::TooShort { min }
        } else if length > max {
            ViolationRule::TooLong { max }
        } else {
            return;
        };
        self.push(field, rule, Value::String(value.to_owned()));
    }

    pub(crate) fn check_optional_length(&mut self, field: &str, value: Option<&str>, max: usize) {
        if let Some(text) = value {
            self.check_length(field, text, 0, max);
        }
    }

    /// Unwraps a required, non-nullable field, recording its absence or a
    /// `null`.
    pub(crate) fn require(
        &mut self,
        field: &str,
        value: FieldUpdate<Option<String>>,
    ) -> Option<String> {
        match value {
            FieldUpdate::Set(Some(text)) => Some(text),
            FieldUpdate::Set(None) => {
                self.push(field, ViolationRule::Null, Value::Null);
                None
            }
            FieldUpdate::Unchanged => {
                self.push(field, ViolationRule::Missing, Value::Null);
                None
            }
        }
    }

    /// Like [`Self::require`], but an absent field takes `default`.
    pub(crate) fn non_null_or(
        &mut self,
        field: &str,
        value: FieldUpdate<Option<String>>,
        default: &str,
    ) -> Option<String> {
        match value {
            FieldUpdate::Unchanged => Some(default.to_owned()),
            supplied => self.require(field, supplied),
        }
    }

    /// Checks an integer against an inclusive range.
    pub(crate) fn check_range(&mut self, field: &str, value: i64, min: i64, max: Option<i64>) {
        if value < min {
            self.push(field, ViolationRule::BelowMinimum { min }, Value::from(value));
        } else if let Some(upper) = max
            && value > upper
        {
            self.push(field, ViolationRule::AboveMaximum { max: upper }, Value::from(value));
        }
    }

    fn push(&mut self, field: &str, rule: ViolationRule, input: Value) {
        self.found
            .push(FieldViolation::new(self.source, field, rule, input));
    }

    pub(crate) fn finish(self) -> Result<(), TaskValidationError> {
        if self.found.is_empty() {
            Ok(())
        } else {
            Err(TaskValidationError::new(self.found))
        }
    }
}
