//! Partial task updates with explicit field presence.

use super::validation::{
    DESCRIPTION_MAX_CHARS, PRIORITY_MAX_CHARS, STATUS_MAX_CHARS, TITLE_MAX_CHARS,
    USER_ID_MAX_CHARS, Violations,
};
use super::{TaskValidationError, ViolationSource};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer};

/// Whether an update supplies a field.
///
/// Presence is tracked separately from nullability: `Set(None)` on a nullable
/// field clears it, while `Unchanged` leaves the stored value alone. When
/// deserialized with `#[serde(default)]`, a missing key yields `Unchanged` and
/// any present value (including `null`) yields `Set`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FieldUpdate<T> {
    /// The field was not supplied.
    #[default]
    Unchanged,
    /// The field was supplied with this value.
    Set(T),
}

impl<T> FieldUpdate<T> {
    /// Returns `true` when the field was supplied.
    #[must_use]
    pub const fn is_set(&self) -> bool {
        matches!(self, Self::Set(_))
    }

    /// Returns the supplied value, if any.
    #[must_use]
    pub const fn as_set(&self) -> Option<&T> {
        match self {
            Self::Set(value) => Some(value),
            Self::Unchanged => None,
        }
    }

    /// Overwrites `target` when the field was supplied.
    pub fn apply_to(self, target: &mut T) {
        if let Self::Set(value) = self {
            *target = value;
        }
    }
}

impl<'de, T> Deserialize<'de> for FieldUpdate<T>
where
    T: Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        T::deserialize(deserializer).map(Self::Set)
    }
}

/// Field-by-field changes to an existing task.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskPatch {
    /// New title.
    pub title: FieldUpdate<String>,
    /// New description; `Set(None)` clears it.
    pub description: FieldUpdate<Option<String>>,
    /// New status.
    pub status: FieldUpdate<String>,
    /// New priority.
    pub priority: FieldUpdate<String>,
    /// New owner tag; `Set(None)` clears it.
    pub user_id: FieldUpdate<Option<String>>,
    /// New completion timestamp; `Set(None)` clears it.
    pub completed_at: FieldUpdate<Option<DateTime<Utc>>>,
}

impl TaskPatch {
    /// Returns `true` when no field is supplied.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        !(self.title.is_set()
            || self.description.is_set()
            || self.status.is_set()
            || self.priority.is_set()
            || self.user_id.is_set()
            || self.completed_at.is_set())
    }

    /// Checks every supplied field against the task field limits.
    ///
    /// # Errors
    ///
    /// Returns [`TaskValidationError`] listing every supplied field that
    /// breaks a limit.
    pub fn validate(&self) -> Result<(), TaskValidationError> {
        let mut violations = Violations::new(ViolationSource::Body);
        if let Some(title) = self.title.as_set() {
            violations.check_length("title", title, 1, TITLE_MAX_CHARS);
        }
        if let Some(description) = self.description.as_set() {
            violations.check_optional_length(
                "description",
                description.as_deref(),
                DESCRIPTION_MAX_CHARS,
            );
        }
        if let Some(status) = self.status.as_set() {
            violations.check_length("status", status, 0, STATUS_MAX_CHARS);
        }
        if let Some(priority) = self.priority.as_set() {
            violations.check_length("priority", priority, 0, PRIORITY_MAX_CHARS);
        }
        if let Some(user_id) = self.user_id.as_set() {
            violations.check_optional_length("user_id", user_id.as_deref(), USER_ID_MAX_CHARS);
        }
        violations.finish()
    }
}
