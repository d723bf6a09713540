//! Error types for task domain validation.

use serde_json::Value;
use std::fmt;
use thiserror::Error;

/// Part of an inbound request a violation refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViolationSource {
    /// Request body field.
    Body,
    /// Query string parameter.
    Query,
    /// Path segment.
    Path,
}

impl ViolationSource {
    /// Returns the location prefix used in error reports.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Body => "body",
            Self::Query => "query",
            Self::Path => "path",
        }
    }
}

/// Constraint broken by a field value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViolationRule {
    /// String shorter than the minimum character count.
    TooShort {
        /// Minimum number of characters.
        min: usize,
    },
    /// String longer than the maximum character count.
    TooLong {
        /// Maximum number of characters.
        max: usize,
    },
    /// Number below the inclusive lower bound.
    BelowMinimum {
        /// Inclusive lower bound.
        min: i64,
    },
    /// Number above the inclusive upper bound.
    AboveMaximum {
        /// Inclusive upper bound.
        max: i64,
    },
    /// Required field was not supplied.
    Missing,
    /// Non-nullable field was supplied as `null`.
    Null,
    /// Value could not be decoded at all.
    Malformed,
}

impl ViolationRule {
    /// Returns the machine-readable rule identifier.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::TooShort { .. } => "string_too_short",
            Self::TooLong { .. } => "string_too_long",
            Self::BelowMinimum { .. } => "greater_than_equal",
            Self::AboveMaximum { .. } => "less_than_equal",
            Self::Missing => "missing",
            Self::Null => "string_type",
            Self::Malformed => "value_error",
        }
    }

    fn message(self) -> String {
        match self {
            Self::TooShort { min: 1 } => "String should have at least 1 character".to_owned(),
            Self::TooShort { min } => format!("String should have at least {min} characters"),
            Self::TooLong { max } => format!("String should have at most {max} characters"),
            Self::BelowMinimum { min } => {
                format!("Input should be greater than or equal to {min}")
            }
            Self::AboveMaximum { max } => format!("Input should be less than or equal to {max}"),
            Self::Missing => "Field required".to_owned(),
            Self::Null => "Input should be a valid string".to_owned(),
            Self::Malformed => "Input could not be parsed".to_owned(),
        }
    }
}

/// A single broken field constraint.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldViolation {
    source: ViolationSource,
    field: String,
    rule: ViolationRule,
    message: String,
    input: Value,
}

impl FieldViolation {
    /// Creates a violation with the rule's default message.
    #[must_use]
    pub fn new(
        source: ViolationSource,
        field: impl Into<String>,
        rule: ViolationRule,
        input: Value,
    ) -> Self {
        Self {
            source,
            field: field.into(),
            rule,
            message: rule.message(),
            input,
        }
    }

    /// Creates a violation for a value that could not be decoded.
    #[must_use]
    pub fn malformed(
        source: ViolationSource,
        field: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            source,
            field: field.into(),
            rule: ViolationRule::Malformed,
            message: message.into(),
            input: Value::Null,
        }
    }

    /// Returns the request part the violation refers to.
    #[must_use]
    pub const fn source(&self) -> ViolationSource {
        self.source
    }

    /// Returns the offending field name.
    #[must_use]
    pub fn field(&self) -> &str {
        &self.field
    }

    /// Returns the broken rule.
    #[must_use]
    pub const fn rule(&self) -> ViolationRule {
        self.rule
    }

    /// Returns the human-readable message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the rejected input value.
    #[must_use]
    pub const fn input(&self) -> &Value {
        &self.input
    }
}

impl fmt::Display for FieldViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{}: {} ({})",
            self.source.as_str(),
            self.field,
            self.message,
            self.rule.code()
        )
    }
}

/// Every constraint violation found in one piece of input.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("invalid task input: {}", format_violations(.violations))]
pub struct TaskValidationError {
    violations: Vec<FieldViolation>,
}

impl TaskValidationError {
    /// Wraps a collected set of violations.
    #[must_use]
    pub const fn new(violations: Vec<FieldViolation>) -> Self {
        Self { violations }
    }

    /// Returns the violations in the order they were found.
    #[must_use]
    pub fn violations(&self) -> &[FieldViolation] {
        &self.violations
    }

    /// Returns `true` when a violation names the given field.
    #[must_use]
    pub fn has_field(&self, field: &str) -> bool {
        self.violations.iter().any(|v| v.field() == field)
    }
}

fn format_violations(violations: &[FieldViolation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
