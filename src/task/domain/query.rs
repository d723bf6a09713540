//! Filtered, paginated task queries.

use super::validation::Violations;
use super::{Task, TaskValidationError, ViolationSource};

/// Records skipped when the caller supplies no offset.
pub const DEFAULT_SKIP: i64 = 0;
/// Page size used when the caller supplies none.
pub const DEFAULT_LIMIT: i64 = 10;
/// Largest page size a caller may request.
pub const MAX_LIMIT: i64 = 100;

/// Validated offset and page size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    skip: i64,
    limit: i64,
}

impl PageRequest {
    /// Validates `skip >= 0` and `1 <= limit <= 100`.
    ///
    /// # Errors
    ///
    /// Returns [`TaskValidationError`] with a query violation for each
    /// out-of-range value.
    pub fn new(skip: i64, limit: i64) -> Result<Self, TaskValidationError> {
        let mut violations = Violations::new(ViolationSource::Query);
        violations.check_range("skip", skip, 0, None);
        violations.check_range("limit", limit, 1, Some(MAX_LIMIT));
        violations.finish()?;
        Ok(Self { skip, limit })
    }

    /// Returns the number of matching records to skip.
    #[must_use]
    pub const fn skip(self) -> i64 {
        self.skip
    }

    /// Returns the maximum number of records on the page.
    #[must_use]
    pub const fn limit(self) -> i64 {
        self.limit
    }

    /// Returns the one-based page number, `skip / limit + 1`, saturating at
    /// `i64::MAX`.
    #[must_use]
    pub fn page(self) -> i64 {
        self.skip
            .checked_div(self.limit)
            .unwrap_or_default()
            .saturating_add(1)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            skip: DEFAULT_SKIP,
            limit: DEFAULT_LIMIT,
        }
    }
}

/// Equality filters combined with AND.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskFilter {
    status: Option<String>,
    priority: Option<String>,
}

impl TaskFilter {
    /// Creates a filter; empty strings are treated as absent.
    #[must_use]
    pub fn new(status: Option<String>, priority: Option<String>) -> Self {
        Self {
            status: status.filter(|value| !value.is_empty()),
            priority: priority.filter(|value| !value.is_empty()),
        }
    }

    /// Returns the required status, if any.
    #[must_use]
    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    /// Returns the required priority, if any.
    #[must_use]
    pub fn priority(&self) -> Option<&str> {
        self.priority.as_deref()
    }

    /// Returns `true` when the task satisfies every filter.
    #[must_use]
    pub fn matches(&self, task: &Task) -> bool {
        self.status().is_none_or(|status| task.status() == status)
            && self.priority().is_none_or(|priority| task.priority() == priority)
    }
}

/// A filter plus the page to return.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskQuery {
    /// Equality filters.
    pub filter: TaskFilter,
    /// Offset and page size.
    pub page: PageRequest,
}

/// One page of matching tasks, ordered by ascending identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskPage {
    /// Tasks on this page.
    pub tasks: Vec<Task>,
    /// Number of matching tasks before pagination.
    pub total: u64,
}
