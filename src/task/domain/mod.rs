//! Domain model for task lifecycle management.
//!
//! The task domain owns field limits, validation, and the partial-update
//! merge while keeping all infrastructure concerns outside of the domain
//! boundary.

mod error;
mod ids;
mod patch;
mod query;
mod task;
mod validation;

pub use error::{FieldViolation, TaskValidationError, ViolationRule, ViolationSource};
pub use ids::{ExternalId, TaskId};
pub use patch::{FieldUpdate, TaskPatch};
pub use query::{DEFAULT_LIMIT, DEFAULT_SKIP, MAX_LIMIT, PageRequest, TaskFilter, TaskPage, TaskQuery};
pub use task::{NewTask, PersistedTaskData, Task, TaskChanges, TaskDraft, TaskInput};
pub use validation::{
    DEFAULT_PRIORITY, DEFAULT_STATUS, DESCRIPTION_MAX_CHARS, PRIORITY_MAX_CHARS, STATUS_MAX_CHARS,
    TITLE_MAX_CHARS, USER_ID_MAX_CHARS,
};
