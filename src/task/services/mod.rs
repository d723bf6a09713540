//! Application services for task lifecycle orchestration.

mod lifecycle;

pub use lifecycle::{
    CreateTaskRequest, ListTasksRequest, TaskLifecycleError, TaskLifecycleResult,
    TaskLifecycleService, TaskListing,
};
