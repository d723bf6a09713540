//! Service layer for task creation, retrieval, update, deletion, and listing.

use crate::task::{
    domain::{
        DEFAULT_LIMIT, DEFAULT_SKIP, ExternalId, FieldUpdate, NewTask, PageRequest, Task,
        TaskFilter, TaskId, TaskInput, TaskPatch, TaskQuery, TaskValidationError,
    },
    ports::{EnrichmentClient, TaskRepository, TaskRepositoryError},
};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info, warn};

/// Request payload for creating a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateTaskRequest {
    input: TaskInput,
}

impl CreateTaskRequest {
    /// Creates a request with the required title and default status and
    /// priority.
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            input: TaskInput {
                title: FieldUpdate::Set(Some(title.into())),
                ..TaskInput::default()
            },
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.input.description = Some(description.into());
        self
    }

    /// Sets the status.
    #[must_use]
    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.input.status = FieldUpdate::Set(Some(status.into()));
        self
    }

    /// Sets the priority.
    #[must_use]
    pub fn with_priority(mut self, priority: impl Into<String>) -> Self {
        self.input.priority = FieldUpdate::Set(Some(priority.into()));
        self
    }

    /// Sets the owner tag.
    #[must_use]
    pub fn with_user_id(mut self, user_id: impl Into<String>) -> Self {
        self.input.user_id = Some(user_id.into());
        self
    }

    /// Requests enrichment from the given remote resource.
    #[must_use]
    pub const fn with_external_id(mut self, external_id: ExternalId) -> Self {
        self.input.external_id = Some(external_id);
        self
    }
}

impl From<TaskInput> for CreateTaskRequest {
    fn from(input: TaskInput) -> Self {
        Self { input }
    }
}

/// Request parameters for listing tasks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListTasksRequest {
    skip: i64,
    limit: i64,
    status: Option<String>,
    priority: Option<String>,
}

impl ListTasksRequest {
    /// Creates an unfiltered request for the given window.
    #[must_use]
    pub const fn new(skip: i64, limit: i64) -> Self {
        Self {
            skip,
            limit,
            status: None,
            priority: None,
        }
    }

    /// Restricts results to tasks with this status.
    #[must_use]
    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    /// Restricts results to tasks with this priority.
    #[must_use]
    pub fn with_priority(mut self, priority: impl Into<String>) -> Self {
        self.priority = Some(priority.into());
        self
    }
}

impl Default for ListTasksRequest {
    fn default() -> Self {
        Self::new(DEFAULT_SKIP, DEFAULT_LIMIT)
    }
}

/// One page of tasks with pagination metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskListing {
    /// Tasks on this page, ordered by identifier.
    pub tasks: Vec<Task>,
    /// Number of tasks matching the filters before pagination.
    pub total: u64,
    /// One-based page number.
    pub page: i64,
    /// Requested page size.
    pub size: i64,
}

/// Service-level errors for task lifecycle operations.
#[derive(Debug, Error)]
pub enum TaskLifecycleError {
    /// Input validation failed.
    #[error(transparent)]
    Validation(#[from] TaskValidationError),
    /// No task exists with the given identifier.
    #[error("Task with ID {0} not found")]
    NotFound(TaskId),
    /// Repository operation failed.
    #[error(transparent)]
    Repository(TaskRepositoryError),
}

impl From<TaskRepositoryError> for TaskLifecycleError {
    fn from(err: TaskRepositoryError) -> Self {
        match err {
            TaskRepositoryError::NotFound(id) => Self::NotFound(id),
            TaskRepositoryError::Persistence(_) => Self::Repository(err),
        }
    }
}

/// Result type for task lifecycle service operations.
pub type TaskLifecycleResult<T> = Result<T, TaskLifecycleError>;

/// Task lifecycle orchestration service.
#[derive(Clone)]
pub struct TaskLifecycleService<R, E, C>
where
    R: TaskRepository,
    E: EnrichmentClient,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    enrichment: Arc<E>,
    clock: Arc<C>,
}

impl<R, E, C> TaskLifecycleService<R, E, C>
where
    R: TaskRepository,
    E: EnrichmentClient,
    C: Clock + Send + Sync,
{
    /// Creates a new task lifecycle service.
    #[must_use]
    pub const fn new(repository: Arc<R>, enrichment: Arc<E>, clock: Arc<C>) -> Self {
        Self {
            repository,
            enrichment,
            clock,
        }
    }

    async fn find_task_or_error(
        &self,
        operation: &'static str,
        id: TaskId,
    ) -> TaskLifecycleResult<Task> {
        self.repository
            .find_by_id(id)
            .await
            .map_err(TaskLifecycleError::from)
            .and_then(|found| found.ok_or(TaskLifecycleError::NotFound(id)))
            .inspect_err(|err| log_failure(operation, Some(id), err))
    }

    /// Creates a task, enriching it from the remote system when an external
    /// identifier is supplied.
    ///
    /// Enrichment failures are logged and leave `external_api_data` unset;
    /// they never fail creation.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Validation`] listing every invalid field,
    /// or [`TaskLifecycleError::Repository`] when persistence fails.
    pub async fn create(&self, request: CreateTaskRequest) -> TaskLifecycleResult<Task> {
        let external_id = request.input.external_id;
        let mut new_task = request
            .input
            .into_draft()
            .and_then(|draft| NewTask::new(draft, &*self.clock))
            .map_err(TaskLifecycleError::from)
            .inspect_err(|err| log_failure("create_task", None, err))?;

        if let Some(id) = external_id
            && let Some(snapshot) = self.fetch_snapshot(id).await
        {
            new_task = new_task.with_external_api_data(snapshot);
        }

        let task = self
            .repository
            .insert(new_task)
            .await
            .map_err(TaskLifecycleError::from)
            .inspect_err(|err| log_failure("create_task", None, err))?;
        info!(operation = "create_task", task_id = %task.id(), "created task");
        Ok(task)
    }

    async fn fetch_snapshot(&self, external_id: ExternalId) -> Option<String> {
        let payload = match self.enrichment.fetch_external_data(external_id).await {
            Ok(payload) => payload,
            Err(err) => {
                warn!(
                    operation = "create_task",
                    external_id = %external_id,
                    status = err.status_code(),
                    error = %err,
                    "failed to fetch external data; creating task without it"
                );
                return None;
            }
        };
        serde_json::to_string(&payload)
            .inspect_err(|err| {
                warn!(
                    operation = "create_task",
                    external_id = %external_id,
                    error = %err,
                    "failed to serialize external data; creating task without it"
                );
            })
            .ok()
    }

    /// Retrieves a task by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::NotFound`] when the task does not exist.
    pub async fn get(&self, id: TaskId) -> TaskLifecycleResult<Task> {
        let task = self.find_task_or_error("get_task", id).await?;
        info!(operation = "get_task", task_id = %id, "retrieved task");
        Ok(task)
    }

    /// Applies a partial update to a task.
    ///
    /// Only supplied fields change; `updated_at` always advances.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::NotFound`] when the task does not exist,
    /// [`TaskLifecycleError::Validation`] when a supplied field is invalid, or
    /// [`TaskLifecycleError::Repository`] when persistence fails.
    pub async fn update(&self, id: TaskId, patch: TaskPatch) -> TaskLifecycleResult<Task> {
        let task = self.find_task_or_error("update_task", id).await?;
        let changes = task
            .prepare_update(patch, &*self.clock)
            .map_err(TaskLifecycleError::from)
            .inspect_err(|err| log_failure("update_task", Some(id), err))?;
        let updated = self
            .repository
            .update(id, &changes)
            .await
            .map_err(TaskLifecycleError::from)
            .inspect_err(|err| log_failure("update_task", Some(id), err))?;
        info!(operation = "update_task", task_id = %id, "updated task");
        Ok(updated)
    }

    /// Permanently deletes a task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::NotFound`] when the task does not exist.
    pub async fn delete(&self, id: TaskId) -> TaskLifecycleResult<()> {
        self.repository
            .delete(id)
            .await
            .map_err(TaskLifecycleError::from)
            .inspect_err(|err| log_failure("delete_task", Some(id), err))?;
        info!(operation = "delete_task", task_id = %id, "deleted task");
        Ok(())
    }

    /// Lists tasks matching the optional filters, one page at a time.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Validation`] when `skip` or `limit` is out
    /// of range, or [`TaskLifecycleError::Repository`] when the query fails.
    pub async fn list(&self, request: ListTasksRequest) -> TaskLifecycleResult<TaskListing> {
        let page = PageRequest::new(request.skip, request.limit)
            .map_err(TaskLifecycleError::from)
            .inspect_err(|err| log_failure("list_tasks", None, err))?;
        let query = TaskQuery {
            filter: TaskFilter::new(request.status, request.priority),
            page,
        };
        let result = self
            .repository
            .query(&query)
            .await
            .map_err(TaskLifecycleError::from)
            .inspect_err(|err| log_failure("list_tasks", None, err))?;
        info!(
            operation = "list_tasks",
            returned = result.tasks.len(),
            total = result.total,
            "listed tasks"
        );
        Ok(TaskListing {
            tasks: result.tasks,
            total: result.total,
            page: page.page(),
            size: page.limit(),
        })
    }
}

/// Logs a failed operation; caller mistakes at `warn`, storage faults at
/// `error`.
fn log_failure(operation: &'static str, id: Option<TaskId>, err: &TaskLifecycleError) {
    let task_id = id.map(TaskId::value);
    match err {
        TaskLifecycleError::Validation(validation) => warn!(
            operation,
            task_id,
            violations = validation.violations().len(),
            "rejected task input"
        ),
        TaskLifecycleError::NotFound(_) => warn!(operation, task_id, "task not found"),
        TaskLifecycleError::Repository(cause) => error!(
            operation,
            task_id,
            error = %cause,
            "task storage failed"
        ),
    }
}
