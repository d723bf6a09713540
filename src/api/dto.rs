//! Wire shapes for task requests and responses.

use crate::task::{
    domain::{DEFAULT_LIMIT, DEFAULT_SKIP, ExternalId, FieldUpdate, Task, TaskInput, TaskPatch},
    services::{CreateTaskRequest, ListTasksRequest, TaskListing},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Body of `POST /api/v1/tasks/`.
///
/// Presence of `title`, `status` and `priority` is kept so a missing or
/// `null` value is reported alongside every other violation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CreateTaskBody {
    /// Task title; required.
    pub title: FieldUpdate<Option<String>>,
    /// Optional description.
    pub description: Option<String>,
    /// Workflow status; defaults when absent.
    pub status: FieldUpdate<Option<String>>,
    /// Priority label; defaults when absent.
    pub priority: FieldUpdate<Option<String>>,
    /// Remote resource to enrich from.
    pub external_id: Option<i64>,
    /// Owner tag.
    pub user_id: Option<String>,
}

impl From<CreateTaskBody> for CreateTaskRequest {
    fn from(body: CreateTaskBody) -> Self {
        Self::from(TaskInput {
            title: body.title,
            description: body.description,
            status: body.status,
            priority: body.priority,
            user_id: body.user_id,
            external_id: body.external_id.map(ExternalId::new),
        })
    }
}

/// Body of `PUT /api/v1/tasks/{id}`; every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct UpdateTaskBody {
    /// New title.
    pub title: FieldUpdate<String>,
    /// New description; `null` clears it.
    pub description: FieldUpdate<Option<String>>,
    /// New status.
    pub status: FieldUpdate<String>,
    /// New priority.
    pub priority: FieldUpdate<String>,
    /// New owner tag; `null` clears it.
    pub user_id: FieldUpdate<Option<String>>,
    /// New completion time; `null` clears it.
    pub completed_at: FieldUpdate<Option<DateTime<Utc>>>,
}

impl From<UpdateTaskBody> for TaskPatch {
    fn from(body: UpdateTaskBody) -> Self {
        Self {
            title: body.title,
            description: body.description,
            status: body.status,
            priority: body.priority,
            user_id: body.user_id,
            completed_at: body.completed_at,
        }
    }
}

/// Query string of `GET /api/v1/tasks/`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ListTasksParams {
    /// Records to skip.
    pub skip: Option<i64>,
    /// Page size.
    pub limit: Option<i64>,
    /// Exact status match.
    pub status_filter: Option<String>,
    /// Exact priority match.
    pub priority_filter: Option<String>,
}

impl From<ListTasksParams> for ListTasksRequest {
    fn from(params: ListTasksParams) -> Self {
        let mut request = Self::new(
            params.skip.unwrap_or(DEFAULT_SKIP),
            params.limit.unwrap_or(DEFAULT_LIMIT),
        );
        if let Some(status) = params.status_filter {
            request = request.with_status(status);
        }
        if let Some(priority) = params.priority_filter {
            request = request.with_priority(priority);
        }
        request
    }
}

/// Task as returned to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskResponse {
    /// Identifier.
    pub id: i64,
    /// Title.
    pub title: String,
    /// Description.
    pub description: Option<String>,
    /// Workflow status.
    pub status: String,
    /// Priority label.
    pub priority: String,
    /// Remote resource identifier.
    pub external_id: Option<i64>,
    /// Enrichment snapshot as a JSON string.
    pub external_api_data: Option<String>,
    /// Owner tag.
    pub user_id: Option<String>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Latest update time.
    pub updated_at: DateTime<Utc>,
    /// Completion time.
    pub completed_at: Option<DateTime<Utc>>,
}

impl From<&Task> for TaskResponse {
    fn from(task: &Task) -> Self {
        Self {
            id: task.id().value(),
            title: task.title().to_owned(),
            description: task.description().map(str::to_owned),
            status: task.status().to_owned(),
            priority: task.priority().to_owned(),
            external_id: task.external_id().map(ExternalId::value),
            external_api_data: task.external_api_data().map(str::to_owned),
            user_id: task.user_id().map(str::to_owned),
            created_at: task.created_at(),
            updated_at: task.updated_at(),
            completed_at: task.completed_at(),
        }
    }
}

/// One page of tasks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskListResponse {
    /// Tasks on this page.
    pub tasks: Vec<TaskResponse>,
    /// Matching tasks before pagination.
    pub total: u64,
    /// One-based page number.
    pub page: i64,
    /// Page size.
    pub size: i64,
}

impl From<TaskListing> for TaskListResponse {
    fn from(listing: TaskListing) -> Self {
        Self {
            tasks: listing.tasks.iter().map(TaskResponse::from).collect(),
            total: listing.total,
            page: listing.page,
            size: listing.size,
        }
    }
}
