//! Request handlers for the task resource and root and health endpoints.

use super::{
    dto::{CreateTaskBody, ListTasksParams, TaskListResponse, TaskResponse, UpdateTaskBody},
    error::ApiError,
};
use crate::task::{
    domain::TaskId,
    ports::{EnrichmentClient, TaskRepository},
    services::TaskLifecycleService,
};
use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    http::StatusCode,
};
use mockable::Clock;
use serde_json::{Value, json};
use std::sync::Arc;

/// Name reported by the root and health endpoints.
pub const SERVICE_NAME: &str = "ShowBay Task Management API";

/// Shared handler state.
pub struct AppState<R, E, C>
where
    R: TaskRepository,
    E: EnrichmentClient,
    C: Clock + Send + Sync,
{
    service: Arc<TaskLifecycleService<R, E, C>>,
}

impl<R, E, C> AppState<R, E, C>
where
    R: TaskRepository,
    E: EnrichmentClient,
    C: Clock + Send + Sync,
{
    /// Wraps the lifecycle service for the router.
    #[must_use]
    pub const fn new(service: Arc<TaskLifecycleService<R, E, C>>) -> Self {
        Self { service }
    }
}

impl<R, E, C> Clone for AppState<R, E, C>
where
    R: TaskRepository,
    E: EnrichmentClient,
    C: Clock + Send + Sync,
{
    fn clone(&self) -> Self {
        Self {
            service: Arc::clone(&self.service),
        }
    }
}

type ApiResult<T> = Result<T, ApiError>;

pub(super) async fn root() -> Json<Value> {
    Json(json!({ "message": format!("{SERVICE_NAME} is running!") }))
}

pub(super) async fn health() -> Json<Value> {
    Json(json!({ "status": "healthy", "service": SERVICE_NAME }))
}

pub(super) async fn create_task<R, E, C>(
    State(state): State<AppState<R, E, C>>,
    body: Result<Json<CreateTaskBody>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<TaskResponse>)>
where
    R: TaskRepository,
    E: EnrichmentClient,
    C: Clock + Send + Sync,
{
    let Json(body) = body?;
    let task = state.service.create(body.into()).await?;
    Ok((StatusCode::CREATED, Json(TaskResponse::from(&task))))
}

pub(super) async fn get_task<R, E, C>(
    State(state): State<AppState<R, E, C>>,
    id: Result<Path<i64>, PathRejection>,
) -> ApiResult<Json<TaskResponse>>
where
    R: TaskRepository,
    E: EnrichmentClient,
    C: Clock + Send + Sync,
{
    let Path(id) = id?;
    let task = state.service.get(TaskId::new(id)).await?;
    Ok(Json(TaskResponse::from(&task)))
}

pub(super) async fn update_task<R, E, C>(
    State(state): State<AppState<R, E, C>>,
    id: Result<Path<i64>, PathRejection>,
    body: Result<Json<UpdateTaskBody>, JsonRejection>,
) -> ApiResult<Json<TaskResponse>>
where
    R: TaskRepository,
    E: EnrichmentClient,
    C: Clock + Send + Sync,
{
    let Path(id) = id?;
    let Json(body) = body?;
    let task = state.service.update(TaskId::new(id), body.into()).await?;
    Ok(Json(TaskResponse::from(&task)))
}

pub(super) async fn delete_task<R, E, C>(
    State(state): State<AppState<R, E, C>>,
    id: Result<Path<i64>, PathRejection>,
) -> ApiResult<StatusCode>
where
    R: TaskRepository,
    E: EnrichmentClient,
    C: Clock + Send + Sync,
{
    let Path(id) = id?;
    state.service.delete(TaskId::new(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub(super) async fn list_tasks<R, E, C>(
    State(state): State<AppState<R, E, C>>,
    params: Result<Query<ListTasksParams>, QueryRejection>,
) -> ApiResult<Json<TaskListResponse>>
where
    R: TaskRepository,
    E: EnrichmentClient,
    C: Clock + Send + Sync,
{
    let Query(params) = params?;
    let listing = state.service.list(params.into()).await?;
    Ok(Json(TaskListResponse::from(listing)))
}
