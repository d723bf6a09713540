//! HTTP surface of the task service.
//!
//! [`router`] maps each route to one lifecycle operation; [`error::ApiError`]
//! turns every failure into the `{"detail", "error_code"}` body.

pub mod dto;
pub mod error;
mod handlers;

pub use error::ApiError;
pub use handlers::{AppState, SERVICE_NAME};

use crate::task::{
    ports::{EnrichmentClient, TaskRepository},
    services::TaskLifecycleService,
};
use axum::{Router, routing::get};
use mockable::Clock;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// Prefix shared by every task route.
pub const TASKS_PATH: &str = "/api/v1/tasks";

/// Builds the application router around a lifecycle service.
///
/// The collection is reachable with and without a trailing slash. Every
/// origin is allowed.
#[must_use]
pub fn router<R, E, C>(service: Arc<TaskLifecycleService<R, E, C>>) -> Router
where
    R: TaskRepository + 'static,
    E: EnrichmentClient + 'static,
    C: Clock + Send + Sync + 'static,
{
    let collection = get(handlers::list_tasks::<R, E, C>).post(handlers::create_task::<R, E, C>);
    let item = get(handlers::get_task::<R, E, C>)
        .put(handlers::update_task::<R, E, C>)
        .delete(handlers::delete_task::<R, E, C>);

    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        .route(TASKS_PATH, collection.clone())
        .route(&format!("{TASKS_PATH}/"), collection)
        .route(&format!("{TASKS_PATH}/{{task_id}}"), item)
        .with_state(AppState::new(service))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}
