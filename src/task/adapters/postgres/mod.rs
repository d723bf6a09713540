//! `PostgreSQL` adapters for task lifecycle persistence.

mod models;
mod pool;
mod repository;
mod schema;

pub use pool::{PoolSettings, PoolSetupError, build_pool};
pub use repository::{PostgresTaskRepository, TaskPgPool};
