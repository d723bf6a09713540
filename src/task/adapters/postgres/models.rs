//! Diesel row models for task persistence.

use super::schema::tasks;
use chrono::{DateTime, Utc};
use diesel::prelude::*;

/// Query result row for task records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = tasks)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct TaskRow {
    /// Storage-assigned identifier.
    pub id: i64,
    /// Task title.
    pub title: String,
    /// Optional description.
    pub description: Option<String>,
    /// Workflow status.
    pub status: String,
    /// Priority label.
    pub priority: String,
    /// Remote resource identifier.
    pub external_id: Option<i64>,
    /// Serialized enrichment snapshot.
    pub external_api_data: Option<String>,
    /// Owner tag.
    pub user_id: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
    /// Completion timestamp.
    pub completed_at: Option<DateTime<Utc>>,
}

/// Insert model for task records; the identifier comes from the sequence.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = tasks)]
pub struct NewTaskRow {
    /// Task title.
    pub title: String,
    /// Optional description.
    pub description: Option<String>,
    /// Workflow status.
    pub status: String,
    /// Priority label.
    pub priority: String,
    /// Remote resource identifier.
    pub external_id: Option<i64>,
    /// Serialized enrichment snapshot.
    pub external_api_data: Option<String>,
    /// Owner tag.
    pub user_id: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Initial update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Changeset for updates.
///
/// An outer `None` leaves the column untouched; `Some(None)` writes `NULL`.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = tasks)]
#[expect(
    clippy::option_option,
    reason = "outer None skips the column while Some(None) writes NULL"
)]
pub struct TaskChangeset {
    /// Task title.
    pub title: Option<String>,
    /// Optional description.
    pub description: Option<Option<String>>,
    /// Workflow status.
    pub status: Option<String>,
    /// Priority label.
    pub priority: Option<String>,
    /// Owner tag.
    pub user_id: Option<Option<String>>,
    /// Last update timestamp; always written.
    pub updated_at: DateTime<Utc>,
    /// Completion timestamp.
    pub completed_at: Option<Option<DateTime<Utc>>>,
}
