//! `PostgreSQL` repository implementation for task lifecycle storage.

use super::{
    models::{NewTaskRow, TaskChangeset, TaskRow},
    schema::tasks,
};
use crate::task::{
    domain::{
        ExternalId, NewTask, PersistedTaskData, Task, TaskChanges, TaskFilter, TaskId, TaskPage,
        TaskQuery,
    },
    ports::{TaskRepository, TaskRepositoryError, TaskRepositoryResult},
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::connection::SimpleConnection;
use diesel::pg::{Pg, PgConnection};
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};

/// `PostgreSQL` connection pool type used by task adapters.
pub type TaskPgPool = Pool<ConnectionManager<PgConnection>>;

/// Schema applied at startup; safe to run repeatedly.
const CREATE_TASKS_SQL: &str =
    include_str!("../../../../migrations/2026-10-17-000000_create_tasks/up.sql");

/// `PostgreSQL`-backed task repository.
#[derive(Debug, Clone)]
pub struct PostgresTaskRepository {
    pool: TaskPgPool,
}

impl PostgresTaskRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: TaskPgPool) -> Self {
        Self { pool }
    }

    /// Creates the `tasks` table and its indexes when they are missing.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::Persistence`] when the DDL fails.
    pub async fn ensure_schema(&self) -> TaskRepositoryResult<()> {
        self.run_blocking(|connection| {
            connection
                .batch_execute(CREATE_TASKS_SQL)
                .map_err(TaskRepositoryError::persistence)
        })
        .await
    }

    async fn run_blocking<F, T>(&self, f: F) -> TaskRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> TaskRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(TaskRepositoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(TaskRepositoryError::persistence)?
    }
}

#[async_trait]
impl TaskRepository for PostgresTaskRepository {
    async fn insert(&self, task: NewTask) -> TaskRepositoryResult<Task> {
        let new_row = to_new_row(task);
        self.run_blocking(move |connection| {
            let row = diesel::insert_into(tasks::table)
                .values(&new_row)
                .returning(TaskRow::as_returning())
                .get_result::<TaskRow>(connection)
                .map_err(TaskRepositoryError::persistence)?;
            Ok(row_to_task(row))
        })
        .await
    }

    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>> {
        self.run_blocking(move |connection| {
            let row = tasks::table
                .find(id.value())
                .select(TaskRow::as_select())
                .first::<TaskRow>(connection)
                .optional()
                .map_err(TaskRepositoryError::persistence)?;
            Ok(row.map(row_to_task))
        })
        .await
    }

    async fn update(&self, id: TaskId, changes: &TaskChanges) -> TaskRepositoryResult<Task> {
        let changes = changes.clone();
        self.run_blocking(move |connection| {
            // The row stays locked until the merged update time is written.
            let row = connection
                .transaction::<_, diesel::result::Error, _>(|tx| {
                    let Some(current) = tasks::table
                        .find(id.value())
                        .select(TaskRow::as_select())
                        .for_update()
                        .first::<TaskRow>(tx)
                        .optional()?
                    else {
                        return Ok(None);
                    };
                    let mut merged = row_to_task(current);
                    merged.apply_changes(changes.clone());
                    diesel::update(tasks::table.find(id.value()))
                        .set(&to_changeset(&changes, merged.updated_at()))
                        .returning(TaskRow::as_returning())
                        .get_result::<TaskRow>(tx)
                        .map(Some)
                })
                .map_err(TaskRepositoryError::persistence)?;
            row.map(row_to_task)
                .ok_or(TaskRepositoryError::NotFound(id))
        })
        .await
    }

    async fn delete(&self, id: TaskId) -> TaskRepositoryResult<()> {
        self.run_blocking(move |connection| {
            let deleted = diesel::delete(tasks::table.find(id.value()))
                .execute(connection)
                .map_err(TaskRepositoryError::persistence)?;
            if deleted == 0 {
                return Err(TaskRepositoryError::NotFound(id));
            }
            Ok(())
        })
        .await
    }

    async fn query(&self, query: &TaskQuery) -> TaskRepositoryResult<TaskPage> {
        let filter = query.filter.clone();
        let page = query.page;
        self.run_blocking(move |connection| {
            // Count and page run in one transaction so `total` matches the rows.
            let (total, rows) = connection
                .transaction::<_, diesel::result::Error, _>(|tx| {
                    let count = filtered(&filter).count().get_result::<i64>(tx)?;
                    let page_rows = filtered(&filter)
                        .order(tasks::id.asc())
                        .offset(page.skip())
                        .limit(page.limit())
                        .select(TaskRow::as_select())
                        .load::<TaskRow>(tx)?;
                    Ok((count, page_rows))
                })
                .map_err(TaskRepositoryError::persistence)?;
            Ok(TaskPage {
                tasks: rows.into_iter().map(row_to_task).collect(),
                total: u64::try_from(total).map_err(TaskRepositoryError::persistence)?,
            })
        })
        .await
    }
}

fn filtered(filter: &TaskFilter) -> tasks::BoxedQuery<'static, Pg> {
    let mut query = tasks::table.into_boxed();
    if let Some(status) = filter.status() {
        query = query.filter(tasks::status.eq(status.to_owned()));
    }
    if let Some(priority) = filter.priority() {
        query = query.filter(tasks::priority.eq(priority.to_owned()));
    }
    query
}

fn to_new_row(task: NewTask) -> NewTaskRow {
    let (draft, external_api_data, created_at) = task.into_parts();
    NewTaskRow {
        title: draft.title,
        description: draft.description,
        status: draft.status,
        priority: draft.priority,
        external_id: draft.external_id.map(ExternalId::value),
        external_api_data,
        user_id: draft.user_id,
        created_at,
        updated_at: created_at,
    }
}

fn to_changeset(changes: &TaskChanges, updated_at: DateTime<Utc>) -> TaskChangeset {
    let patch = changes.patch();
    TaskChangeset {
        title: patch.title.as_set().cloned(),
        description: patch.description.as_set().cloned(),
        status: patch.status.as_set().cloned(),
        priority: patch.priority.as_set().cloned(),
        user_id: patch.user_id.as_set().cloned(),
        updated_at,
        completed_at: patch.completed_at.as_set().copied(),
    }
}

fn row_to_task(row: TaskRow) -> Task {
    Task::from_persisted(PersistedTaskData {
        id: TaskId::new(row.id),
        title: row.title,
        description: row.description,
        status: row.status,
        priority: row.priority,
        external_id: row.external_id.map(ExternalId::new),
        external_api_data: row.external_api_data,
        user_id: row.user_id,
        created_at: row.created_at,
        updated_at: row.updated_at,
        completed_at: row.completed_at,
    })
}
