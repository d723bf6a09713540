//! Explicitly configured `PostgreSQL` connection pool.

use super::repository::TaskPgPool;
use diesel::pg::PgConnection;
use diesel::r2d2::{ConnectionManager, Pool, PoolError};
use std::time::Duration;
use thiserror::Error;

/// Connection pool sizing and recycling options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolSettings {
    /// Connections kept open while idle.
    pub pool_size: u32,
    /// Extra connections allowed under load on top of `pool_size`.
    pub max_overflow: u32,
    /// Validate each connection before handing it out.
    pub pre_ping: bool,
    /// Maximum age of a connection before it is replaced.
    pub recycle_interval: Duration,
    /// How long to wait for a free connection.
    pub connection_timeout: Duration,
}

impl PoolSettings {
    /// Returns the hard upper bound on open connections.
    #[must_use]
    pub const fn max_connections(&self) -> u32 {
        self.pool_size.saturating_add(self.max_overflow)
    }
}

impl Default for PoolSettings {
    fn default() -> Self {
        Self {
            pool_size: 10,
            max_overflow: 20,
            pre_ping: true,
            recycle_interval: Duration::from_secs(300),
            connection_timeout: Duration::from_secs(30),
        }
    }
}

/// Errors raised while building the pool.
#[derive(Debug, Error)]
pub enum PoolSetupError {
    /// `pool_size` must allow at least one connection.
    #[error("pool size must be at least 1")]
    EmptyPool,
    /// The pool could not open its initial connections.
    #[error("failed to build connection pool: {0}")]
    Build(#[from] PoolError),
}

/// Builds the pool shared by task repositories.
///
/// # Errors
///
/// Returns [`PoolSetupError::EmptyPool`] for a zero `pool_size`, or
/// [`PoolSetupError::Build`] when the initial connections cannot be opened.
pub fn build_pool(
    database_url: &str,
    settings: &PoolSettings,
) -> Result<TaskPgPool, PoolSetupError> {
    if settings.pool_size == 0 {
        return Err(PoolSetupError::EmptyPool);
    }
    let manager = ConnectionManager::<PgConnection>::new(database_url);
    let pool = Pool::builder()
        .max_size(settings.max_connections())
        .min_idle(Some(settings.pool_size))
        .test_on_check_out(settings.pre_ping)
        .max_lifetime(Some(settings.recycle_interval))
        .connection_timeout(settings.connection_timeout)
        .build(manager)?;
    Ok(pool)
}
