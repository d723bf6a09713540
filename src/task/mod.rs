//! Task lifecycle management for `ShowBay`.
//!
//! Tasks are created, read, partially updated, deleted, and listed through
//! [`services::TaskLifecycleService`]. Creation may enrich a task with a
//! snapshot of a remote resource; enrichment failures never block creation.
//! The module follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
