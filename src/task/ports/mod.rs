//! Port contracts for task lifecycle management.
//!
//! Ports define infrastructure-agnostic interfaces used by task services.

pub mod enrichment;
pub mod repository;

pub use enrichment::{EnrichmentClient, EnrichmentError, EnrichmentResult, NewExternalResource};
pub use repository::{TaskRepository, TaskRepositoryError, TaskRepositoryResult};
