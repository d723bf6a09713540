//! `ShowBay`: a task management record service.
//!
//! Tasks are created, read, partially updated, deleted, and listed over a
//! JSON HTTP API. Creation can optionally enrich a task with a snapshot of a
//! resource fetched from a remote HTTP service.
//!
//! # Architecture
//!
//! `ShowBay` follows hexagonal architecture principles:
//!
//! - **Domain**: field limits, validation, and the partial-update merge
//! - **Ports**: repository and enrichment client traits
//! - **Adapters**: `PostgreSQL`, in-memory, and `reqwest` implementations
//!
//! # Modules
//!
//! - [`task`]: Task lifecycle domain, ports, adapters, and service
//! - [`api`]: axum router and error translation
//! - [`config`]: Environment-driven process configuration

pub mod api;
pub mod config;
pub mod task;
