//! Adapter implementations for task lifecycle ports.

pub mod http;
pub mod memory;
pub mod postgres;
