//! HTTP adapters for the enrichment port.

mod client;

pub use client::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT, EnrichmentSettings, HttpEnrichmentClient};
