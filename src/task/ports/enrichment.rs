//! Port for fetching and creating resources in the remote enrichment system.

use crate::task::domain::ExternalId;
use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Result type for enrichment calls.
pub type EnrichmentResult<T> = Result<T, EnrichmentError>;

/// Remote resource client.
///
/// Every call is a single attempt bounded by the adapter's timeout.
#[async_trait]
pub trait EnrichmentClient: Send + Sync {
    /// Fetches the remote resource with the given identifier.
    async fn fetch_external_data(&self, external_id: ExternalId) -> EnrichmentResult<Value>;

    /// Fetches up to `limit` remote resources.
    async fn fetch_external_data_list(&self, limit: u32) -> EnrichmentResult<Vec<Value>>;

    /// Creates a remote resource and returns the upstream representation.
    async fn create_external_resource(
        &self,
        resource: &NewExternalResource,
    ) -> EnrichmentResult<Value>;
}

/// Payload for creating a remote resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewExternalResource {
    /// Resource title.
    pub title: String,
    /// Resource body.
    pub body: String,
    /// Remote owner identifier.
    #[serde(rename = "userId")]
    pub user_id: i64,
}

impl NewExternalResource {
    /// Remote owner used when none is given.
    pub const DEFAULT_USER_ID: i64 = 1;

    /// Creates a payload owned by the default remote user.
    #[must_use]
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            user_id: Self::DEFAULT_USER_ID,
        }
    }

    /// Sets the remote owner.
    #[must_use]
    pub const fn with_user_id(mut self, user_id: i64) -> Self {
        self.user_id = user_id;
        self
    }
}

/// Outcomes of a failed enrichment call.
#[derive(Debug, Clone, Error)]
pub enum EnrichmentError {
    /// The upstream answered 404.
    #[error("resource {resource} not found in external API")]
    NotFound {
        /// Path of the missing resource.
        resource: String,
    },

    /// The upstream answered with another error status.
    #[error("external API request failed with status {status}: {body}")]
    RequestFailed {
        /// Upstream status code.
        status: u16,
        /// Upstream response body.
        body: String,
    },

    /// The call did not finish within the configured timeout.
    #[error("request to external API timed out after {timeout:?}")]
    Timeout {
        /// Configured timeout.
        timeout: Duration,
    },

    /// The upstream could not be reached.
    #[error("request error when connecting to external API: {0}")]
    Unreachable(Arc<dyn std::error::Error + Send + Sync>),

    /// Any other failure, such as an undecodable body.
    #[error("unexpected error when calling external API: {0}")]
    Unknown(Arc<dyn std::error::Error + Send + Sync>),
}

impl EnrichmentError {
    /// Wraps a transport failure.
    pub fn unreachable(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Unreachable(Arc::new(err))
    }

    /// Wraps an unexpected failure.
    pub fn unknown(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Unknown(Arc::new(err))
    }

    /// Returns the HTTP status this failure maps to.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::NotFound { .. } => 404,
            Self::RequestFailed { status, .. } => *status,
            Self::Timeout { .. } => 408,
            Self::Unreachable(_) => 502,
            Self::Unknown(_) => 500,
        }
    }
}
