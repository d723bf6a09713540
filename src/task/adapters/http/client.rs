//! `reqwest`-backed enrichment client.

use crate::task::{
    domain::ExternalId,
    ports::{EnrichmentClient, EnrichmentError, EnrichmentResult, NewExternalResource},
};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

/// Base URL used when none is configured.
pub const DEFAULT_BASE_URL: &str = "https://jsonplaceholder.typicode.com";
/// Per-call timeout used when none is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Where the remote system lives and how long to wait for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnrichmentSettings {
    /// Base URL; resource paths such as `/posts/1` are appended.
    pub base_url: String,
    /// Upper bound on a whole call, including reading the body.
    pub timeout: Duration,
}

impl Default for EnrichmentSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// Enrichment client speaking JSON over HTTP.
#[derive(Debug, Clone)]
pub struct HttpEnrichmentClient {
    client: Client,
    base_url: String,
    timeout: Duration,
}

impl HttpEnrichmentClient {
    /// Builds a client from the given settings.
    ///
    /// # Errors
    ///
    /// Returns [`EnrichmentError::Unknown`] if the HTTP client cannot be
    /// initialised.
    pub fn new(settings: EnrichmentSettings) -> EnrichmentResult<Self> {
        let client = Client::builder()
            .timeout(settings.timeout)
            .build()
            .map_err(EnrichmentError::unknown)?;
        Ok(Self {
            client,
            base_url: settings.base_url.trim_end_matches('/').to_owned(),
            timeout: settings.timeout,
        })
    }

    fn url(&self, resource: &str) -> String {
        format!("{}{resource}", self.base_url)
    }

    async fn send<T>(&self, resource: &str, request: RequestBuilder) -> EnrichmentResult<T>
    where
        T: DeserializeOwned,
    {
        debug!(resource, "calling external API");
        let response = request.send().await.map_err(|err| self.classify(err))?;
        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(EnrichmentError::NotFound {
                resource: resource.to_owned(),
            });
        }
        if status.is_client_error() || status.is_server_error() {
            let body = response.text().await.unwrap_or_else(|err| {
                debug!(resource, error = %err, "failed to read error body");
                String::new()
            });
            return Err(EnrichmentError::RequestFailed {
                status: status.as_u16(),
                body,
            });
        }
        response.json::<T>().await.map_err(|err| self.classify(err))
    }

    fn classify(&self, err: reqwest::Error) -> EnrichmentError {
        if err.is_timeout() {
            EnrichmentError::Timeout {
                timeout: self.timeout,
            }
        } else if err.is_connect() || err.is_request() {
            EnrichmentError::unreachable(err)
        } else {
            EnrichmentError::unknown(err)
        }
    }
}

#[async_trait]
impl EnrichmentClient for HttpEnrichmentClient {
    async fn fetch_external_data(&self, external_id: ExternalId) -> EnrichmentResult<Value> {
        let resource = format!("/posts/{external_id}");
        let request = self.client.get(self.url(&resource));
        self.send(&resource, request).await
    }

    async fn fetch_external_data_list(&self, limit: u32) -> EnrichmentResult<Vec<Value>> {
        let resource = format!("/posts?_limit={limit}");
        let request = self.client.get(self.url(&resource));
        self.send(&resource, request).await
    }

    async fn create_external_resource(
        &self,
        resource: &NewExternalResource,
    ) -> EnrichmentResult<Value> {
        let path = "/posts";
        let request = self.client.post(self.url(path)).json(resource);
        self.send(path, request).await
    }
}
