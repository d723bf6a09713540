//! Shared helpers for in-memory integration tests.

use async_trait::async_trait;
use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Method, Request, StatusCode, header::CONTENT_TYPE},
};
use mockable::DefaultClock;
use rstest::fixture;
use serde_json::{Value, json};
use showbay::{
    api,
    task::{
        adapters::memory::InMemoryTaskRepository,
        domain::ExternalId,
        ports::{EnrichmentClient, EnrichmentError, EnrichmentResult, NewExternalResource},
        services::TaskLifecycleService,
    },
};
use std::sync::Arc;
use tower::ServiceExt;

/// Enrichment client answering every lookup the same way.
#[derive(Debug, Clone)]
pub enum StubEnrichment {
    /// Every lookup returns this payload with the requested `id` set.
    Payload(Value),
    /// Every lookup fails with this upstream status.
    Failing(u16),
}

impl StubEnrichment {
    /// A stub that answers like the placeholder post service.
    #[must_use]
    pub fn posts() -> Self {
        Self::Payload(json!({ "title": "Test Post", "body": "Test body", "userId": 1 }))
    }

    fn answer(&self, external_id: ExternalId) -> EnrichmentResult<Value> {
        match self {
            Self::Payload(payload) => {
                let mut post = payload.clone();
                if let Some(fields) = post.as_object_mut() {
                    fields.insert("id".to_owned(), json!(external_id.value()));
                }
                Ok(post)
            }
            Self::Failing(404) => Err(EnrichmentError::NotFound {
                resource: format!("/posts/{external_id}"),
            }),
            Self::Failing(status) => Err(EnrichmentError::RequestFailed {
                status: *status,
                body: String::new(),
            }),
        }
    }
}

#[async_trait]
impl EnrichmentClient for StubEnrichment {
    async fn fetch_external_data(&self, external_id: ExternalId) -> EnrichmentResult<Value> {
        self.answer(external_id)
    }

    async fn fetch_external_data_list(&self, limit: u32) -> EnrichmentResult<Vec<Value>> {
        (1..=i64::from(limit))
            .map(|id| self.answer(ExternalId::new(id)))
            .collect()
    }

    async fn create_external_resource(
        &self,
        resource: &NewExternalResource,
    ) -> EnrichmentResult<Value> {
        let mut created = serde_json::to_value(resource)
            .map_err(EnrichmentError::unknown)?;
        if let Some(fields) = created.as_object_mut() {
            fields.insert("id".to_owned(), json!(101));
        }
        Ok(created)
    }
}

/// Lifecycle service wired to in-memory storage and a stub enrichment client.
pub type TestService = TaskLifecycleService<InMemoryTaskRepository, StubEnrichment, DefaultClock>;

/// Builds a service around the given enrichment stub.
#[must_use]
pub fn service_with(enrichment: StubEnrichment) -> TestService {
    TaskLifecycleService::new(
        Arc::new(InMemoryTaskRepository::new()),
        Arc::new(enrichment),
        Arc::new(DefaultClock),
    )
}

/// Provides a service whose enrichment lookups succeed.
#[fixture]
pub fn service() -> TestService {
    service_with(StubEnrichment::posts())
}

/// Provides a router whose enrichment lookups succeed.
#[fixture]
pub fn app() -> Router {
    app_with(StubEnrichment::posts())
}

/// Builds a router around the given enrichment stub.
#[must_use]
pub fn app_with(enrichment: StubEnrichment) -> Router {
    api::router(Arc::new(service_with(enrichment)))
}

/// Sends one request through the router and decodes the JSON response.
///
/// An empty response body decodes as `Value::Null`.
///
/// # Errors
///
/// Returns an error if the request cannot be built or the body is not JSON.
pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    body: Option<Value>,
) -> eyre::Result<(StatusCode, Value)> {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))?,
        None => builder.body(Body::empty())?,
    };
    let response = app.clone().oneshot(request).await?;
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await?;
    if bytes.is_empty() {
        return Ok((status, Value::Null));
    }
    Ok((status, serde_json::from_slice(&bytes)?))
}

/// Creates a task over HTTP and returns its identifier.
///
/// # Errors
///
/// Returns an error if creation does not answer `201` with an integer `id`.
pub async fn create_task(app: &Router, body: Value) -> eyre::Result<i64> {
    let (status, created) = send(app, Method::POST, "/api/v1/tasks/", Some(body)).await?;
    eyre::ensure!(status == StatusCode::CREATED, "unexpected status {status}: {created}");
    created
        .get("id")
        .and_then(Value::as_i64)
        .ok_or_else(|| eyre::eyre!("created task has no id: {created}"))
}
