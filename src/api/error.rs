//! Translation of internal failures into the public error shape.
//!
//! Every non-2xx response carries `{"detail": ..., "error_code": ...}`.
//! Validation failures list every violation; internal failures are logged
//! and reported with a fixed message so nothing internal leaks.

use crate::task::{
    domain::{FieldViolation, TaskValidationError, ViolationSource},
    ports::EnrichmentError,
    services::TaskLifecycleError,
};
use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::Value;
use tracing::{error, warn};

/// Machine-readable code for validation failures.
pub const VALIDATION_ERROR: &str = "VALIDATION_ERROR";
/// Machine-readable code for missing records.
pub const NOT_FOUND: &str = "NOT_FOUND";
/// Machine-readable code for surfaced enrichment failures.
pub const EXTERNAL_API_ERROR: &str = "EXTERNAL_API_ERROR";
/// Machine-readable code for everything unclassified.
pub const INTERNAL_ERROR: &str = "INTERNAL_ERROR";

const INTERNAL_DETAIL: &str = "An internal server error occurred";

/// One entry of a validation `detail` list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViolationDetail {
    /// Request part followed by field name, e.g. `["body", "title"]`. A
    /// failure that concerns the whole part has the part alone.
    pub loc: Vec<String>,
    /// Human-readable message.
    pub msg: String,
    /// Broken rule identifier.
    #[serde(rename = "type")]
    pub kind: String,
    /// Rejected input.
    pub input: Value,
}

impl From<&FieldViolation> for ViolationDetail {
    fn from(violation: &FieldViolation) -> Self {
        let mut loc = vec![violation.source().as_str().to_owned()];
        if !violation.field().is_empty() {
            loc.push(violation.field().to_owned());
        }
        Self {
            loc,
            msg: violation.message().to_owned(),
            kind: violation.rule().code().to_owned(),
            input: violation.input().clone(),
        }
    }
}

/// Error detail: a message or a list of violations.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ErrorDetail {
    /// Plain message.
    Message(String),
    /// Every violation found in the request.
    Violations(Vec<ViolationDetail>),
}

/// Serialized error body.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorBody {
    /// Message or violation list.
    pub detail: ErrorDetail,
    /// Machine-readable code.
    pub error_code: &'static str,
}

/// A translated failure ready to be written as a response.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiError {
    status: StatusCode,
    body: ErrorBody,
}

impl ApiError {
    fn new(status: StatusCode, detail: ErrorDetail, error_code: &'static str) -> Self {
        Self {
            status,
            body: ErrorBody { detail, error_code },
        }
    }

    /// A 422 listing every violation.
    #[must_use]
    pub fn validation(err: &TaskValidationError) -> Self {
        let details = err.violations().iter().map(ViolationDetail::from).collect();
        Self::new(
            StatusCode::UNPROCESSABLE_ENTITY,
            ErrorDetail::Violations(details),
            VALIDATION_ERROR,
        )
    }

    /// A 500 whose cause is logged but not exposed.
    #[must_use]
    pub fn internal(cause: &dyn std::error::Error) -> Self {
        error!(error = %cause, "internal error while handling request");
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            ErrorDetail::Message(INTERNAL_DETAIL.to_owned()),
            INTERNAL_ERROR,
        )
    }

    fn malformed(source: ViolationSource, field: &str, message: String) -> Self {
        warn!(location = source.as_str(), field, error = %message, "rejected malformed request");
        let violation = FieldViolation::malformed(source, field, message);
        Self::validation(&TaskValidationError::new(vec![violation]))
    }

    /// Returns the HTTP status.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        self.status
    }

    /// Returns the error body.
    #[must_use]
    pub const fn body(&self) -> &ErrorBody {
        &self.body
    }

    /// Returns the machine-readable code.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        self.body.error_code
    }
}

impl From<TaskLifecycleError> for ApiError {
    fn from(err: TaskLifecycleError) -> Self {
        match err {
            TaskLifecycleError::Validation(validation) => Self::validation(&validation),
            TaskLifecycleError::NotFound(_) => Self::new(
                StatusCode::NOT_FOUND,
                ErrorDetail::Message(err.to_string()),
                NOT_FOUND,
            ),
            TaskLifecycleError::Repository(repository) => Self::internal(&repository),
        }
    }
}

impl From<EnrichmentError> for ApiError {
    fn from(err: EnrichmentError) -> Self {
        let status = StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::BAD_GATEWAY);
        error!(status = status.as_u16(), error = %err, "external API error");
        Self::new(status, ErrorDetail::Message(err.to_string()), EXTERNAL_API_ERROR)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::malformed(ViolationSource::Body, "", rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        Self::malformed(ViolationSource::Path, "task_id", rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::malformed(ViolationSource::Query, "query", rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}
