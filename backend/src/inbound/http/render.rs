//! Error body rendering.
//!
//! Two wire shapes share one classification: the compact body and the
//! RFC 7807 problem body. [`RenderConfig`] picks between them at runtime.
//! Both carry status, code, request id, timestamp and request path, and
//! both list field errors under `errors`.

use std::collections::BTreeMap;

use actix_web::http::StatusCode;
use actix_web::http::header::{self, HeaderValue};
use actix_web::HttpResponse;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use crate::domain::{CorrelationId, ErrorCode};

use super::error::{ApiError, Classification, FieldError};

/// Default base for problem `type` URIs.
pub const DEFAULT_PROBLEM_TYPE_BASE_URI: &str = "https://api.example.com/problems";

/// Media type of problem bodies.
pub const PROBLEM_JSON: &str = "application/problem+json";

/// Render-time switches, read once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderConfig {
    include_stacktrace: bool,
    use_problem_details: bool,
    problem_type_base_uri: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            include_stacktrace: false,
            use_problem_details: false,
            problem_type_base_uri: DEFAULT_PROBLEM_TYPE_BASE_URI.to_owned(),
        }
    }
}

impl RenderConfig {
    pub fn new(
        include_stacktrace: bool,
        use_problem_details: bool,
        problem_type_base_uri: impl Into<String>,
    ) -> Self {
        Self {
            include_stacktrace,
            use_problem_details,
            problem_type_base_uri: problem_type_base_uri.into(),
        }
    }

    /// Compact bodies with traces enabled.
    #[must_use]
    pub fn with_stacktrace(mut self, include: bool) -> Self {
        self.include_stacktrace = include;
        self
    }

    /// Switch between compact and problem bodies.
    #[must_use]
    pub fn with_problem_details(mut self, enabled: bool) -> Self {
        self.use_problem_details = enabled;
        self
    }

    pub fn include_stacktrace(&self) -> bool {
        self.include_stacktrace
    }

    pub fn use_problem_details(&self) -> bool {
        self.use_problem_details
    }

    pub fn problem_type_base_uri(&self) -> &str {
        self.problem_type_base_uri.as_str()
    }

    /// Problem `type` URI for `code`.
    ///
    /// # Examples
    /// ```
    /// use auth_backend::domain::ErrorCode;
    /// use auth_backend::inbound::http::render::RenderConfig;
    ///
    /// let config = RenderConfig::default();
    /// assert_eq!(
    ///     config.problem_type(ErrorCode::UserNotFound),
    ///     "https://api.example.com/problems/user-001"
    /// );
    /// ```
    pub fn problem_type(&self, code: ErrorCode) -> String {
        format!(
            "{}/{}",
            self.problem_type_base_uri.trim_end_matches('/'),
            code.problem_slug()
        )
    }
}

/// Compact error body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    pub timestamp: DateTime<Utc>,
    #[schema(example = 404)]
    pub status: u16,
    pub code: ErrorCode,
    #[schema(example = "User not found")]
    pub message: String,
    #[schema(example = "/api/v1/users/3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    pub path: String,
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    pub request_id: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<FieldError>,
    /// Present only when stack traces are enabled.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trace: Option<String>,
}

/// RFC 7807 problem body extended with the error code and request id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProblemBody {
    #[serde(rename = "type")]
    #[schema(example = "https://api.example.com/problems/user-001")]
    pub problem_type: String,
    #[schema(example = "Not Found")]
    pub title: String,
    pub status: u16,
    pub detail: String,
    pub instance: String,
    pub timestamp: DateTime<Utc>,
    pub code: ErrorCode,
    pub request_id: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<FieldError>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    #[schema(value_type = Object)]
    pub extensions: BTreeMap<String, Value>,
}

/// Either rendered body.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ErrorPayload {
    Compact(ErrorBody),
    Problem(ProblemBody),
}

impl ErrorPayload {
    pub fn content_type(&self) -> &'static str {
        match self {
            Self::Compact(_) => "application/json",
            Self::Problem(_) => PROBLEM_JSON,
        }
    }
}

fn extensions_for(error: &ApiError) -> BTreeMap<String, Value> {
    let mut extensions = BTreeMap::new();
    if let ApiError::Domain(domain) = error {
        if !domain.args().is_empty() {
            extensions.insert("args".to_owned(), Value::from(domain.args().to_vec()));
        }
    }
    extensions
}

/// Build the body for an already classified failure.
///
/// The request id and timestamp are read at call time.
pub fn build_payload(
    error: &ApiError,
    classification: Classification,
    config: &RenderConfig,
    path: &str,
) -> ErrorPayload {
    let Classification {
        status,
        code,
        message,
        field_errors,
    } = classification;
    let request_id = CorrelationId::current_or_unknown();
    let timestamp = Utc::now();

    if config.use_problem_details() {
        return ErrorPayload::Problem(ProblemBody {
            problem_type: config.problem_type(code),
            title: status.canonical_reason().unwrap_or("Unknown").to_owned(),
            status: status.as_u16(),
            detail: message,
            instance: path.to_owned(),
            timestamp,
            code,
            request_id,
            errors: field_errors,
            extensions: extensions_for(error),
        });
    }

    ErrorPayload::Compact(ErrorBody {
        timestamp,
        status: status.as_u16(),
        code,
        message,
        path: path.to_owned(),
        request_id,
        errors: field_errors,
        trace: config.include_stacktrace().then(|| error.trace()),
    })
}

/// Classify `error` (logging it once) and render the HTTP response.
pub fn render(error: &ApiError, config: &RenderConfig, path: &str) -> HttpResponse {
    let classification = error.classify();
    let status = classification.status;
    let payload = build_payload(error, classification, config, path);
    respond(status, &payload)
}

fn respond(status: StatusCode, payload: &ErrorPayload) -> HttpResponse {
    let mut response = HttpResponse::build(status);
    response.insert_header((
        header::CONTENT_TYPE,
        HeaderValue::from_static(payload.content_type()),
    ));
    match serde_json::to_vec(payload) {
        Ok(body) => response.body(body),
        Err(error) => {
            tracing::error!(%error, "failed to serialise error body");
            response.finish()
        }
    }
}
