//! HTTP failure type and the error classifier.
//!
//! Purpose: fold every failure that can end a request (domain errors,
//! validation reports, framework rejections and unexpected errors) into one
//! [`ApiError`] enum, and map it to a (status, code, message, field errors)
//! [`Classification`]. The mapping is an exhaustive match, so adding a failure
//! kind forces a decision about how it is reported.
//!
//! Rendering the body is left to [`crate::middleware::ErrorRenderer`], which
//! knows the request path and the render configuration.

use std::error::Error as StdError;

use actix_web::error::{JsonPayloadError, QueryPayloadError, UrlencodedError};
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{error, warn};
use utoipa::ToSchema;

use crate::domain::ports::UserServiceError;
use crate::domain::{CorrelationId, DomainError, ErrorCode};

use super::validation::FieldViolation;

/// Convenient result alias for HTTP handlers.
pub type ApiResult<T> = Result<T, ApiError>;

pub(crate) const VALIDATION_MESSAGE: &str = "Validation failed for one or more fields";
pub(crate) const MALFORMED_BODY_MESSAGE: &str = "Malformed JSON request body";
pub(crate) const ACCESS_DENIED_MESSAGE: &str = "You do not have permission to access this resource";
pub(crate) const AUTHENTICATION_FAILED_MESSAGE: &str = "Authentication failed";
pub(crate) const UNEXPECTED_MESSAGE: &str = "An unexpected error occurred. Please try again later.";

/// Any failure that can terminate request handling.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Expected business failure raised by a service.
    #[error(transparent)]
    Domain(#[from] DomainError),
    /// The decoded payload broke one or more field rules.
    #[error("{} field violation(s)", .0.len())]
    Validation(Vec<FieldViolation>),
    /// The body could not be decoded.
    #[error("malformed request body: {detail}")]
    MalformedBody { detail: String },
    /// A required parameter was absent.
    #[error("missing required parameter `{name}`")]
    MissingParameter { name: String },
    /// A parameter could not be converted to its declared type.
    #[error("parameter `{name}` is not a valid {expected}")]
    TypeMismatch {
        name: String,
        expected: &'static str,
    },
    /// The caller is authenticated but not permitted.
    #[error("access denied: {detail}")]
    AccessDenied { detail: String },
    /// The caller could not be authenticated.
    #[error("authentication failed: {detail}")]
    AuthenticationFailed { detail: String },
    /// Anything else; its detail never reaches the client.
    #[error(transparent)]
    Unclassified(Box<dyn StdError + Send + Sync + 'static>),
}

/// Client-facing description of one rejected field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FieldError {
    /// Field name without any dotted prefix.
    #[schema(example = "email")]
    pub field: String,
    /// Why the value was rejected.
    #[schema(example = "email must be well-formed")]
    pub message: String,
    /// The offending value, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rejected_value: Option<Value>,
}

impl FieldError {
    fn from_violation(violation: &FieldViolation) -> Self {
        let field = violation
            .path
            .rsplit_once('.')
            .map_or(violation.path.as_str(), |(_, last)| last);
        Self {
            field: field.to_owned(),
            message: violation.message.clone(),
            rejected_value: violation.rejected_value.clone(),
        }
    }
}

/// Outcome of classifying a failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub status: StatusCode,
    pub code: ErrorCode,
    pub message: String,
    pub field_errors: Vec<FieldError>,
}

impl Classification {
    fn new(status: StatusCode, code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            status,
            code,
            message: message.into(),
            field_errors: Vec::new(),
        }
    }
}

/// Opaque failure raised by the framework outside any handler.
#[derive(Debug, thiserror::Error)]
#[error("{0}")]
struct FrameworkError(String);

impl ApiError {
    /// Wrap an unexpected error.
    pub fn unclassified(error: impl StdError + Send + Sync + 'static) -> Self {
        Self::Unclassified(Box::new(error))
    }

    /// Fold an error produced by actix itself (extractors, routing) into the
    /// failure taxonomy.
    pub fn from_framework(err: &actix_web::Error) -> Self {
        if let Some(payload) = err.as_error::<JsonPayloadError>() {
            return Self::MalformedBody {
                detail: payload.to_string(),
            };
        }
        if let Some(payload) = err.as_error::<UrlencodedError>() {
            return Self::MalformedBody {
                detail: payload.to_string(),
            };
        }
        if let Some(query) = err.as_error::<QueryPayloadError>() {
            return Self::MalformedBody {
                detail: query.to_string(),
            };
        }
        Self::Unclassified(Box::new(FrameworkError(err.to_string())))
    }

    /// HTTP status this failure reports.
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Domain(err) => err.status(),
            Self::Validation(_)
            | Self::MalformedBody { .. }
            | Self::MissingParameter { .. }
            | Self::TypeMismatch { .. } => StatusCode::BAD_REQUEST,
            Self::AccessDenied { .. } => StatusCode::FORBIDDEN,
            Self::AuthenticationFailed { .. } => StatusCode::UNAUTHORIZED,
            Self::Unclassified(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Classify without logging.
    ///
    /// Deterministic: resolving the same failure twice yields equal results.
    pub fn resolve(&self) -> Classification {
        let status = self.status();
        match self {
            Self::Domain(err) => Classification::new(status, err.code(), err.message()),
            Self::Validation(violations) => Classification {
                field_errors: violations.iter().map(FieldError::from_violation).collect(),
                ..Classification::new(status, ErrorCode::ValidationFailed, VALIDATION_MESSAGE)
            },
            Self::MalformedBody { .. } => {
                Classification::new(status, ErrorCode::BadRequest, MALFORMED_BODY_MESSAGE)
            }
            Self::MissingParameter { name } => Classification::new(
                status,
                ErrorCode::BadRequest,
                format!("Missing required parameter: {name}"),
            ),
            Self::TypeMismatch { name, expected } => Classification::new(
                status,
                ErrorCode::BadRequest,
                format!("Parameter '{name}' should be of type {expected}"),
            ),
            Self::AccessDenied { .. } => {
                Classification::new(status, ErrorCode::AuthAccessDenied, ACCESS_DENIED_MESSAGE)
            }
            Self::AuthenticationFailed { .. } => Classification::new(
                status,
                ErrorCode::AuthInvalidCredentials,
                AUTHENTICATION_FAILED_MESSAGE,
            ),
            Self::Unclassified(_) => {
                Classification::new(status, ErrorCode::InternalError, UNEXPECTED_MESSAGE)
            }
        }
    }

    /// Classify and log the failure once, tagged with the request id.
    ///
    /// Expected failures log at `warn`; unclassified failures log at `error`
    /// with their full cause chain, which is never sent to the client.
    pub fn classify(&self) -> Classification {
        let classification = self.resolve();
        let request_id = CorrelationId::current_or_unknown();
        let code = classification.code.as_str();
        let family = classification.code.family().as_str();
        let status = classification.status.as_u16();
        match self {
            Self::Domain(_) => warn!(
                %request_id, code, family, status,
                message = %classification.message,
                "domain error"
            ),
            Self::Validation(violations) => warn!(
                %request_id, code, family, status,
                violations = violations.len(),
                "validation failed"
            ),
            Self::Unclassified(_) => error!(
                %request_id, code, family, status,
                error = %self,
                trace = %self.trace(),
                "unexpected error"
            ),
            _ => warn!(
                %request_id, code, family, status,
                detail = %self,
                "request rejected"
            ),
        }
        classification
    }

    /// Text rendering of the failure followed by its `source()` chain.
    pub fn trace(&self) -> String {
        let mut rendered = self.to_string();
        let mut source = self.source();
        while let Some(cause) = source {
            rendered.push_str("\ncaused by: ");
            rendered.push_str(&cause.to_string());
            source = cause.source();
        }
        rendered
    }
}

impl From<UserServiceError> for ApiError {
    fn from(err: UserServiceError) -> Self {
        match err {
            UserServiceError::Domain(domain) => Self::Domain(domain),
            other => Self::unclassified(other),
        }
    }
}

/// Status-only response; the body is written by the error-rendering
/// middleware, which has the request path and render settings.
impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        self.status()
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::new(self.status())
    }
}
