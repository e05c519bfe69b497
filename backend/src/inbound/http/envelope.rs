//! Success envelope wrapping every non-error response body.
//!
//! Each constructor stamps the active request id and the current time, so an
//! envelope should be built inside the request scope it answers.
//!
//! # Examples
//! ```
//! use auth_backend::inbound::http::envelope::ApiResponse;
//!
//! let created = ApiResponse::created(42);
//! assert_eq!(created.status(), 201);
//! assert_eq!(created.message(), "Created successfully");
//! assert_eq!(created.request_id(), "N/A");
//! ```

use actix_web::body::BoxBody;
use actix_web::http::StatusCode;
use actix_web::{HttpRequest, HttpResponse, Responder};
use chrono::{DateTime, Utc};
use pagination::PageInfo;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::CorrelationId;

/// Uniform success body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T> {
    success: bool,
    #[schema(example = 200)]
    status: u16,
    #[schema(example = "Success")]
    message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    data: Option<T>,
    timestamp: DateTime<Utc>,
    request_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Object>)]
    pagination: Option<PageInfo>,
}

impl<T> ApiResponse<T> {
    fn build(status: StatusCode, message: impl Into<String>, data: Option<T>) -> Self {
        Self {
            success: true,
            status: status.as_u16(),
            message: message.into(),
            data,
            timestamp: Utc::now(),
            request_id: CorrelationId::current_or_unknown(),
            pagination: None,
        }
    }

    /// 200 with the message `Success`.
    pub fn ok(data: T) -> Self {
        Self::build(StatusCode::OK, "Success", Some(data))
    }

    /// 200 with a custom message.
    pub fn ok_with_message(data: T, message: impl Into<String>) -> Self {
        Self::build(StatusCode::OK, message, Some(data))
    }

    /// Custom status and message.
    pub fn with_status(status: StatusCode, message: impl Into<String>, data: Option<T>) -> Self {
        Self::build(status, message, data)
    }

    /// 201 with the message `Created successfully`.
    pub fn created(data: T) -> Self {
        Self::build(StatusCode::CREATED, "Created successfully", Some(data))
    }

    /// 201 with a custom message.
    pub fn created_with_message(data: T, message: impl Into<String>) -> Self {
        Self::build(StatusCode::CREATED, message, Some(data))
    }

    /// 204 without data.
    pub fn no_content() -> Self {
        Self::build(StatusCode::NO_CONTENT, "No content", None)
    }

    /// 200 carrying one page of results.
    pub fn paginated(data: T, page: PageInfo, message: impl Into<String>) -> Self {
        Self {
            pagination: Some(page),
            ..Self::build(StatusCode::OK, message, Some(data))
        }
    }

    pub fn success(&self) -> bool {
        self.success
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn message(&self) -> &str {
        self.message.as_str()
    }

    pub fn data(&self) -> Option<&T> {
        self.data.as_ref()
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn request_id(&self) -> &str {
        self.request_id.as_str()
    }

    pub fn pagination(&self) -> Option<&PageInfo> {
        self.pagination.as_ref()
    }
}

impl<T: Serialize> Responder for ApiResponse<T> {
    type Body = BoxBody;

    fn respond_to(self, _req: &HttpRequest) -> HttpResponse<Self::Body> {
        let status = StatusCode::from_u16(self.status).unwrap_or(StatusCode::OK);
        if status == StatusCode::NO_CONTENT {
            return HttpResponse::NoContent().finish();
        }
        HttpResponse::build(status).json(self)
    }
}
