//! Error taxonomy and the domain error raised by business logic.
//!
//! [`ErrorCode`] is the closed catalogue of failure codes exposed to clients.
//! Its wire strings (`USER_001`, `SYS_002`, ...) are a public contract: add new
//! variants, never rename or renumber existing ones.
//!
//! [`DomainError`] is what services return for expected failures such as
//! missing entities or conflicts. Inbound adapters classify it together with
//! transport failures and render the response.

use std::fmt;
use std::sync::Arc;

use actix_web::http::StatusCode;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Error family, one per reserved code prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorFamily {
    /// `AUTH_` codes.
    Auth,
    /// `USER_` codes.
    User,
    /// `ROLE_` codes.
    Role,
    /// `VAL_` codes.
    Validation,
    /// `RES_` codes.
    Resource,
    /// `SYS_` codes.
    System,
}

impl ErrorFamily {
    /// Lower-case label used in structured logs.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Auth => "auth",
            Self::User => "user",
            Self::Role => "role",
            Self::Validation => "validation",
            Self::Resource => "resource",
            Self::System => "system",
        }
    }
}

/// Stable machine-readable error code.
///
/// Serialises as the wire code, e.g. [`ErrorCode::UserNotFound`] becomes
/// `"USER_001"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[non_exhaustive]
pub enum ErrorCode {
    /// Credentials did not match a known account.
    #[serde(rename = "AUTH_001")]
    AuthInvalidCredentials,
    /// The presented token is no longer valid.
    #[serde(rename = "AUTH_002")]
    AuthTokenExpired,
    /// The caller may not access the resource.
    #[serde(rename = "AUTH_003")]
    AuthAccessDenied,
    /// The account is locked.
    #[serde(rename = "AUTH_004")]
    AuthAccountLocked,
    /// The account is disabled.
    #[serde(rename = "AUTH_005")]
    AuthAccountDisabled,
    /// No user matches the identifier.
    #[serde(rename = "USER_001")]
    UserNotFound,
    /// Another user already owns the email address.
    #[serde(rename = "USER_002")]
    UserEmailExists,
    /// The password does not meet the format rules.
    #[serde(rename = "USER_003")]
    UserInvalidPassword,
    /// No role matches the name.
    #[serde(rename = "ROLE_001")]
    RoleNotFound,
    /// The user already holds the role.
    #[serde(rename = "ROLE_002")]
    RoleAlreadyAssigned,
    /// One or more request fields failed validation.
    #[serde(rename = "VAL_001")]
    ValidationFailed,
    /// Generic missing resource.
    #[serde(rename = "RES_001")]
    ResourceNotFound,
    /// The operation is not permitted in the current state.
    #[serde(rename = "RES_002")]
    OperationNotAllowed,
    /// An unexpected server-side failure.
    #[serde(rename = "SYS_001")]
    InternalError,
    /// The request could not be understood.
    #[serde(rename = "SYS_002")]
    BadRequest,
}

impl ErrorCode {
    /// Every code in catalogue order.
    pub const ALL: [Self; 15] = [
        Self::AuthInvalidCredentials,
        Self::AuthTokenExpired,
        Self::AuthAccessDenied,
        Self::AuthAccountLocked,
        Self::AuthAccountDisabled,
        Self::UserNotFound,
        Self::UserEmailExists,
        Self::UserInvalidPassword,
        Self::RoleNotFound,
        Self::RoleAlreadyAssigned,
        Self::ValidationFailed,
        Self::ResourceNotFound,
        Self::OperationNotAllowed,
        Self::InternalError,
        Self::BadRequest,
    ];

    /// Wire code sent to clients and written to logs.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::AuthInvalidCredentials => "AUTH_001",
            Self::AuthTokenExpired => "AUTH_002",
            Self::AuthAccessDenied => "AUTH_003",
            Self::AuthAccountLocked => "AUTH_004",
            Self::AuthAccountDisabled => "AUTH_005",
            Self::UserNotFound => "USER_001",
            Self::UserEmailExists => "USER_002",
            Self::UserInvalidPassword => "USER_003",
            Self::RoleNotFound => "ROLE_001",
            Self::RoleAlreadyAssigned => "ROLE_002",
            Self::ValidationFailed => "VAL_001",
            Self::ResourceNotFound => "RES_001",
            Self::OperationNotAllowed => "RES_002",
            Self::InternalError => "SYS_001",
            Self::BadRequest => "SYS_002",
        }
    }

    /// Symbolic name of the catalogue entry.
    pub fn name(self) -> &'static str {
        match self {
            Self::AuthInvalidCredentials => "AUTH_INVALID_CREDENTIALS",
            Self::AuthTokenExpired => "AUTH_TOKEN_EXPIRED",
            Self::AuthAccessDenied => "AUTH_ACCESS_DENIED",
            Self::AuthAccountLocked => "AUTH_ACCOUNT_LOCKED",
            Self::AuthAccountDisabled => "AUTH_ACCOUNT_DISABLED",
            Self::UserNotFound => "USER_NOT_FOUND",
            Self::UserEmailExists => "USER_EMAIL_EXISTS",
            Self::UserInvalidPassword => "USER_INVALID_PASSWORD",
            Self::RoleNotFound => "ROLE_NOT_FOUND",
            Self::RoleAlreadyAssigned => "ROLE_ALREADY_ASSIGNED",
            Self::ValidationFailed => "VALIDATION_FAILED",
            Self::ResourceNotFound => "RESOURCE_NOT_FOUND",
            Self::OperationNotAllowed => "OPERATION_NOT_ALLOWED",
            Self::InternalError => "INTERNAL_ERROR",
            Self::BadRequest => "BAD_REQUEST",
        }
    }

    /// Message used when the raiser does not supply one.
    pub fn default_message(self) -> &'static str {
        match self {
            Self::AuthInvalidCredentials => "Invalid credentials provided",
            Self::AuthTokenExpired => "Authentication token has expired",
            Self::AuthAccessDenied => "Access denied to requested resource",
            Self::AuthAccountLocked => "Account is locked",
            Self::AuthAccountDisabled => "Account is disabled",
            Self::UserNotFound => "User not found",
            Self::UserEmailExists => "Email already exists",
            Self::UserInvalidPassword => "Invalid password format",
            Self::RoleNotFound => "Role not found",
            Self::RoleAlreadyAssigned => "Role already assigned to user",
            Self::ValidationFailed => "Validation failed",
            Self::ResourceNotFound => "Requested resource not found",
            Self::OperationNotAllowed => "Operation not allowed",
            Self::InternalError => "Internal server error",
            Self::BadRequest => "Bad request",
        }
    }

    /// Family the code belongs to.
    pub fn family(self) -> ErrorFamily {
        match self {
            Self::AuthInvalidCredentials
            | Self::AuthTokenExpired
            | Self::AuthAccessDenied
            | Self::AuthAccountLocked
            | Self::AuthAccountDisabled => ErrorFamily::Auth,
            Self::UserNotFound | Self::UserEmailExists | Self::UserInvalidPassword => {
                ErrorFamily::User
            }
            Self::RoleNotFound | Self::RoleAlreadyAssigned => ErrorFamily::Role,
            Self::ValidationFailed => ErrorFamily::Validation,
            Self::ResourceNotFound | Self::OperationNotAllowed => ErrorFamily::Resource,
            Self::InternalError | Self::BadRequest => ErrorFamily::System,
        }
    }

    /// URI path segment for problem `type` links: lower-case, `_` becomes `-`.
    ///
    /// # Examples
    /// ```
    /// use auth_backend::domain::ErrorCode;
    ///
    /// assert_eq!(ErrorCode::UserNotFound.problem_slug(), "user-001");
    /// ```
    pub fn problem_slug(self) -> String {
        self.as_str().to_lowercase().replace('_', "-")
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Shared, type-erased cause attached to a [`DomainError`].
pub type ErrorCause = Arc<dyn std::error::Error + Send + Sync + 'static>;

/// Classified failure raised by business logic.
///
/// ## Invariants
/// - Carries exactly one [`ErrorCode`] and one resolved HTTP status.
/// - `message` falls back to [`ErrorCode::default_message`] when not supplied
///   or blank.
/// - Errors built with the not-found constructors always report 404.
///
/// # Examples
/// ```
/// use actix_web::http::StatusCode;
/// use auth_backend::domain::{DomainError, ErrorCode};
///
/// let err = DomainError::new(ErrorCode::RoleAlreadyAssigned);
/// assert_eq!(err.status(), StatusCode::BAD_REQUEST);
/// assert_eq!(err.message(), "Role already assigned to user");
///
/// let missing = DomainError::not_found(ErrorCode::UserNotFound);
/// assert_eq!(missing.status(), StatusCode::NOT_FOUND);
/// ```
#[derive(Debug, Clone)]
pub struct DomainError {
    code: ErrorCode,
    status: StatusCode,
    message: String,
    args: Vec<String>,
    cause: Option<ErrorCause>,
}

impl DomainError {
    /// Build from a code alone: HTTP 400 with the code's default message.
    pub fn new(code: ErrorCode) -> Self {
        Self::with_status_and_message(code, StatusCode::BAD_REQUEST, code.default_message())
    }

    /// Build from a code and a custom message, keeping HTTP 400.
    pub fn with_message(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::with_status_and_message(code, StatusCode::BAD_REQUEST, message)
    }

    /// Build from a code and an explicit status, keeping the default message.
    pub fn with_status(code: ErrorCode, status: StatusCode) -> Self {
        Self::with_status_and_message(code, status, code.default_message())
    }

    /// Build from a code, explicit status and custom message.
    pub fn with_status_and_message(
        code: ErrorCode,
        status: StatusCode,
        message: impl Into<String>,
    ) -> Self {
        let message = message.into();
        let message = if message.trim().is_empty() {
            code.default_message().to_owned()
        } else {
            message
        };
        Self {
            code,
            status,
            message,
            args: Vec::new(),
            cause: None,
        }
    }

    /// Not-found error for `code`; the status is always 404.
    pub fn not_found(code: ErrorCode) -> Self {
        Self::with_status(code, StatusCode::NOT_FOUND)
    }

    /// Not-found error with a custom message; the status is always 404.
    pub fn not_found_with_message(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::with_status_and_message(code, StatusCode::NOT_FOUND, message)
    }

    /// Generic missing entity, reported as [`ErrorCode::ResourceNotFound`].
    ///
    /// # Examples
    /// ```
    /// use auth_backend::domain::{DomainError, ErrorCode};
    ///
    /// let err = DomainError::entity_not_found("User", "42");
    /// assert_eq!(err.code(), ErrorCode::ResourceNotFound);
    /// assert_eq!(err.message(), "User not found with identifier: 42");
    /// ```
    pub fn entity_not_found(entity: &str, identifier: impl fmt::Display) -> Self {
        Self::not_found_with_message(
            ErrorCode::ResourceNotFound,
            format!("{entity} not found with identifier: {identifier}"),
        )
    }

    /// Attach the underlying cause for diagnostic chaining.
    pub fn with_cause(mut self, cause: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.cause = Some(Arc::new(cause));
        self
    }

    /// Fill `{}` placeholders in the message, in order, and keep the arguments.
    ///
    /// Surplus placeholders are left untouched; surplus arguments are kept but
    /// not interpolated.
    ///
    /// # Examples
    /// ```
    /// use auth_backend::domain::{DomainError, ErrorCode};
    ///
    /// let err = DomainError::with_message(ErrorCode::RoleNotFound, "Role {} is unknown")
    ///     .with_args(["AUDITOR"]);
    /// assert_eq!(err.message(), "Role AUDITOR is unknown");
    /// assert_eq!(err.args(), ["AUDITOR"]);
    /// ```
    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self.message = interpolate(&self.message, &self.args);
        self
    }

    /// Catalogue code.
    pub fn code(&self) -> ErrorCode {
        self.code
    }

    /// Resolved HTTP status.
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Human-readable message.
    pub fn message(&self) -> &str {
        self.message.as_str()
    }

    /// Interpolation arguments, if any.
    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Whether the error reports HTTP 404.
    pub fn is_not_found(&self) -> bool {
        self.status == StatusCode::NOT_FOUND
    }
}

fn interpolate(template: &str, args: &[String]) -> String {
    let mut rendered = String::with_capacity(template.len());
    let mut pieces = template.split("{}");
    if let Some(first) = pieces.next() {
        rendered.push_str(first);
    }
    let mut remaining = args.iter();
    for piece in pieces {
        match remaining.next() {
            Some(arg) => rendered.push_str(arg),
            None => rendered.push_str("{}"),
        }
        rendered.push_str(piece);
    }
    rendered
}

impl fmt::Display for DomainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for DomainError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.cause
            .as_deref()
            .map(|cause| cause as &(dyn std::error::Error + 'static))
    }
}

#[cfg(test)]
mod tests;
