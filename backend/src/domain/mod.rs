//! Domain primitives, aggregates and services.
//!
//! Purpose: define the error catalogue, the request correlation context and
//! the user/role model, plus the ports and the service that operate on them.
//! Nothing in this module depends on HTTP request types.
//!
//! Public surface:
//! - ErrorCode / ErrorFamily (from `error`): stable failure catalogue.
//! - DomainError (from `error`): classified failure raised by services.
//! - CorrelationId (from `correlation_id`): per-request identifier.
//! - User / Role / UserDraft (from `user`): account model.
//! - UserService (from `user_service`): `UserManagement` implementation.

pub mod correlation_id;
pub mod error;
pub mod ports;
pub mod user;
pub mod user_service;

pub use self::correlation_id::{CorrelationId, REQUEST_ID_HEADER, UNKNOWN_REQUEST_ID};
pub use self::error::{DomainError, ErrorCause, ErrorCode, ErrorFamily};
pub use self::user::{AuthProvider, DEFAULT_ROLE, Role, User, UserDraft};
pub use self::user_service::UserService;
