//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every HTTP endpoint from the inbound layer together
//! with the success envelope and both error body shapes. The document backs
//! Swagger UI (debug builds) and `cargo run --bin openapi-dump`.

use utoipa::OpenApi;

use crate::domain::{AuthProvider, ErrorCode};
use crate::inbound::http::error::FieldError;
use crate::inbound::http::health::ProbeStatus;
use crate::inbound::http::render::{ErrorBody, ProblemBody};
use crate::inbound::http::users::{UserRequest, UserResponse};

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Auth backend API",
        description = "User and role management with uniform success and error bodies."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::users::create_user,
        crate::inbound::http::users::list_users,
        crate::inbound::http::users::find_user_by_email,
        crate::inbound::http::users::get_user,
        crate::inbound::http::users::update_user,
        crate::inbound::http::users::delete_user,
        crate::inbound::http::users::add_role,
        crate::inbound::http::users::remove_role,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        UserRequest,
        UserResponse,
        AuthProvider,
        ErrorCode,
        ErrorBody,
        ProblemBody,
        FieldError,
        ProbeStatus
    )),
    tags(
        (name = "users", description = "User and role management"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
