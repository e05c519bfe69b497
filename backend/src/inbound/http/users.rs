//! Users API handlers.
//!
//! ```text
//! POST   /api/v1/users {"name":"Ada Lovelace","email":"ada@example.com","password":"..."}
//! GET    /api/v1/users?page=0&size=20
//! GET    /api/v1/users/lookup?email=ada@example.com
//! GET    /api/v1/users/{id}
//! PUT    /api/v1/users/{id}
//! DELETE /api/v1/users/{id}
//! POST   /api/v1/users/{id}/roles/{role}
//! DELETE /api/v1/users/{id}/roles/{role}
//! ```
//!
//! Handlers parse identifiers and paging parameters themselves so every bad
//! input is reported through the failure taxonomy.

use std::borrow::Cow;

use actix_web::{delete, get, post, put, web};
use chrono::{DateTime, Utc};
use pagination::{DEFAULT_PAGE_SIZE, PageRequest};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::{Validate, ValidateEmail, ValidationError};

use crate::domain::{AuthProvider, DomainError, ErrorCode, User, UserDraft};

use super::ApiResult;
use super::envelope::ApiResponse;
use super::render::ErrorBody;
use super::state::HttpState;
use super::validation::{FieldName, parse_u32_or, parse_uuid, require_param, validate_payload};

const ID: FieldName = FieldName::new("id");
const PAGE: FieldName = FieldName::new("page");
const SIZE: FieldName = FieldName::new("size");
const EMAIL: FieldName = FieldName::new("email");

fn rejected(code: &'static str, message: &'static str, value: &str) -> ValidationError {
    let mut error = ValidationError::new(code).with_message(Cow::Borrowed(message));
    error.add_param(Cow::Borrowed("value"), &value);
    error
}

fn name_present(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(rejected("required", "Name is required", value));
    }
    Ok(())
}

/// Blank addresses report only the missing value, not a malformed one.
fn email_shape(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(rejected("required", "Email is required", value));
    }
    if !value.validate_email() {
        return Err(rejected("email", "Email must be valid", value));
    }
    Ok(())
}

/// Body for creating or replacing a user.
#[derive(Debug, Clone, Deserialize, Serialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserRequest {
    #[validate(
        custom(function = "name_present"),
        length(min = 2, max = 100, message = "Name must be between 2 and 100 characters")
    )]
    #[schema(example = "Ada Lovelace")]
    pub name: String,
    #[validate(custom(function = "email_shape"))]
    #[schema(example = "ada@example.com")]
    pub email: String,
    /// Required on create; omitted on update keeps the current password.
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    /// Role names. Empty on create grants the default role; empty on update
    /// keeps the current roles.
    #[serde(default)]
    #[schema(example = json!(["USER"]))]
    pub roles: Vec<String>,
}

impl From<UserRequest> for UserDraft {
    fn from(value: UserRequest) -> Self {
        Self {
            name: value.name,
            email: value.email,
            password: value.password,
            roles: value.roles,
        }
    }
}

/// Public view of a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub email_verified: bool,
    pub provider: AuthProvider,
    pub roles: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id(),
            name: user.name().to_owned(),
            email: user.email().to_owned(),
            email_verified: user.email_verified(),
            provider: user.provider(),
            roles: user.roles().map(str::to_owned).collect(),
            created_at: user.created_at(),
            updated_at: user.updated_at(),
        }
    }
}

/// Paging parameters, kept as text so parse failures name the parameter.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListUsersQuery {
    /// Zero-based page index.
    #[param(value_type = Option<u32>)]
    pub page: Option<String>,
    /// Page size, 1 to 100.
    #[param(value_type = Option<u32>)]
    pub size: Option<String>,
}

/// Email lookup parameter.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct EmailQuery {
    pub email: Option<String>,
}

/// Register a user.
#[utoipa::path(
    post,
    path = "/api/v1/users",
    request_body = UserRequest,
    responses(
        (status = 201, description = "User created", body = ApiResponse<UserResponse>),
        (status = 400, description = "Invalid request", body = ErrorBody),
        (status = 404, description = "Unknown role", body = ErrorBody),
        (status = 409, description = "Email already registered", body = ErrorBody),
        (status = 500, description = "Internal server error", body = ErrorBody)
    ),
    tags = ["users"],
    operation_id = "createUser"
)]
#[post("/users")]
pub async fn create_user(
    state: web::Data<HttpState>,
    payload: web::Json<UserRequest>,
) -> ApiResult<ApiResponse<UserResponse>> {
    let request = payload.into_inner();
    validate_payload(&request)?;
    let user = state.users.create(request.into()).await?;
    Ok(ApiResponse::created_with_message(
        UserResponse::from(&user),
        "User created successfully",
    ))
}

/// List users one page at a time.
#[utoipa::path(
    get,
    path = "/api/v1/users",
    params(ListUsersQuery),
    responses(
        (status = 200, description = "Users", body = ApiResponse<Vec<UserResponse>>),
        (status = 400, description = "Invalid paging parameters", body = ErrorBody),
        (status = 500, description = "Internal server error", body = ErrorBody)
    ),
    tags = ["users"],
    operation_id = "listUsers"
)]
#[get("/users")]
pub async fn list_users(
    state: web::Data<HttpState>,
    query: web::Query<ListUsersQuery>,
) -> ApiResult<ApiResponse<Vec<UserResponse>>> {
    let page = parse_u32_or(query.page.as_deref(), PAGE, 0)?;
    let size = parse_u32_or(query.size.as_deref(), SIZE, DEFAULT_PAGE_SIZE)?;
    let request = PageRequest::new(page, size)
        .map_err(|err| DomainError::with_message(ErrorCode::BadRequest, err.to_string()))?;
    let listing = state.users.list(request).await?;
    let users = listing.users.iter().map(UserResponse::from).collect();
    Ok(ApiResponse::paginated(
        users,
        listing.info,
        "Users retrieved successfully",
    ))
}

/// Find a user by email address.
#[utoipa::path(
    get,
    path = "/api/v1/users/lookup",
    params(EmailQuery),
    responses(
        (status = 200, description = "User", body = ApiResponse<UserResponse>),
        (status = 400, description = "Missing email", body = ErrorBody),
        (status = 404, description = "No such user", body = ErrorBody)
    ),
    tags = ["users"],
    operation_id = "findUserByEmail"
)]
#[get("/users/lookup")]
pub async fn find_user_by_email(
    state: web::Data<HttpState>,
    query: web::Query<EmailQuery>,
) -> ApiResult<ApiResponse<UserResponse>> {
    let email = require_param(query.into_inner().email, EMAIL)?;
    let user = state.users.get_by_email(&email).await?;
    Ok(ApiResponse::ok(UserResponse::from(&user)))
}

/// Fetch a user by identifier.
#[utoipa::path(
    get,
    path = "/api/v1/users/{id}",
    params(("id" = Uuid, Path, description = "User identifier")),
    responses(
        (status = 200, description = "User", body = ApiResponse<UserResponse>),
        (status = 400, description = "Malformed identifier", body = ErrorBody),
        (status = 404, description = "No such user", body = ErrorBody)
    ),
    tags = ["users"],
    operation_id = "getUser"
)]
#[get("/users/{id}")]
pub async fn get_user(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<ApiResponse<UserResponse>> {
    let id = parse_uuid(&path, ID)?;
    let user = state.users.get(id).await?;
    Ok(ApiResponse::ok(UserResponse::from(&user)))
}

/// Replace a user's profile.
#[utoipa::path(
    put,
    path = "/api/v1/users/{id}",
    params(("id" = Uuid, Path, description = "User identifier")),
    request_body = UserRequest,
    responses(
        (status = 200, description = "User updated", body = ApiResponse<UserResponse>),
        (status = 400, description = "Invalid request", body = ErrorBody),
        (status = 404, description = "No such user or role", body = ErrorBody),
        (status = 409, description = "Email already registered", body = ErrorBody)
    ),
    tags = ["users"],
    operation_id = "updateUser"
)]
#[put("/users/{id}")]
pub async fn update_user(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    payload: web::Json<UserRequest>,
) -> ApiResult<ApiResponse<UserResponse>> {
    let id = parse_uuid(&path, ID)?;
    let request = payload.into_inner();
    validate_payload(&request)?;
    let user = state.users.update(id, request.into()).await?;
    Ok(ApiResponse::ok_with_message(
        UserResponse::from(&user),
        "User updated successfully",
    ))
}

/// Delete a user.
#[utoipa::path(
    delete,
    path = "/api/v1/users/{id}",
    params(("id" = Uuid, Path, description = "User identifier")),
    responses(
        (status = 204, description = "User deleted"),
        (status = 400, description = "Malformed identifier", body = ErrorBody),
        (status = 404, description = "No such user", body = ErrorBody)
    ),
    tags = ["users"],
    operation_id = "deleteUser"
)]
#[delete("/users/{id}")]
pub async fn delete_user(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<ApiResponse<()>> {
    let id = parse_uuid(&path, ID)?;
    state.users.delete(id).await?;
    Ok(ApiResponse::no_content())
}

/// Grant a role to a user.
#[utoipa::path(
    post,
    path = "/api/v1/users/{id}/roles/{role}",
    params(
        ("id" = Uuid, Path, description = "User identifier"),
        ("role" = String, Path, description = "Role name")
    ),
    responses(
        (status = 200, description = "Role granted", body = ApiResponse<UserResponse>),
        (status = 404, description = "No such user or role", body = ErrorBody),
        (status = 409, description = "Role already assigned", body = ErrorBody)
    ),
    tags = ["users"],
    operation_id = "addUserRole"
)]
#[post("/users/{id}/roles/{role}")]
pub async fn add_role(
    state: web::Data<HttpState>,
    path: web::Path<(String, String)>,
) -> ApiResult<ApiResponse<UserResponse>> {
    let (id, role) = path.into_inner();
    let id = parse_uuid(&id, ID)?;
    let user = state.users.add_role(id, &role).await?;
    Ok(ApiResponse::ok_with_message(
        UserResponse::from(&user),
        "Role added successfully",
    ))
}

/// Revoke a role from a user.
#[utoipa::path(
    delete,
    path = "/api/v1/users/{id}/roles/{role}",
    params(
        ("id" = Uuid, Path, description = "User identifier"),
        ("role" = String, Path, description = "Role name")
    ),
    responses(
        (status = 200, description = "Role revoked", body = ApiResponse<UserResponse>),
        (status = 404, description = "No such user or role", body = ErrorBody)
    ),
    tags = ["users"],
    operation_id = "removeUserRole"
)]
#[delete("/users/{id}/roles/{role}")]
pub async fn remove_role(
    state: web::Data<HttpState>,
    path: web::Path<(String, String)>,
) -> ApiResult<ApiResponse<UserResponse>> {
    let (id, role) = path.into_inner();
    let id = parse_uuid(&id, ID)?;
    let user = state.users.remove_role(id, &role).await?;
    Ok(ApiResponse::ok_with_message(
        UserResponse::from(&user),
        "Role removed successfully",
    ))
}

/// Register every users handler on `cfg`; `lookup` precedes `{id}`.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(create_user)
        .service(list_users)
        .service(find_user_by_email)
        .service(get_user)
        .service(update_user)
        .service(delete_user)
        .service(add_role)
        .service(remove_role);
}
