//! End-to-end checks of correlation and error rendering through the full
//! middleware stack.

#[path = "support/app.rs"]
mod app_support;

use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::http::header::CONTENT_TYPE;
use actix_web::{test, web};
use async_trait::async_trait;
use auth_backend::domain::ports::{UserPersistenceError, UserRepository, UserSlice};
use auth_backend::domain::{REQUEST_ID_HEADER, User, UserService};
use auth_backend::inbound::http::app::build_app;
use auth_backend::inbound::http::render::{PROBLEM_JSON, RenderConfig};
use auth_backend::inbound::http::state::HttpState;
use auth_backend::outbound::{Argon2PasswordHasher, InMemoryRoleRepository};
use mockable::DefaultClock;
use pagination::PageRequest;
use rstest::rstest;
use serde_json::Value;
use uuid::Uuid;

/// User store whose every call fails with a connection error.
struct OfflineUsers;

fn offline() -> UserPersistenceError {
    UserPersistenceError::connection("database offline at 10.0.0.7")
}

#[async_trait]
impl UserRepository for OfflineUsers {
    async fn save(&self, _: &User) -> Result<(), UserPersistenceError> {
        Err(offline())
    }

    async fn find_by_id(&self, _: Uuid) -> Result<Option<User>, UserPersistenceError> {
        Err(offline())
    }

    async fn find_by_email(&self, _: &str) -> Result<Option<User>, UserPersistenceError> {
        Err(offline())
    }

    async fn exists_by_email(&self, _: &str) -> Result<bool, UserPersistenceError> {
        Err(offline())
    }

    async fn list(&self, _: PageRequest) -> Result<UserSlice, UserPersistenceError> {
        Err(offline())
    }

    async fn delete(&self, _: Uuid) -> Result<bool, UserPersistenceError> {
        Err(offline())
    }
}

fn offline_state() -> web::Data<HttpState> {
    let service = UserService::new(
        Arc::new(OfflineUsers),
        Arc::new(InMemoryRoleRepository::seeded()),
        Arc::new(Argon2PasswordHasher),
        Arc::new(DefaultClock),
    );
    web::Data::new(HttpState::new(Arc::new(service)))
}

struct Captured {
    status: StatusCode,
    request_id: String,
    content_type: Option<String>,
    body: Value,
}

async fn send(render: RenderConfig, req: test::TestRequest) -> Captured {
    let app = test::init_service(build_app(app_support::deps(
        app_support::http_state(),
        render,
    )))
    .await;
    capture(test::call_service(&app, req.to_request()).await).await
}

async fn capture<B>(res: actix_web::dev::ServiceResponse<B>) -> Captured
where
    B: actix_web::body::MessageBody,
{
    let status = res.status();
    let header = |name: &str| {
        res.headers()
            .get(name)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned)
    };
    let request_id = header(REQUEST_ID_HEADER).expect("request id header");
    let content_type = header(CONTENT_TYPE.as_str());
    let bytes = test::read_body(res).await;
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("json body")
    };
    Captured {
        status,
        request_id,
        content_type,
        body,
    }
}

fn unknown_user_uri() -> String {
    format!("/api/v1/users/{}", Uuid::new_v4())
}

#[rstest]
#[actix_web::test]
async fn supplied_request_id_is_echoed_in_header_and_body() {
    let req = test::TestRequest::get()
        .uri(&unknown_user_uri())
        .insert_header((REQUEST_ID_HEADER, "abc-123"));
    let captured = send(RenderConfig::default(), req).await;

    assert_eq!(captured.status, StatusCode::NOT_FOUND);
    assert_eq!(captured.request_id, "abc-123");
    assert_eq!(captured.body["requestId"], "abc-123");
}

#[rstest]
#[actix_web::test]
async fn generated_request_ids_are_distinct() {
    let first = send(RenderConfig::default(), test::TestRequest::get().uri("/health/live")).await;
    let second = send(RenderConfig::default(), test::TestRequest::get().uri("/health/live")).await;

    assert!(Uuid::parse_str(&first.request_id).is_ok());
    assert_ne!(first.request_id, second.request_id);
}

#[rstest]
#[actix_web::test]
async fn success_body_request_id_matches_header() {
    let req = test::TestRequest::post()
        .uri("/api/v1/users")
        .set_json(app_support::valid_user("ada@example.com"));
    let captured = send(RenderConfig::default(), req).await;

    assert_eq!(captured.status, StatusCode::CREATED);
    assert_eq!(captured.body["requestId"], captured.request_id.as_str());
    assert_eq!(captured.body["data"]["roles"], serde_json::json!(["USER"]));
}

#[rstest]
#[actix_web::test]
async fn unknown_user_renders_compact_not_found() {
    let uri = unknown_user_uri();
    let captured = send(RenderConfig::default(), test::TestRequest::get().uri(&uri)).await;

    assert_eq!(captured.status, StatusCode::NOT_FOUND);
    assert_eq!(captured.content_type.as_deref(), Some("application/json"));
    assert_eq!(captured.body["status"], 404);
    assert_eq!(captured.body["code"], "USER_001");
    assert_eq!(captured.body["path"], uri.as_str());
    assert!(captured.body.get("trace").is_none());
}

#[rstest]
#[actix_web::test]
async fn problem_details_change_shape_but_not_status_or_code() {
    let uri = unknown_user_uri();
    let compact = send(RenderConfig::default(), test::TestRequest::get().uri(&uri)).await;
    let problem = send(
        RenderConfig::default().with_problem_details(true),
        test::TestRequest::get().uri(&uri),
    )
    .await;

    assert_eq!(compact.status, problem.status);
    assert_eq!(compact.body["code"], problem.body["code"]);
    assert_eq!(problem.content_type.as_deref(), Some(PROBLEM_JSON));
    assert_eq!(problem.body["type"], "https://api.example.com/problems/user-001");
    assert_eq!(problem.body["instance"], uri.as_str());
    assert_eq!(problem.body["requestId"], problem.request_id.as_str());
}

#[rstest]
#[actix_web::test]
async fn two_violations_are_reported_in_field_order() {
    let req = test::TestRequest::post().uri("/api/v1/users").set_json(
        serde_json::json!({"name": "A", "email": "nope", "password": "correct-horse"}),
    );
    let captured = send(RenderConfig::default(), req).await;

    assert_eq!(captured.status, StatusCode::BAD_REQUEST);
    assert_eq!(captured.body["code"], "VAL_001");
    assert_eq!(
        captured.body["message"],
        "Validation failed for one or more fields"
    );
    let errors = captured.body["errors"].as_array().expect("errors array");
    assert_eq!(errors.len(), 2);
    assert_eq!(errors[0]["field"], "email");
    assert_eq!(errors[0]["rejectedValue"], "nope");
    assert_eq!(errors[1]["field"], "name");
}

#[rstest]
#[actix_web::test]
async fn malformed_json_is_a_bad_request() {
    let req = test::TestRequest::post()
        .uri("/api/v1/users")
        .insert_header((CONTENT_TYPE, "application/json"))
        .set_payload("{\"name\":");
    let captured = send(RenderConfig::default(), req).await;

    assert_eq!(captured.status, StatusCode::BAD_REQUEST);
    assert_eq!(captured.body["code"], "SYS_002");
    assert_eq!(captured.body["message"], "Malformed JSON request body");
}

#[rstest]
#[case("/api/v1/users/not-a-uuid", "Parameter 'id' should be of type UUID")]
#[case("/api/v1/users?page=abc", "Parameter 'page' should be of type integer")]
#[case("/api/v1/users/lookup", "Missing required parameter: email")]
#[actix_web::test]
async fn parameter_failures_name_the_parameter(#[case] uri: &str, #[case] message: &str) {
    let captured = send(RenderConfig::default(), test::TestRequest::get().uri(uri)).await;

    assert_eq!(captured.status, StatusCode::BAD_REQUEST);
    assert_eq!(captured.body["code"], "SYS_002");
    assert_eq!(captured.body["message"], message);
}

#[rstest]
#[actix_web::test]
async fn unmatched_routes_are_resource_not_found() {
    let captured = send(
        RenderConfig::default(),
        test::TestRequest::get().uri("/api/v1/nothing-here"),
    )
    .await;

    assert_eq!(captured.status, StatusCode::NOT_FOUND);
    assert_eq!(captured.body["code"], "RES_001");
    assert_eq!(captured.body["path"], "/api/v1/nothing-here");
}

#[rstest]
#[actix_web::test]
async fn user_lifecycle_through_the_stack() {
    let state = app_support::http_state();
    let app = test::init_service(build_app(app_support::deps(
        state,
        RenderConfig::default(),
    )))
    .await;

    let created = capture(
        test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/v1/users")
                .set_json(app_support::valid_user("ada@example.com"))
                .to_request(),
        )
        .await,
    )
    .await;
    let id = created.body["data"]["id"]
        .as_str()
        .expect("created id")
        .to_owned();

    let duplicate = capture(
        test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/v1/users")
                .set_json(app_support::valid_user("ADA@example.com"))
                .to_request(),
        )
        .await,
    )
    .await;
    assert_eq!(duplicate.status, StatusCode::CONFLICT);
    assert_eq!(duplicate.body["code"], "USER_002");

    let promoted = capture(
        test::call_service(
            &app,
            test::TestRequest::post()
                .uri(&format!("/api/v1/users/{id}/roles/admin"))
                .to_request(),
        )
        .await,
    )
    .await;
    assert_eq!(promoted.status, StatusCode::OK);
    assert_eq!(promoted.body["data"]["roles"], serde_json::json!(["ADMIN", "USER"]));

    let again = capture(
        test::call_service(
            &app,
            test::TestRequest::post()
                .uri(&format!("/api/v1/users/{id}/roles/ADMIN"))
                .to_request(),
        )
        .await,
    )
    .await;
    assert_eq!(again.status, StatusCode::CONFLICT);
    assert_eq!(again.body["code"], "ROLE_002");

    let listed = capture(
        test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/api/v1/users?page=0&size=10")
                .to_request(),
        )
        .await,
    )
    .await;
    assert_eq!(listed.body["pagination"]["totalElements"], 1);

    let deleted = capture(
        test::call_service(
            &app,
            test::TestRequest::delete()
                .uri(&format!("/api/v1/users/{id}"))
                .to_request(),
        )
        .await,
    )
    .await;
    assert_eq!(deleted.status, StatusCode::NO_CONTENT);
    assert_eq!(deleted.body, Value::Null);
    assert!(!deleted.request_id.is_empty());
}

#[rstest]
#[case(RenderConfig::default())]
#[case(RenderConfig::default().with_problem_details(true))]
#[actix_web::test]
async fn store_failures_render_without_trace_by_default(#[case] render: RenderConfig) {
    let app = test::init_service(build_app(app_support::deps(offline_state(), render))).await;
    let req = test::TestRequest::get().uri(&unknown_user_uri()).to_request();
    let captured = capture(test::call_service(&app, req).await).await;

    assert_eq!(captured.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(captured.body["code"], "SYS_001");
    assert!(captured.body.get("trace").is_none());
    let text = captured.body.to_string();
    assert!(!text.contains("offline"));
    assert!(!text.contains("10.0.0.7"));
}
