//! Shared application wiring for HTTP integration suites.

use std::sync::Arc;

use actix_web::web;
use auth_backend::domain::UserService;
use auth_backend::inbound::http::app::AppDependencies;
use auth_backend::inbound::http::health::HealthState;
use auth_backend::inbound::http::render::RenderConfig;
use auth_backend::inbound::http::state::HttpState;
use auth_backend::outbound::{
    Argon2PasswordHasher, InMemoryRoleRepository, InMemoryUserRepository,
};
use mockable::DefaultClock;
use serde_json::{Value, json};

/// Fresh in-memory user service behind the HTTP state.
pub(crate) fn http_state() -> web::Data<HttpState> {
    let service = UserService::new(
        Arc::new(InMemoryUserRepository::new()),
        Arc::new(InMemoryRoleRepository::seeded()),
        Arc::new(Argon2PasswordHasher),
        Arc::new(DefaultClock),
    );
    web::Data::new(HttpState::new(Arc::new(service)))
}

/// Dependencies for one app instance; reuse `http_state` to keep data
/// across requests.
pub(crate) fn deps(http_state: web::Data<HttpState>, render: RenderConfig) -> AppDependencies {
    let health_state = web::Data::new(HealthState::new());
    health_state.mark_ready();
    AppDependencies {
        health_state,
        http_state,
        render,
    }
}

/// A create-user body that passes validation.
pub(crate) fn valid_user(email: &str) -> Value {
    json!({
        "name": "Ada Lovelace",
        "email": email,
        "password": "correct-horse"
    })
}
