//! Server construction and adapter wiring.

mod config;

pub use config::ServerConfig;

use std::sync::Arc;

use actix_web::dev::Server;
use actix_web::{HttpServer, web};
use mockable::DefaultClock;

use auth_backend::domain::UserService;
use auth_backend::inbound::http::app::{AppDependencies, build_app};
use auth_backend::inbound::http::health::HealthState;
use auth_backend::inbound::http::state::HttpState;
use auth_backend::outbound::{
    Argon2PasswordHasher, InMemoryRoleRepository, InMemoryUserRepository,
};

fn build_http_state() -> web::Data<HttpState> {
    let service = UserService::new(
        Arc::new(InMemoryUserRepository::new()),
        Arc::new(InMemoryRoleRepository::seeded()),
        Arc::new(Argon2PasswordHasher),
        Arc::new(DefaultClock),
    );
    web::Data::new(HttpState::new(Arc::new(service)))
}

/// Construct an Actix HTTP server using the provided health state and
/// configuration.
///
/// # Errors
/// Propagates [`std::io::Error`] when binding the socket fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let server_health_state = health_state.clone();
    let http_state = build_http_state();
    let ServerConfig { bind_addr, render } = config;

    let server = HttpServer::new(move || {
        build_app(AppDependencies {
            health_state: server_health_state.clone(),
            http_state: http_state.clone(),
            render: render.clone(),
        })
    })
    .bind(bind_addr)?
    .run();

    health_state.mark_ready();
    Ok(server)
}
