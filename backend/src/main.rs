//! Backend entry-point: loads settings, initialises logging and serves the
//! REST API.

mod server;

use std::ffi::OsString;

use actix_web::web;
use color_eyre::eyre::{Result, eyre};
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use auth_backend::inbound::http::health::HealthState;
use auth_backend::settings::{ErrorSettings, ServerSettings};
use server::{ServerConfig, create_server};

const APP_NAME: &str = "auth-backend";

/// Application bootstrap.
#[actix_web::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    // Settings come from the environment and config files, not argv.
    let errors = ErrorSettings::load_from_iter([OsString::from(APP_NAME)])
        .map_err(|err| eyre!("failed to load error settings: {err}"))?;
    let server_settings = ServerSettings::load_from_iter([OsString::from(APP_NAME)])
        .map_err(|err| eyre!("failed to load server settings: {err}"))?;
    let config = ServerConfig::from_settings(&server_settings, &errors);

    info!(
        bind_addr = %config.bind_addr(),
        problem_details = errors.use_problem_details,
        include_stacktrace = errors.include_stacktrace,
        "starting server"
    );

    let health_state = web::Data::new(HealthState::new());
    create_server(health_state, config)?.await?;
    Ok(())
}
