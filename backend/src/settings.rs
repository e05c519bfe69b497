//! Runtime configuration loaded via OrthoConfig.
//!
//! Values are layered from defaults, configuration files, environment
//! variables and command-line flags, and are read once at startup.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use ortho_config::OrthoConfig;
use serde::Deserialize;

use crate::inbound::http::render::{DEFAULT_PROBLEM_TYPE_BASE_URI, RenderConfig};

const DEFAULT_HOST: IpAddr = IpAddr::V4(Ipv4Addr::UNSPECIFIED);
const DEFAULT_PORT: u16 = 8080;

/// Error rendering switches (`APP_ERRORS_*`).
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "APP_ERRORS")]
pub struct ErrorSettings {
    /// Append the failure's cause chain to compact error bodies.
    #[ortho_config(default = false)]
    pub include_stacktrace: bool,
    /// Render RFC 7807 problem bodies instead of compact bodies.
    #[ortho_config(default = false)]
    pub use_problem_details: bool,
    /// Base URI for problem `type` links.
    pub problem_type_base_uri: Option<String>,
}

impl ErrorSettings {
    /// Return the configured base URI, falling back to the default.
    pub fn problem_type_base_uri(&self) -> &str {
        self.problem_type_base_uri
            .as_deref()
            .unwrap_or(DEFAULT_PROBLEM_TYPE_BASE_URI)
    }

    /// Renderer configuration derived from these settings.
    pub fn render_config(&self) -> RenderConfig {
        RenderConfig::new(
            self.include_stacktrace,
            self.use_problem_details,
            self.problem_type_base_uri(),
        )
    }
}

/// Listener settings (`SERVER_*`).
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "SERVER")]
pub struct ServerSettings {
    /// Interface to bind.
    pub host: Option<IpAddr>,
    /// Port to bind.
    pub port: Option<u16>,
}

impl ServerSettings {
    /// Socket address to bind, falling back to `0.0.0.0:8080`.
    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(
            self.host.unwrap_or(DEFAULT_HOST),
            self.port.unwrap_or(DEFAULT_PORT),
        )
    }
}
