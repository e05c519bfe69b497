//! HTTP server configuration object.

use std::net::SocketAddr;

use auth_backend::inbound::http::render::RenderConfig;
use auth_backend::settings::{ErrorSettings, ServerSettings};

/// Everything the listener needs, resolved from settings at startup.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) render: RenderConfig,
}

impl ServerConfig {
    /// Resolve server and error rendering settings.
    #[must_use]
    pub fn from_settings(server: &ServerSettings, errors: &ErrorSettings) -> Self {
        Self {
            bind_addr: server.bind_addr(),
            render: errors.render_config(),
        }
    }

    /// Return the socket address the server will bind to.
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }
}
