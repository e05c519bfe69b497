//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::UserManagement;

/// Port implementations available to HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub users: Arc<dyn UserManagement>,
}

impl HttpState {
    /// Construct state from the user management port.
    pub fn new(users: Arc<dyn UserManagement>) -> Self {
        Self { users }
    }
}
