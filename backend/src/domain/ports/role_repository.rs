//! Port abstraction for role lookups.

use async_trait::async_trait;

use crate::domain::Role;

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by role repository adapters.
    pub enum RolePersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "role repository connection failed: {message}",
        /// Query failed during execution.
        Query { message: String } => "role repository query failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RoleRepository: Send + Sync {
    /// Fetch a role by its canonical (upper-case) name.
    async fn find_by_name(&self, name: &str) -> Result<Option<Role>, RolePersistenceError>;
}
