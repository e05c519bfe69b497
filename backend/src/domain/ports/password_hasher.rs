//! Port for one-way password hashing.

use super::define_port_error;

define_port_error! {
    /// Errors raised while hashing a password.
    pub enum PasswordHashError {
        /// The hashing backend rejected the input.
        Rejected { message: String } => "password hashing failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
pub trait PasswordHasher: Send + Sync {
    /// Derive the stored representation of `raw`.
    fn hash(&self, raw: &str) -> Result<String, PasswordHashError>;
}

/// Fixture hasher that tags the raw value instead of hashing it.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixturePasswordHasher;

impl PasswordHasher for FixturePasswordHasher {
    fn hash(&self, raw: &str) -> Result<String, PasswordHashError> {
        Ok(format!("fixture:{raw}"))
    }
}
