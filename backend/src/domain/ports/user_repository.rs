//! Port abstraction for user persistence adapters and their errors.
//!
//! Lookups report absence with `Ok(None)`; only infrastructure failures are
//! errors. The service decides which absences are domain failures.

use async_trait::async_trait;
use pagination::PageRequest;
use uuid::Uuid;

use crate::domain::User;

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by user repository adapters.
    pub enum UserPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "user repository query failed: {message}",
        /// Another user already owns the email, compared case-insensitively.
        DuplicateEmail { email: String } => "email already stored: {email}",
    }
}

/// One slice of the user table plus the total row count.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UserSlice {
    pub users: Vec<User>,
    pub total: u64,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert or update a user record.
    ///
    /// Fails with [`UserPersistenceError::DuplicateEmail`] when a different
    /// user owns the same email; the check and the write are atomic.
    async fn save(&self, user: &User) -> Result<(), UserPersistenceError>;

    /// Fetch a user by identifier.
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, UserPersistenceError>;

    /// Fetch a user by email, compared case-insensitively.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserPersistenceError>;

    /// Whether any user owns `email`, compared case-insensitively.
    async fn exists_by_email(&self, email: &str) -> Result<bool, UserPersistenceError>;

    /// Return the requested page ordered by creation time, then id.
    async fn list(&self, page: PageRequest) -> Result<UserSlice, UserPersistenceError>;

    /// Remove a user; returns `false` when no record matched.
    async fn delete(&self, id: Uuid) -> Result<bool, UserPersistenceError>;
}
