//! Driving port for user and role management use-cases.
//!
//! Inbound adapters depend on this trait only. Expected failures arrive as
//! [`DomainError`]s; infrastructure failures keep their port error so the
//! boundary can report them as internal errors with the cause attached.

use async_trait::async_trait;
use pagination::{PageInfo, PageRequest};
use uuid::Uuid;

use crate::domain::{DomainError, User, UserDraft};

use super::{PasswordHashError, RolePersistenceError, UserPersistenceError};

/// Failures surfaced by [`UserManagement`].
#[derive(Debug, thiserror::Error)]
pub enum UserServiceError {
    /// Expected business failure.
    #[error(transparent)]
    Domain(#[from] DomainError),
    /// The user store failed.
    #[error("user store unavailable")]
    UserStore(#[from] UserPersistenceError),
    /// The role store failed.
    #[error("role store unavailable")]
    RoleStore(#[from] RolePersistenceError),
    /// The password could not be hashed.
    #[error("password could not be hashed")]
    Hashing(#[from] PasswordHashError),
}

/// Page of users plus its metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserPage {
    pub users: Vec<User>,
    pub info: PageInfo,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserManagement: Send + Sync {
    /// Register a user; rejects duplicate emails and unknown roles.
    async fn create(&self, draft: UserDraft) -> Result<User, UserServiceError>;

    /// Fetch a user by identifier.
    async fn get(&self, id: Uuid) -> Result<User, UserServiceError>;

    /// Fetch a user by email.
    async fn get_by_email(&self, email: &str) -> Result<User, UserServiceError>;

    /// List users one page at a time.
    async fn list(&self, page: PageRequest) -> Result<UserPage, UserServiceError>;

    /// Replace a user's profile and, when given, their roles.
    async fn update(&self, id: Uuid, draft: UserDraft) -> Result<User, UserServiceError>;

    /// Delete a user.
    async fn delete(&self, id: Uuid) -> Result<(), UserServiceError>;

    /// Grant a role to a user.
    async fn add_role(&self, id: Uuid, role: &str) -> Result<User, UserServiceError>;

    /// Revoke a role from a user.
    async fn remove_role(&self, id: Uuid, role: &str) -> Result<User, UserServiceError>;
}
