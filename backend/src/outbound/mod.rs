//! Outbound adapters implementing domain ports.
//!
//! - **memory**: process-local user and role stores
//! - **password**: Argon2id password hashing
//!
//! Adapters are thin translators. They contain no business logic.

pub mod memory;
pub mod password;

pub use memory::{ADMIN_ROLE, InMemoryRoleRepository, InMemoryUserRepository};
pub use password::Argon2PasswordHasher;
