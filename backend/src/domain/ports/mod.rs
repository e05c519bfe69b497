//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod password_hasher;
mod role_repository;
mod user_management;
mod user_repository;

#[cfg(test)]
pub use password_hasher::MockPasswordHasher;
pub use password_hasher::{FixturePasswordHasher, PasswordHashError, PasswordHasher};
#[cfg(test)]
pub use role_repository::MockRoleRepository;
pub use role_repository::{RolePersistenceError, RoleRepository};
#[cfg(test)]
pub use user_management::MockUserManagement;
pub use user_management::{UserManagement, UserPage, UserServiceError};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserPersistenceError, UserRepository, UserSlice};
