//! In-memory repositories.
//!
//! State lives behind a [`RwLock`]; a poisoned lock is reported as a
//! connection failure so callers see an internal error rather than a panic.
//! Email lookups ignore ASCII case, and `save` refuses a second owner of the
//! same email under the write lock.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use pagination::PageRequest;
use uuid::Uuid;

use crate::domain::ports::{
    RolePersistenceError, RoleRepository, UserPersistenceError, UserRepository, UserSlice,
};
use crate::domain::{DEFAULT_ROLE, Role, User};

/// Name of the administrative role seeded alongside the default role.
pub const ADMIN_ROLE: &str = "ADMIN";

fn poisoned<T>(_: PoisonError<T>) -> UserPersistenceError {
    UserPersistenceError::connection("user store lock poisoned")
}

/// User store keyed by identifier.
#[derive(Debug, Default)]
pub struct InMemoryUserRepository {
    users: RwLock<HashMap<Uuid, User>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, HashMap<Uuid, User>>, UserPersistenceError> {
        self.users.read().map_err(poisoned)
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, HashMap<Uuid, User>>, UserPersistenceError> {
        self.users.write().map_err(poisoned)
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn save(&self, user: &User) -> Result<(), UserPersistenceError> {
        let mut users = self.write()?;
        let taken = users.values().any(|other| {
            other.id() != user.id() && other.email().eq_ignore_ascii_case(user.email())
        });
        if taken {
            return Err(UserPersistenceError::duplicate_email(user.email()));
        }
        users.insert(user.id(), user.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, UserPersistenceError> {
        Ok(self.read()?.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserPersistenceError> {
        Ok(self
            .read()?
            .values()
            .find(|user| user.email().eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn exists_by_email(&self, email: &str) -> Result<bool, UserPersistenceError> {
        Ok(self
            .read()?
            .values()
            .any(|user| user.email().eq_ignore_ascii_case(email)))
    }

    async fn list(&self, page: PageRequest) -> Result<UserSlice, UserPersistenceError> {
        let guard = self.read()?;
        let mut users: Vec<&User> = guard.values().collect();
        users.sort_by(|left, right| {
            left.created_at()
                .cmp(&right.created_at())
                .then_with(|| left.id().cmp(&right.id()))
        });
        let offset = usize::try_from(page.offset()).unwrap_or(usize::MAX);
        let size = usize::try_from(page.size()).unwrap_or(usize::MAX);
        Ok(UserSlice {
            total: users.len() as u64,
            users: users.into_iter().skip(offset).take(size).cloned().collect(),
        })
    }

    async fn delete(&self, id: Uuid) -> Result<bool, UserPersistenceError> {
        Ok(self.write()?.remove(&id).is_some())
    }
}

/// Role catalogue keyed by canonical name.
#[derive(Debug)]
pub struct InMemoryRoleRepository {
    roles: RwLock<HashMap<String, Role>>,
}

impl InMemoryRoleRepository {
    /// Catalogue holding exactly `roles`.
    pub fn with_roles(roles: impl IntoIterator<Item = Role>) -> Self {
        let roles = roles
            .into_iter()
            .map(|role| (role.name().to_owned(), role))
            .collect();
        Self {
            roles: RwLock::new(roles),
        }
    }

    /// Catalogue seeded with the default and administrative roles.
    pub fn seeded() -> Self {
        Self::with_roles([
            Role::new(DEFAULT_ROLE, Some("Standard account".to_owned())),
            Role::new(ADMIN_ROLE, Some("Administrator".to_owned())),
        ])
    }
}

impl Default for InMemoryRoleRepository {
    fn default() -> Self {
        Self::seeded()
    }
}

#[async_trait]
impl RoleRepository for InMemoryRoleRepository {
    async fn find_by_name(&self, name: &str) -> Result<Option<Role>, RolePersistenceError> {
        let roles = self
            .roles
            .read()
            .map_err(|_| RolePersistenceError::connection("role store lock poisoned"))?;
        Ok(roles.get(name).cloned())
    }
}
