//! User management domain service.
//!
//! Implements [`UserManagement`] over the persistence and hashing ports.
//! Expected failures are raised as [`DomainError`]s with the status the HTTP
//! boundary should report; port failures propagate unchanged.

use std::sync::Arc;

use actix_web::http::StatusCode;
use async_trait::async_trait;
use mockable::Clock;
use pagination::{PageInfo, PageRequest};
use tracing::{debug, info};
use uuid::Uuid;

use crate::domain::ports::{
    PasswordHasher, RoleRepository, UserManagement, UserPage, UserPersistenceError,
    UserRepository, UserServiceError,
};
use crate::domain::{DEFAULT_ROLE, DomainError, ErrorCode, Role, User, UserDraft};

/// User service implementing the user management driving port.
#[derive(Clone)]
pub struct UserService<U, R, H> {
    users: Arc<U>,
    roles: Arc<R>,
    hasher: Arc<H>,
    clock: Arc<dyn Clock>,
}

impl<U, R, H> UserService<U, R, H> {
    /// Create a new service with the given ports.
    pub fn new(users: Arc<U>, roles: Arc<R>, hasher: Arc<H>, clock: Arc<dyn Clock>) -> Self {
        Self {
            users,
            roles,
            hasher,
            clock,
        }
    }
}

fn user_not_found(id: Uuid) -> DomainError {
    DomainError::not_found_with_message(ErrorCode::UserNotFound, "User not found with id: {}")
        .with_args([id.to_string()])
}

fn email_taken(email: &str) -> DomainError {
    DomainError::with_status_and_message(
        ErrorCode::UserEmailExists,
        StatusCode::CONFLICT,
        "Email already exists: {}",
    )
    .with_args([email])
}

/// Map a failed write, turning a lost uniqueness race into a conflict.
fn save_failure(err: UserPersistenceError) -> UserServiceError {
    match err {
        UserPersistenceError::DuplicateEmail { email } => email_taken(&email).into(),
        other => other.into(),
    }
}

fn role_not_found(name: &str) -> DomainError {
    DomainError::not_found_with_message(ErrorCode::RoleNotFound, "Role not found: {}")
        .with_args([name])
}

fn canonical_role(name: &str) -> String {
    name.trim().to_uppercase()
}

impl<U, R, H> UserService<U, R, H>
where
    U: UserRepository,
    R: RoleRepository,
    H: PasswordHasher,
{
    async fn load(&self, id: Uuid) -> Result<User, UserServiceError> {
        self.users
            .find_by_id(id)
            .await?
            .ok_or_else(|| user_not_found(id).into())
    }

    async fn resolve_role(&self, name: &str) -> Result<Role, UserServiceError> {
        let canonical = canonical_role(name);
        self.roles
            .find_by_name(&canonical)
            .await?
            .ok_or_else(|| role_not_found(&canonical).into())
    }

    async fn resolve_roles(&self, names: &[String]) -> Result<Vec<Role>, UserServiceError> {
        let mut roles = Vec::with_capacity(names.len());
        for name in names {
            roles.push(self.resolve_role(name).await?);
        }
        Ok(roles)
    }

    fn hash_password(&self, raw: Option<&str>) -> Result<Option<String>, UserServiceError> {
        match raw {
            Some(value) if !value.trim().is_empty() => Ok(Some(self.hasher.hash(value)?)),
            _ => Ok(None),
        }
    }
}

#[async_trait]
impl<U, R, H> UserManagement for UserService<U, R, H>
where
    U: UserRepository,
    R: RoleRepository,
    H: PasswordHasher,
{
    async fn create(&self, draft: UserDraft) -> Result<User, UserServiceError> {
        if self.users.exists_by_email(&draft.email).await? {
            return Err(email_taken(&draft.email).into());
        }
        let password_hash = self.hash_password(draft.password.as_deref())?.ok_or_else(|| {
            DomainError::with_message(ErrorCode::UserInvalidPassword, "Password is required")
        })?;

        let now = self.clock.utc();
        let mut user = User::register(draft.name, draft.email, Some(password_hash), now);
        if draft.roles.is_empty() {
            if let Some(role) = self.roles.find_by_name(DEFAULT_ROLE).await? {
                user.grant(&role, now);
            }
        } else {
            let roles = self.resolve_roles(&draft.roles).await?;
            user.replace_roles(&roles, now);
        }

        self.users.save(&user).await.map_err(save_failure)?;
        info!(user_id = %user.id(), "user created");
        Ok(user)
    }

    async fn get(&self, id: Uuid) -> Result<User, UserServiceError> {
        self.load(id).await
    }

    async fn get_by_email(&self, email: &str) -> Result<User, UserServiceError> {
        self.users.find_by_email(email).await?.ok_or_else(|| {
            DomainError::not_found_with_message(
                ErrorCode::UserNotFound,
                "User not found with email: {}",
            )
            .with_args([email])
            .into()
        })
    }

    async fn list(&self, page: PageRequest) -> Result<UserPage, UserServiceError> {
        let slice = self.users.list(page).await?;
        debug!(
            page = page.page(),
            size = page.size(),
            total = slice.total,
            "listed users"
        );
        Ok(UserPage {
            info: PageInfo::for_request(page, slice.total),
            users: slice.users,
        })
    }

    async fn update(&self, id: Uuid, draft: UserDraft) -> Result<User, UserServiceError> {
        let mut user = self.load(id).await?;
        if !user.email().eq_ignore_ascii_case(&draft.email)
            && self.users.exists_by_email(&draft.email).await?
        {
            return Err(email_taken(&draft.email).into());
        }
        let password_hash = self.hash_password(draft.password.as_deref())?;
        let roles = if draft.roles.is_empty() {
            None
        } else {
            Some(self.resolve_roles(&draft.roles).await?)
        };

        let now = self.clock.utc();
        user.update_profile(draft.name, draft.email, password_hash, now);
        if let Some(roles) = roles {
            user.replace_roles(&roles, now);
        }
        self.users.save(&user).await.map_err(save_failure)?;
        info!(user_id = %id, "user updated");
        Ok(user)
    }

    async fn delete(&self, id: Uuid) -> Result<(), UserServiceError> {
        if !self.users.delete(id).await? {
            return Err(user_not_found(id).into());
        }
        info!(user_id = %id, "user deleted");
        Ok(())
    }

    async fn add_role(&self, id: Uuid, role: &str) -> Result<User, UserServiceError> {
        let mut user = self.load(id).await?;
        let role = self.resolve_role(role).await?;
        if !user.grant(&role, self.clock.utc()) {
            return Err(DomainError::with_status(
                ErrorCode::RoleAlreadyAssigned,
                StatusCode::CONFLICT,
            )
            .into());
        }
        self.users.save(&user).await?;
        info!(user_id = %id, role = role.name(), "role granted");
        Ok(user)
    }

    async fn remove_role(&self, id: Uuid, role: &str) -> Result<User, UserServiceError> {
        let mut user = self.load(id).await?;
        let role = self.resolve_role(role).await?;
        // Revoking a role the user does not hold is a no-op.
        if user.revoke(&role, self.clock.utc()) {
            self.users.save(&user).await?;
            info!(user_id = %id, role = role.name(), "role revoked");
        }
        Ok(user)
    }
}
