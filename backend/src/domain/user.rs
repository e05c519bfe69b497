//! User and role data model.
//!
//! Role membership is stored by role name in a sorted set so responses list
//! roles deterministically. Password hashes never leave the domain: the HTTP
//! adapter maps [`User`] into a response DTO without them.

use std::collections::BTreeSet;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Role granted to new users when the request names none.
pub const DEFAULT_ROLE: &str = "USER";

/// Identity provider that created the account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum AuthProvider {
    /// Email and password registration.
    #[default]
    Local,
    /// GitHub OAuth login.
    Github,
    /// Google OAuth login.
    Google,
}

/// Named permission set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Role {
    name: String,
    description: Option<String>,
}

impl Role {
    /// Create a role. Names are stored upper-cased.
    pub fn new(name: impl AsRef<str>, description: Option<String>) -> Self {
        Self {
            name: name.as_ref().trim().to_uppercase(),
            description,
        }
    }

    /// Canonical role name.
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}

/// Registered account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    id: Uuid,
    name: String,
    email: String,
    password_hash: Option<String>,
    email_verified: bool,
    provider: AuthProvider,
    roles: BTreeSet<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl User {
    /// Create a local account stamped with `now`.
    pub fn register(
        name: impl Into<String>,
        email: impl Into<String>,
        password_hash: Option<String>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            email: email.into(),
            password_hash,
            email_verified: false,
            provider: AuthProvider::Local,
            roles: BTreeSet::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    pub fn email(&self) -> &str {
        self.email.as_str()
    }

    pub fn password_hash(&self) -> Option<&str> {
        self.password_hash.as_deref()
    }

    pub fn email_verified(&self) -> bool {
        self.email_verified
    }

    pub fn provider(&self) -> AuthProvider {
        self.provider
    }

    /// Role names held by the user, sorted.
    pub fn roles(&self) -> impl Iterator<Item = &str> {
        self.roles.iter().map(String::as_str)
    }

    pub fn has_role(&self, role: &str) -> bool {
        self.roles.contains(role)
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Replace profile fields; `None` keeps the existing password hash.
    pub fn update_profile(
        &mut self,
        name: impl Into<String>,
        email: impl Into<String>,
        password_hash: Option<String>,
        now: DateTime<Utc>,
    ) {
        self.name = name.into();
        self.email = email.into();
        if password_hash.is_some() {
            self.password_hash = password_hash;
        }
        self.updated_at = now;
    }

    /// Grant `role`; returns `false` when it was already held.
    pub fn grant(&mut self, role: &Role, now: DateTime<Utc>) -> bool {
        let inserted = self.roles.insert(role.name().to_owned());
        if inserted {
            self.updated_at = now;
        }
        inserted
    }

    /// Revoke `role`; returns `false` when it was not held.
    pub fn revoke(&mut self, role: &Role, now: DateTime<Utc>) -> bool {
        let removed = self.roles.remove(role.name());
        if removed {
            self.updated_at = now;
        }
        removed
    }

    /// Replace every role with `roles`.
    pub fn replace_roles<'a>(
        &mut self,
        roles: impl IntoIterator<Item = &'a Role>,
        now: DateTime<Utc>,
    ) {
        self.roles = roles.into_iter().map(|role| role.name().to_owned()).collect();
        self.updated_at = now;
    }
}

impl fmt::Display for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} <{}>", self.name, self.email)
    }
}

/// Input for creating or fully updating a user.
///
/// Field-level validation happens in the inbound adapter; the service only
/// enforces business rules such as email uniqueness and role existence.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UserDraft {
    pub name: String,
    pub email: String,
    pub password: Option<String>,
    pub roles: Vec<String>,
}
