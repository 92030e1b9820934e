//! Auth data models.

use jiff::Timestamp;

use crate::{
    auth::password::Password,
    domain::users::{Role, UserUuid},
};

/// The authenticated caller, resolved from a bearer token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Identity {
    pub user_uuid: UserUuid,
    pub role: Role,
}

impl Identity {
    #[must_use]
    pub const fn is_admin(&self) -> bool {
        matches!(self.role, Role::Admin)
    }
}

/// A signed token and the moment it stops being accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: Timestamp,
}

/// Public self-registration.
#[derive(Debug, Clone)]
pub struct Registration {
    pub name: String,
    pub email: String,
    pub password: Password,
}

/// Email and password login.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub email: String,
    pub password: Password,
}

/// Operator-created user, which may be an admin.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password: Password,
    pub role: Role,
}
