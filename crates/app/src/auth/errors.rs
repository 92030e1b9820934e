//! Auth service errors.

use sqlx::{
    Error,
    error::{DatabaseError, ErrorKind},
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthServiceError {
    /// A required field was blank.
    #[error("{0} is required")]
    MissingRequiredData(&'static str),

    /// The email address is already registered.
    #[error("user already exists")]
    AlreadyExists,

    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("user not found")]
    NotFound,

    /// A password reset token failed validation.
    #[error("invalid or expired token")]
    InvalidOrExpiredToken,

    /// A bearer token failed validation or names a deleted user.
    #[error("unauthorized")]
    Unauthorized,

    #[error("password hashing failed: {0}")]
    PasswordHash(String),

    #[error("token signing failed")]
    Token(#[source] jsonwebtoken::errors::Error),

    #[error("storage error")]
    Sql(#[source] Error),
}

impl From<Error> for AuthServiceError {
    fn from(error: Error) -> Self {
        match error.as_database_error().map(DatabaseError::kind) {
            Some(ErrorKind::UniqueViolation) => Self::AlreadyExists,
            Some(ErrorKind::Other | _) | None => Self::Sql(error),
        }
    }
}
