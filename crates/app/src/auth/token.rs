//! Signed identity tokens (HS256 JWTs) and reset-token digests.

use std::fmt;

use jiff::{SignedDuration, Timestamp};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;
use uuid::Uuid;

use crate::{
    auth::{AuthServiceError, IssuedToken},
    domain::users::{Role, UserUuid},
};

/// Default access token lifetime.
pub const DEFAULT_ACCESS_TTL: SignedDuration = SignedDuration::from_hours(1);

/// Default password reset token lifetime.
pub const DEFAULT_RESET_TTL: SignedDuration = SignedDuration::from_mins(15);

/// What a token may be used for. An access token never resets a password
/// and a reset token never authenticates a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenPurpose {
    Access,
    Reset,
}

/// JWT claims.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub role: Role,
    pub purpose: TokenPurpose,
    pub iat: i64,
    pub exp: i64,
    pub jti: String,
}

impl Claims {
    /// The user the token was issued to.
    ///
    /// # Errors
    ///
    /// [`TokenError::InvalidSubject`] when `sub` is not a UUID.
    pub fn user_uuid(&self) -> Result<UserUuid, TokenError> {
        Uuid::try_parse(&self.sub)
            .map(UserUuid::from_uuid)
            .map_err(TokenError::InvalidSubject)
    }
}

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("token rejected")]
    Rejected(#[source] jsonwebtoken::errors::Error),

    #[error("token issued for a different purpose")]
    WrongPurpose,

    #[error("token subject is not a user id")]
    InvalidSubject(#[source] uuid::Error),
}

/// Signs and validates identity tokens with a shared secret.
#[derive(Clone)]
pub struct TokenIssuer {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    access_ttl: SignedDuration,
    reset_ttl: SignedDuration,
}

impl fmt::Debug for TokenIssuer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenIssuer")
            .field("access_ttl", &self.access_ttl)
            .field("reset_ttl", &self.reset_ttl)
            .finish_non_exhaustive()
    }
}

impl TokenIssuer {
    #[must_use]
    pub fn new(secret: &[u8], access_ttl: SignedDuration, reset_ttl: SignedDuration) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);

        validation.set_required_spec_claims(&["exp", "iat", "sub"]);

        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
            access_ttl,
            reset_ttl,
        }
    }

    /// Signs a token for `user` valid from `now` for the purpose's lifetime.
    ///
    /// # Errors
    ///
    /// Returns [`AuthServiceError::Token`] if signing fails, or
    /// [`AuthServiceError::InvalidOrExpiredToken`] if the expiry is not
    /// representable.
    pub fn issue(
        &self,
        user: UserUuid,
        role: Role,
        purpose: TokenPurpose,
        now: Timestamp,
    ) -> Result<IssuedToken, AuthServiceError> {
        let ttl = match purpose {
            TokenPurpose::Access => self.access_ttl,
            TokenPurpose::Reset => self.reset_ttl,
        };

        let expires_at = now
            .checked_add(ttl)
            .map_err(|_overflow| AuthServiceError::InvalidOrExpiredToken)?;

        let claims = Claims {
            sub: user.to_string(),
            role,
            purpose,
            iat: now.as_second(),
            exp: expires_at.as_second(),
            jti: Uuid::now_v7().to_string(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(AuthServiceError::Token)?;

        Ok(IssuedToken { token, expires_at })
    }

    /// Validates signature, expiry and purpose.
    ///
    /// # Errors
    ///
    /// Returns a [`TokenError`] describing why the token was rejected.
    pub fn verify(&self, token: &str, purpose: TokenPurpose) -> Result<Claims, TokenError> {
        let claims = decode::<Claims>(token, &self.decoding, &self.validation)
            .map_err(TokenError::Rejected)?
            .claims;

        if claims.purpose != purpose {
            return Err(TokenError::WrongPurpose);
        }

        Ok(claims)
    }
}

/// Hex SHA-256 digest stored in place of a raw reset token.
#[must_use]
pub fn hash_reset_token(token: &str) -> String {
    format!("{:x}", Sha256::digest(token.as_bytes()))
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    fn issuer() -> TokenIssuer {
        TokenIssuer::new(b"test-secret", DEFAULT_ACCESS_TTL, DEFAULT_RESET_TTL)
    }

    #[test]
    fn access_token_verifies_and_names_user() -> TestResult {
        let issuer = issuer();
        let user = UserUuid::new();
        let now = Timestamp::now();

        let issued = issuer.issue(user, Role::Admin, TokenPurpose::Access, now)?;
        let claims = issuer.verify(&issued.token, TokenPurpose::Access)?;

        assert_eq!(claims.user_uuid()?, user);
        assert_eq!(claims.role, Role::Admin);
        assert_eq!(issued.expires_at.as_second() - now.as_second(), 3_600);

        Ok(())
    }

    #[test]
    fn purposes_are_not_interchangeable() -> TestResult {
        let issuer = issuer();
        let user = UserUuid::new();

        let reset = issuer.issue(user, Role::User, TokenPurpose::Reset, Timestamp::now())?;
        let access = issuer.issue(user, Role::User, TokenPurpose::Access, Timestamp::now())?;

        assert!(
            matches!(issuer.verify(&reset.token, TokenPurpose::Access), Err(TokenError::WrongPurpose)),
            "reset token must not authenticate"
        );
        assert!(
            matches!(issuer.verify(&access.token, TokenPurpose::Reset), Err(TokenError::WrongPurpose)),
            "access token must not reset passwords"
        );

        Ok(())
    }

    #[test]
    fn expired_token_is_rejected() -> TestResult {
        let issuer = issuer();
        let issued_at = Timestamp::now().checked_sub(SignedDuration::from_hours(3))?;

        let issued = issuer.issue(UserUuid::new(), Role::User, TokenPurpose::Access, issued_at)?;

        let result = issuer.verify(&issued.token, TokenPurpose::Access);

        assert!(
            matches!(result, Err(TokenError::Rejected(_))),
            "expected Rejected, got {result:?}"
        );

        Ok(())
    }

    #[test]
    fn token_signed_with_other_secret_is_rejected() -> TestResult {
        let other = TokenIssuer::new(b"other-secret", DEFAULT_ACCESS_TTL, DEFAULT_RESET_TTL);
        let issued = other.issue(UserUuid::new(), Role::User, TokenPurpose::Access, Timestamp::now())?;

        let result = issuer().verify(&issued.token, TokenPurpose::Access);

        assert!(
            matches!(result, Err(TokenError::Rejected(_))),
            "expected Rejected, got {result:?}"
        );

        Ok(())
    }

    #[test]
    fn reset_token_hash_is_stable_hex() {
        let hash = hash_reset_token("abc");

        assert_eq!(hash, hash_reset_token("abc"));
        assert_eq!(hash.len(), 64);
        assert_ne!(hash, hash_reset_token("abd"));
    }
}
