//! Auth service.

use std::{fmt, sync::Arc};

use async_trait::async_trait;
use jiff::Timestamp;
use mockall::automock;
use tracing::info;

use crate::{
    auth::{
        AuthServiceError, Credentials, Identity, IssuedToken, NewUser, Registration, TokenIssuer,
        TokenPurpose, hash_reset_token,
        password::{Password, PasswordHashing},
        repository::{PgUsersRepository, UsersRepository},
    },
    database::Db,
    domain::users::{Role, UserRecord, UserUuid},
};

#[derive(Clone)]
pub struct PgAuthService {
    repository: Arc<dyn UsersRepository>,
    tokens: TokenIssuer,
    hashing: PasswordHashing,
}

impl PgAuthService {
    #[must_use]
    pub fn new(db: Db, tokens: TokenIssuer) -> Self {
        Self {
            repository: Arc::new(PgUsersRepository::new(db)),
            tokens,
            hashing: PasswordHashing::default(),
        }
    }

    #[cfg(test)]
    pub(crate) fn with_repository(
        repository: impl UsersRepository + 'static,
        tokens: TokenIssuer,
    ) -> Self {
        Self {
            repository: Arc::new(repository),
            tokens,
            hashing: PasswordHashing::fast(),
        }
    }

    /// Create a user with an explicit role. Used by operators; public
    /// registration always goes through [`AuthService::register`].
    ///
    /// # Errors
    ///
    /// Returns [`AuthServiceError::MissingRequiredData`] for blank fields,
    /// [`AuthServiceError::AlreadyExists`] for a taken email, or a storage or
    /// hashing error.
    pub async fn create_user(&self, user: NewUser) -> Result<UserRecord, AuthServiceError> {
        let name = user.name.trim();
        let email = normalize_email(&user.email);

        if name.is_empty() {
            return Err(AuthServiceError::MissingRequiredData("name"));
        }

        if email.is_empty() {
            return Err(AuthServiceError::MissingRequiredData("email"));
        }

        if user.password.is_blank() {
            return Err(AuthServiceError::MissingRequiredData("password"));
        }

        if self.repository.find_user_by_email(&email).await?.is_some() {
            return Err(AuthServiceError::AlreadyExists);
        }

        let now = Timestamp::now();

        let record = UserRecord {
            uuid: UserUuid::new(),
            name: name.to_string(),
            email,
            password_hash: self.hashing.hash(&user.password)?,
            role: user.role,
            reset_token_hash: None,
            reset_expires_at: None,
            created_at: now,
            updated_at: now,
        };

        self.repository.create_user(&record).await?;

        info!(user_uuid = %record.uuid, role = %record.role, "user created");

        Ok(record)
    }

    fn issue_access(&self, user: &UserRecord) -> Result<IssuedToken, AuthServiceError> {
        self.tokens
            .issue(user.uuid, user.role, TokenPurpose::Access, Timestamp::now())
    }
}

impl fmt::Debug for PgAuthService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PgAuthService")
            .field("tokens", &self.tokens)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl AuthService for PgAuthService {
    async fn register(&self, registration: Registration) -> Result<IssuedToken, AuthServiceError> {
        let user = self
            .create_user(NewUser {
                name: registration.name,
                email: registration.email,
                password: registration.password,
                role: Role::User,
            })
            .await?;

        self.issue_access(&user)
    }

    async fn login(&self, credentials: Credentials) -> Result<IssuedToken, AuthServiceError> {
        let email = normalize_email(&credentials.email);

        let user = self
            .repository
            .find_user_by_email(&email)
            .await?
            .ok_or(AuthServiceError::InvalidCredentials)?;

        if !self
            .hashing
            .verify(&credentials.password, &user.password_hash)?
        {
            return Err(AuthServiceError::InvalidCredentials);
        }

        self.issue_access(&user)
    }

    async fn forgot_password(&self, email: &str) -> Result<IssuedToken, AuthServiceError> {
        let user = self
            .repository
            .find_user_by_email(&normalize_email(email))
            .await?
            .ok_or(AuthServiceError::NotFound)?;

        let issued = self
            .tokens
            .issue(user.uuid, user.role, TokenPurpose::Reset, Timestamp::now())?;

        let stored = self
            .repository
            .store_reset_token(user.uuid, &hash_reset_token(&issued.token), issued.expires_at)
            .await?;

        if stored == 0 {
            return Err(AuthServiceError::NotFound);
        }

        Ok(issued)
    }

    async fn reset_password(
        &self,
        token: &str,
        password: Password,
    ) -> Result<IssuedToken, AuthServiceError> {
        if password.is_blank() {
            return Err(AuthServiceError::MissingRequiredData("password"));
        }

        let user_uuid = self
            .tokens
            .verify(token, TokenPurpose::Reset)
            .and_then(|claims| claims.user_uuid())
            .map_err(|e| {
                info!(error = %e, "reset token rejected");

                AuthServiceError::InvalidOrExpiredToken
            })?;

        let user = self
            .repository
            .find_user(user_uuid)
            .await?
            .ok_or(AuthServiceError::InvalidOrExpiredToken)?;

        let now = Timestamp::now();

        let matches = user.reset_token_hash.as_deref() == Some(hash_reset_token(token).as_str());
        let live = user.reset_expires_at.is_some_and(|expires_at| expires_at > now);

        if !matches || !live {
            return Err(AuthServiceError::InvalidOrExpiredToken);
        }

        let password_hash = self.hashing.hash(&password)?;

        if self
            .repository
            .update_password(user.uuid, &password_hash, now)
            .await?
            == 0
        {
            return Err(AuthServiceError::InvalidOrExpiredToken);
        }

        self.issue_access(&user)
    }

    async fn authenticate_bearer(&self, bearer_token: &str) -> Result<Identity, AuthServiceError> {
        let user_uuid = self
            .tokens
            .verify(bearer_token, TokenPurpose::Access)
            .and_then(|claims| claims.user_uuid())
            .map_err(|_rejected| AuthServiceError::Unauthorized)?;

        let user = self
            .repository
            .find_user(user_uuid)
            .await?
            .ok_or(AuthServiceError::Unauthorized)?;

        Ok(Identity {
            user_uuid: user.uuid,
            role: user.role,
        })
    }
}

#[automock]
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Self-registration. The new account always has the `user` role.
    async fn register(&self, registration: Registration) -> Result<IssuedToken, AuthServiceError>;

    async fn login(&self, credentials: Credentials) -> Result<IssuedToken, AuthServiceError>;

    /// Issue a short-lived reset token, storing only its digest.
    async fn forgot_password(&self, email: &str) -> Result<IssuedToken, AuthServiceError>;

    /// Consume a reset token, replace the password and sign the user in.
    async fn reset_password(
        &self,
        token: &str,
        password: Password,
    ) -> Result<IssuedToken, AuthServiceError>;

    /// Resolve a bearer access token to the caller's identity.
    async fn authenticate_bearer(&self, bearer_token: &str) -> Result<Identity, AuthServiceError>;
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use jiff::SignedDuration;
    use testresult::TestResult;

    use crate::auth::{
        DEFAULT_ACCESS_TTL, DEFAULT_RESET_TTL, repository::MockUsersRepository,
    };

    use super::*;

    fn issuer() -> TokenIssuer {
        TokenIssuer::new(b"service-secret", DEFAULT_ACCESS_TTL, DEFAULT_RESET_TTL)
    }

    fn stored_user(password: &str, role: Role) -> TestResult<UserRecord> {
        let now = Timestamp::now();

        Ok(UserRecord {
            uuid: UserUuid::new(),
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            password_hash: PasswordHashing::fast().hash(&Password::new(password))?,
            role,
            reset_token_hash: None,
            reset_expires_at: None,
            created_at: now,
            updated_at: now,
        })
    }

    #[tokio::test]
    async fn register_creates_plain_user_with_normalized_email() -> TestResult {
        let mut repository = MockUsersRepository::new();

        repository
            .expect_find_user_by_email()
            .once()
            .withf(|email| email == "ada@example.com")
            .return_once(|_| Ok(None));

        repository
            .expect_create_user()
            .once()
            .withf(|user| {
                user.role == Role::User
                    && user.email == "ada@example.com"
                    && user.password_hash.starts_with("$argon2id$")
            })
            .return_once(|_| Ok(()));

        let service = PgAuthService::with_repository(repository, issuer());

        let issued = service
            .register(Registration {
                name: "Ada".to_string(),
                email: "  Ada@Example.com ".to_string(),
                password: Password::new("secret"),
            })
            .await?;

        let claims = issuer().verify(&issued.token, TokenPurpose::Access)?;

        assert_eq!(claims.role, Role::User);

        Ok(())
    }

    #[tokio::test]
    async fn register_with_taken_email_fails() {
        let mut repository = MockUsersRepository::new();

        repository
            .expect_find_user_by_email()
            .once()
            .return_once(|_| Ok(stored_user("x", Role::User).ok()));

        repository.expect_create_user().never();

        let service = PgAuthService::with_repository(repository, issuer());

        let result = service
            .register(Registration {
                name: "Ada".to_string(),
                email: "ada@example.com".to_string(),
                password: Password::new("secret"),
            })
            .await;

        assert!(
            matches!(result, Err(AuthServiceError::AlreadyExists)),
            "expected AlreadyExists, got {result:?}"
        );
    }

    #[tokio::test]
    async fn register_with_blank_password_fails() {
        let mut repository = MockUsersRepository::new();

        repository.expect_find_user_by_email().never();
        repository.expect_create_user().never();

        let service = PgAuthService::with_repository(repository, issuer());

        let result = service
            .register(Registration {
                name: "Ada".to_string(),
                email: "ada@example.com".to_string(),
                password: Password::new("   "),
            })
            .await;

        assert!(
            matches!(result, Err(AuthServiceError::MissingRequiredData("password"))),
            "expected MissingRequiredData(password), got {result:?}"
        );
    }

    #[tokio::test]
    async fn create_user_can_provision_admin() -> TestResult {
        let mut repository = MockUsersRepository::new();

        repository
            .expect_find_user_by_email()
            .once()
            .return_once(|_| Ok(None));

        repository
            .expect_create_user()
            .once()
            .withf(|user| user.role == Role::Admin)
            .return_once(|_| Ok(()));

        let service = PgAuthService::with_repository(repository, issuer());

        let user = service
            .create_user(NewUser {
                name: "Root".to_string(),
                email: "root@example.com".to_string(),
                password: Password::new("secret"),
                role: Role::Admin,
            })
            .await?;

        assert_eq!(user.role, Role::Admin);

        Ok(())
    }

    #[tokio::test]
    async fn login_with_correct_password_issues_token() -> TestResult {
        let user = stored_user("secret", Role::Admin)?;
        let user_uuid = user.uuid;
        let mut repository = MockUsersRepository::new();

        repository
            .expect_find_user_by_email()
            .once()
            .return_once(move |_| Ok(Some(user)));

        let service = PgAuthService::with_repository(repository, issuer());

        let issued = service
            .login(Credentials {
                email: "ada@example.com".to_string(),
                password: Password::new("secret"),
            })
            .await?;

        let claims = issuer().verify(&issued.token, TokenPurpose::Access)?;

        assert_eq!(claims.user_uuid()?, user_uuid);
        assert_eq!(claims.role, Role::Admin);

        Ok(())
    }

    #[tokio::test]
    async fn login_with_wrong_password_is_invalid_credentials() -> TestResult {
        let user = stored_user("secret", Role::User)?;
        let mut repository = MockUsersRepository::new();

        repository
            .expect_find_user_by_email()
            .once()
            .return_once(move |_| Ok(Some(user)));

        let service = PgAuthService::with_repository(repository, issuer());

        let result = service
            .login(Credentials {
                email: "ada@example.com".to_string(),
                password: Password::new("guess"),
            })
            .await;

        assert!(
            matches!(result, Err(AuthServiceError::InvalidCredentials)),
            "expected InvalidCredentials, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn login_for_unknown_email_is_invalid_credentials() {
        let mut repository = MockUsersRepository::new();

        repository
            .expect_find_user_by_email()
            .once()
            .return_once(|_| Ok(None));

        let service = PgAuthService::with_repository(repository, issuer());

        let result = service
            .login(Credentials {
                email: "nobody@example.com".to_string(),
                password: Password::new("secret"),
            })
            .await;

        assert!(
            matches!(result, Err(AuthServiceError::InvalidCredentials)),
            "expected InvalidCredentials, got {result:?}"
        );
    }

    #[tokio::test]
    async fn forgot_password_stores_digest_of_issued_token() -> TestResult {
        let user = stored_user("secret", Role::User)?;
        let user_uuid = user.uuid;
        let stored_hash = Arc::new(Mutex::new(None::<String>));
        let captured = Arc::clone(&stored_hash);
        let mut repository = MockUsersRepository::new();

        repository
            .expect_find_user_by_email()
            .once()
            .return_once(move |_| Ok(Some(user)));

        repository
            .expect_store_reset_token()
            .once()
            .withf(move |u, _, _| *u == user_uuid)
            .returning(move |_, hash, _| {
                if let Ok(mut slot) = captured.lock() {
                    *slot = Some(hash.to_string());
                }

                Ok(1)
            });

        let service = PgAuthService::with_repository(repository, issuer());

        let issued = service.forgot_password("ada@example.com").await?;

        let recorded = stored_hash.lock().map(|slot| slot.clone()).ok().flatten();

        assert_eq!(recorded, Some(hash_reset_token(&issued.token)));
        assert!(
            issuer().verify(&issued.token, TokenPurpose::Reset).is_ok(),
            "forgot-password must issue a reset token"
        );

        Ok(())
    }

    #[tokio::test]
    async fn forgot_password_for_unknown_email_is_not_found() {
        let mut repository = MockUsersRepository::new();

        repository
            .expect_find_user_by_email()
            .once()
            .return_once(|_| Ok(None));

        repository.expect_store_reset_token().never();

        let service = PgAuthService::with_repository(repository, issuer());

        let result = service.forgot_password("nobody@example.com").await;

        assert!(
            matches!(result, Err(AuthServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );
    }

    #[tokio::test]
    async fn reset_password_with_stored_token_replaces_hash() -> TestResult {
        let mut user = stored_user("old", Role::User)?;
        let issued = issuer().issue(user.uuid, user.role, TokenPurpose::Reset, Timestamp::now())?;

        user.reset_token_hash = Some(hash_reset_token(&issued.token));
        user.reset_expires_at = Some(issued.expires_at);

        let user_uuid = user.uuid;
        let mut repository = MockUsersRepository::new();

        repository
            .expect_find_user()
            .once()
            .withf(move |u| *u == user_uuid)
            .return_once(move |_| Ok(Some(user)));

        repository
            .expect_update_password()
            .once()
            .withf(move |u, hash, _| *u == user_uuid && hash.starts_with("$argon2id$"))
            .return_once(|_, _, _| Ok(1));

        let service = PgAuthService::with_repository(repository, issuer());

        let access = service
            .reset_password(&issued.token, Password::new("new-secret"))
            .await?;

        assert!(
            issuer().verify(&access.token, TokenPurpose::Access).is_ok(),
            "reset must sign the user in"
        );

        Ok(())
    }

    #[tokio::test]
    async fn reset_password_with_superseded_token_fails() -> TestResult {
        let mut user = stored_user("old", Role::User)?;
        let issued = issuer().issue(user.uuid, user.role, TokenPurpose::Reset, Timestamp::now())?;

        user.reset_token_hash = Some(hash_reset_token("a later token"));
        user.reset_expires_at = Some(issued.expires_at);

        let mut repository = MockUsersRepository::new();

        repository
            .expect_find_user()
            .once()
            .return_once(move |_| Ok(Some(user)));

        repository.expect_update_password().never();

        let service = PgAuthService::with_repository(repository, issuer());

        let result = service
            .reset_password(&issued.token, Password::new("new-secret"))
            .await;

        assert!(
            matches!(result, Err(AuthServiceError::InvalidOrExpiredToken)),
            "expected InvalidOrExpiredToken, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn reset_password_after_stored_expiry_fails() -> TestResult {
        let mut user = stored_user("old", Role::User)?;
        let issued = issuer().issue(user.uuid, user.role, TokenPurpose::Reset, Timestamp::now())?;

        user.reset_token_hash = Some(hash_reset_token(&issued.token));
        user.reset_expires_at = Some(Timestamp::now().checked_sub(SignedDuration::from_mins(1))?);

        let mut repository = MockUsersRepository::new();

        repository
            .expect_find_user()
            .once()
            .return_once(move |_| Ok(Some(user)));

        repository.expect_update_password().never();

        let service = PgAuthService::with_repository(repository, issuer());

        let result = service
            .reset_password(&issued.token, Password::new("new-secret"))
            .await;

        assert!(
            matches!(result, Err(AuthServiceError::InvalidOrExpiredToken)),
            "expected InvalidOrExpiredToken, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn reset_password_rejects_access_token() -> TestResult {
        let access = issuer().issue(UserUuid::new(), Role::User, TokenPurpose::Access, Timestamp::now())?;
        let mut repository = MockUsersRepository::new();

        repository.expect_find_user().never();

        let service = PgAuthService::with_repository(repository, issuer());

        let result = service
            .reset_password(&access.token, Password::new("new-secret"))
            .await;

        assert!(
            matches!(result, Err(AuthServiceError::InvalidOrExpiredToken)),
            "expected InvalidOrExpiredToken, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn authenticate_bearer_resolves_identity() -> TestResult {
        let user = stored_user("secret", Role::Admin)?;
        let user_uuid = user.uuid;
        let token = issuer().issue(user_uuid, Role::Admin, TokenPurpose::Access, Timestamp::now())?;
        let mut repository = MockUsersRepository::new();

        repository
            .expect_find_user()
            .once()
            .withf(move |u| *u == user_uuid)
            .return_once(move |_| Ok(Some(user)));

        let service = PgAuthService::with_repository(repository, issuer());

        let identity = service.authenticate_bearer(&token.token).await?;

        assert_eq!(identity.user_uuid, user_uuid);
        assert!(identity.is_admin(), "stored role must be carried");

        Ok(())
    }

    #[tokio::test]
    async fn authenticate_bearer_rejects_reset_token() -> TestResult {
        let reset = issuer().issue(UserUuid::new(), Role::User, TokenPurpose::Reset, Timestamp::now())?;
        let mut repository = MockUsersRepository::new();

        repository.expect_find_user().never();

        let service = PgAuthService::with_repository(repository, issuer());

        let result = service.authenticate_bearer(&reset.token).await;

        assert!(
            matches!(result, Err(AuthServiceError::Unauthorized)),
            "expected Unauthorized, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn authenticate_bearer_for_deleted_user_is_unauthorized() -> TestResult {
        let token = issuer().issue(UserUuid::new(), Role::User, TokenPurpose::Access, Timestamp::now())?;
        let mut repository = MockUsersRepository::new();

        repository.expect_find_user().once().return_once(|_| Ok(None));

        let service = PgAuthService::with_repository(repository, issuer());

        let result = service.authenticate_bearer(&token.token).await;

        assert!(
            matches!(result, Err(AuthServiceError::Unauthorized)),
            "expected Unauthorized, got {result:?}"
        );

        Ok(())
    }
}
