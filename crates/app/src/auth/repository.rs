//! Users repository.

use async_trait::async_trait;
use jiff::Timestamp;
use jiff_sqlx::Timestamp as SqlxTimestamp;
use mockall::automock;
use sqlx::{FromRow, Postgres, Row, postgres::PgRow, query, query_as};

use crate::{
    database::Db,
    domain::users::{Role, UserRecord, UserUuid},
};

const FIND_USER_BY_EMAIL_SQL: &str = include_str!("sql/find_user_by_email.sql");
const FIND_USER_SQL: &str = include_str!("sql/find_user.sql");
const CREATE_USER_SQL: &str = include_str!("sql/create_user.sql");
const STORE_RESET_TOKEN_SQL: &str = include_str!("sql/store_reset_token.sql");
const UPDATE_PASSWORD_SQL: &str = include_str!("sql/update_password.sql");

#[automock]
#[async_trait]
pub(crate) trait UsersRepository: Send + Sync {
    /// Case-insensitive email lookup.
    async fn find_user_by_email(&self, email: &str) -> Result<Option<UserRecord>, sqlx::Error>;

    async fn find_user(&self, user: UserUuid) -> Result<Option<UserRecord>, sqlx::Error>;

    async fn create_user(&self, user: &UserRecord) -> Result<(), sqlx::Error>;

    async fn store_reset_token(
        &self,
        user: UserUuid,
        token_hash: &str,
        expires_at: Timestamp,
    ) -> Result<u64, sqlx::Error>;

    /// Replaces the password hash and clears any pending reset token.
    async fn update_password(
        &self,
        user: UserUuid,
        password_hash: &str,
        now: Timestamp,
    ) -> Result<u64, sqlx::Error>;
}

#[derive(Debug, Clone)]
pub(crate) struct PgUsersRepository {
    db: Db,
}

impl PgUsersRepository {
    #[must_use]
    pub(crate) fn new(db: Db) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UsersRepository for PgUsersRepository {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<UserRecord>, sqlx::Error> {
        query_as::<Postgres, UserRecord>(FIND_USER_BY_EMAIL_SQL)
            .bind(email)
            .fetch_optional(self.db.pool())
            .await
    }

    async fn find_user(&self, user: UserUuid) -> Result<Option<UserRecord>, sqlx::Error> {
        query_as::<Postgres, UserRecord>(FIND_USER_SQL)
            .bind(user.into_uuid())
            .fetch_optional(self.db.pool())
            .await
    }

    async fn create_user(&self, user: &UserRecord) -> Result<(), sqlx::Error> {
        query(CREATE_USER_SQL)
            .bind(user.uuid.into_uuid())
            .bind(&user.name)
            .bind(&user.email)
            .bind(&user.password_hash)
            .bind(user.role.as_str())
            .bind(SqlxTimestamp::from(user.created_at))
            .bind(SqlxTimestamp::from(user.updated_at))
            .execute(self.db.pool())
            .await?;

        Ok(())
    }

    async fn store_reset_token(
        &self,
        user: UserUuid,
        token_hash: &str,
        expires_at: Timestamp,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(STORE_RESET_TOKEN_SQL)
            .bind(user.into_uuid())
            .bind(token_hash)
            .bind(SqlxTimestamp::from(expires_at))
            .execute(self.db.pool())
            .await?
            .rows_affected();

        Ok(rows_affected)
    }

    async fn update_password(
        &self,
        user: UserUuid,
        password_hash: &str,
        now: Timestamp,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(UPDATE_PASSWORD_SQL)
            .bind(user.into_uuid())
            .bind(password_hash)
            .bind(SqlxTimestamp::from(now))
            .execute(self.db.pool())
            .await?
            .rows_affected();

        Ok(rows_affected)
    }
}

impl<'r> FromRow<'r, PgRow> for UserRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let role: String = row.try_get("role")?;

        Ok(Self {
            uuid: UserUuid::from_uuid(row.try_get("uuid")?),
            name: row.try_get("name")?,
            email: row.try_get("email")?,
            password_hash: row.try_get("password_hash")?,
            role: role.parse::<Role>().map_err(|e| sqlx::Error::ColumnDecode {
                index: "role".to_string(),
                source: Box::new(e),
            })?,
            reset_token_hash: row.try_get("reset_token_hash")?,
            reset_expires_at: row
                .try_get::<Option<SqlxTimestamp>, _>("reset_expires_at")?
                .map(SqlxTimestamp::to_jiff),
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}
