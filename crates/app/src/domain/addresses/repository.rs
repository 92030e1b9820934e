//! Addresses Repository

use async_trait::async_trait;
use jiff_sqlx::Timestamp as SqlxTimestamp;
use mockall::automock;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as};

use crate::{
    database::Db,
    domain::{
        addresses::records::{AddressRecord, AddressUuid},
        users::UserUuid,
    },
};

const LIST_ADDRESSES_SQL: &str = include_str!("sql/list_addresses.sql");
const FIND_ADDRESS_SQL: &str = include_str!("sql/find_address.sql");
const DEMOTE_PRIMARY_SQL: &str = include_str!("sql/demote_primary.sql");
const INSERT_ADDRESS_SQL: &str = include_str!("sql/insert_address.sql");
const UPDATE_ADDRESS_SQL: &str = include_str!("sql/update_address.sql");
const DELETE_ADDRESS_SQL: &str = include_str!("sql/delete_address.sql");

/// Address book persistence, scoped to the owning user.
#[automock]
#[async_trait]
pub(crate) trait AddressesRepository: Send + Sync {
    async fn list_addresses(&self, user: UserUuid) -> Result<Vec<AddressRecord>, sqlx::Error>;

    async fn find_address(
        &self,
        user: UserUuid,
        address: AddressUuid,
    ) -> Result<Option<AddressRecord>, sqlx::Error>;

    /// Inserts the address; a primary address demotes the user's others in
    /// the same transaction.
    async fn insert_address(&self, address: &AddressRecord) -> Result<(), sqlx::Error>;

    /// Updates the address; a primary address demotes the user's others in
    /// the same transaction.
    async fn update_address(&self, address: &AddressRecord) -> Result<u64, sqlx::Error>;

    async fn delete_address(
        &self,
        user: UserUuid,
        address: AddressUuid,
    ) -> Result<u64, sqlx::Error>;
}

#[derive(Debug, Clone)]
pub(crate) struct PgAddressesRepository {
    db: Db,
}

impl PgAddressesRepository {
    #[must_use]
    pub(crate) fn new(db: Db) -> Self {
        Self { db }
    }
}

#[async_trait]
impl AddressesRepository for PgAddressesRepository {
    async fn list_addresses(&self, user: UserUuid) -> Result<Vec<AddressRecord>, sqlx::Error> {
        query_as::<Postgres, AddressRecord>(LIST_ADDRESSES_SQL)
            .bind(user.into_uuid())
            .fetch_all(self.db.pool())
            .await
    }

    async fn find_address(
        &self,
        user: UserUuid,
        address: AddressUuid,
    ) -> Result<Option<AddressRecord>, sqlx::Error> {
        query_as::<Postgres, AddressRecord>(FIND_ADDRESS_SQL)
            .bind(address.into_uuid())
            .bind(user.into_uuid())
            .fetch_optional(self.db.pool())
            .await
    }

    async fn insert_address(&self, address: &AddressRecord) -> Result<(), sqlx::Error> {
        let mut tx = self.db.begin().await?;

        demote_others(&mut tx, address).await?;

        query(INSERT_ADDRESS_SQL)
            .bind(address.uuid.into_uuid())
            .bind(address.user_uuid.into_uuid())
            .bind(&address.street)
            .bind(&address.city)
            .bind(&address.state)
            .bind(&address.postal_code)
            .bind(&address.country)
            .bind(address.is_primary)
            .bind(SqlxTimestamp::from(address.created_at))
            .bind(SqlxTimestamp::from(address.updated_at))
            .execute(&mut *tx)
            .await?;

        tx.commit().await
    }

    async fn update_address(&self, address: &AddressRecord) -> Result<u64, sqlx::Error> {
        let mut tx = self.db.begin().await?;

        demote_others(&mut tx, address).await?;

        let rows_affected = query(UPDATE_ADDRESS_SQL)
            .bind(address.uuid.into_uuid())
            .bind(address.user_uuid.into_uuid())
            .bind(&address.street)
            .bind(&address.city)
            .bind(&address.state)
            .bind(&address.postal_code)
            .bind(&address.country)
            .bind(address.is_primary)
            .bind(SqlxTimestamp::from(address.updated_at))
            .execute(&mut *tx)
            .await?
            .rows_affected();

        tx.commit().await?;

        Ok(rows_affected)
    }

    async fn delete_address(
        &self,
        user: UserUuid,
        address: AddressUuid,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(DELETE_ADDRESS_SQL)
            .bind(address.into_uuid())
            .bind(user.into_uuid())
            .execute(self.db.pool())
            .await?
            .rows_affected();

        Ok(rows_affected)
    }
}

async fn demote_others(
    tx: &mut Transaction<'_, Postgres>,
    address: &AddressRecord,
) -> Result<(), sqlx::Error> {
    if !address.is_primary {
        return Ok(());
    }

    query(DEMOTE_PRIMARY_SQL)
        .bind(address.user_uuid.into_uuid())
        .bind(address.uuid.into_uuid())
        .bind(SqlxTimestamp::from(address.updated_at))
        .execute(&mut **tx)
        .await?;

    Ok(())
}

impl<'r> FromRow<'r, PgRow> for AddressRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: AddressUuid::from_uuid(row.try_get("uuid")?),
            user_uuid: UserUuid::from_uuid(row.try_get("user_uuid")?),
            street: row.try_get("street")?,
            city: row.try_get("city")?,
            state: row.try_get("state")?,
            postal_code: row.try_get("postal_code")?,
            country: row.try_get("country")?,
            is_primary: row.try_get("is_primary")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}
