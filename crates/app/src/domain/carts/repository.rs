//! Carts Repository

use async_trait::async_trait;
use jiff_sqlx::Timestamp as SqlxTimestamp;
use mockall::automock;
use sqlx::{FromRow, Postgres, Row, postgres::PgRow, query, query_as};
use uuid::Uuid;

use crate::{
    database::{Db, LineColumns, amount_from_i64, amount_to_i64},
    domain::{
        carts::records::{CartLineRecord, CartRecord, CartUuid},
        products::records::ProductUuid,
        users::UserUuid,
    },
};

const FIND_CART_SQL: &str = include_str!("sql/find_cart.sql");
const LIST_CART_ITEMS_SQL: &str = include_str!("sql/list_cart_items.sql");
const UPSERT_CART_SQL: &str = include_str!("sql/upsert_cart.sql");
const DELETE_CART_ITEMS_SQL: &str = include_str!("sql/delete_cart_items.sql");
const INSERT_CART_ITEMS_SQL: &str = include_str!("sql/insert_cart_items.sql");

/// Cart persistence, one cart per user.
#[automock]
#[async_trait]
pub(crate) trait CartsRepository: Send + Sync {
    async fn find_cart(&self, user: UserUuid) -> Result<Option<CartRecord>, sqlx::Error>;

    /// Writes the cart row and replaces its lines in one transaction.
    ///
    /// Returns the stored cart; when another request created the user's cart
    /// first, its identifier wins.
    async fn save_cart(&self, cart: &CartRecord) -> Result<CartRecord, sqlx::Error>;
}

#[derive(Debug, Clone)]
pub(crate) struct PgCartsRepository {
    db: Db,
}

impl PgCartsRepository {
    #[must_use]
    pub(crate) fn new(db: Db) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CartsRepository for PgCartsRepository {
    async fn find_cart(&self, user: UserUuid) -> Result<Option<CartRecord>, sqlx::Error> {
        let mut tx = self.db.begin().await?;

        let Some(mut cart) = query_as::<Postgres, CartRecord>(FIND_CART_SQL)
            .bind(user.into_uuid())
            .fetch_optional(&mut *tx)
            .await?
        else {
            return Ok(None);
        };

        cart.lines = query_as::<Postgres, CartLineRecord>(LIST_CART_ITEMS_SQL)
            .bind(cart.uuid.into_uuid())
            .fetch_all(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(Some(cart))
    }

    async fn save_cart(&self, cart: &CartRecord) -> Result<CartRecord, sqlx::Error> {
        let mut items = LineColumns::with_capacity(cart.lines.len());

        for line in &cart.lines {
            items.push(
                line.product_uuid.into_uuid(),
                line.quantity,
                line.unit_price,
                line.line_total,
            )?;
        }

        let mut tx = self.db.begin().await?;

        let (uuid, created_at): (Uuid, SqlxTimestamp) = query_as(UPSERT_CART_SQL)
            .bind(cart.uuid.into_uuid())
            .bind(cart.user_uuid.into_uuid())
            .bind(amount_to_i64(cart.total, "total")?)
            .bind(SqlxTimestamp::from(cart.created_at))
            .bind(SqlxTimestamp::from(cart.updated_at))
            .fetch_one(&mut *tx)
            .await?;

        query(DELETE_CART_ITEMS_SQL)
            .bind(uuid)
            .execute(&mut *tx)
            .await?;

        if !cart.lines.is_empty() {
            query(INSERT_CART_ITEMS_SQL)
                .bind(uuid)
                .bind(items.product_uuids)
                .bind(items.positions)
                .bind(items.quantities)
                .bind(items.unit_prices)
                .bind(items.line_totals)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;

        Ok(CartRecord {
            uuid: CartUuid::from_uuid(uuid),
            created_at: created_at.to_jiff(),
            ..cart.clone()
        })
    }
}

impl<'r> FromRow<'r, PgRow> for CartRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: CartUuid::from_uuid(row.try_get("uuid")?),
            user_uuid: UserUuid::from_uuid(row.try_get("user_uuid")?),
            lines: Vec::new(),
            total: amount_from_i64(row.try_get("total")?, "total")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}

impl<'r> FromRow<'r, PgRow> for CartLineRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let quantity: i32 = row.try_get("quantity")?;

        Ok(Self {
            product_uuid: ProductUuid::from_uuid(row.try_get("product_uuid")?),
            quantity: u32::try_from(quantity).map_err(|e| sqlx::Error::ColumnDecode {
                index: "quantity".to_string(),
                source: Box::new(e),
            })?,
            unit_price: amount_from_i64(row.try_get("unit_price")?, "unit_price")?,
            line_total: amount_from_i64(row.try_get("line_total")?, "line_total")?,
        })
    }
}
