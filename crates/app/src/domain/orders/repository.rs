//! Orders Repository

use async_trait::async_trait;
use jiff_sqlx::Timestamp as SqlxTimestamp;
use mockall::automock;
use rustc_hash::FxHashMap;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as};
use uuid::Uuid;

use crate::{
    database::{Db, LineColumns, amount_from_i64, amount_to_i64},
    domain::{
        orders::{
            data::ShippingAddress,
            records::{OrderItemRecord, OrderRecord, OrderUuid},
            status::{OrderStatus, PaymentMethod},
        },
        products::records::ProductUuid,
        users::UserUuid,
    },
};

const INSERT_ORDER_SQL: &str = include_str!("sql/insert_order.sql");
const INSERT_ORDER_ITEMS_SQL: &str = include_str!("sql/insert_order_items.sql");
const FIND_ORDER_SQL: &str = include_str!("sql/find_order.sql");
const LIST_ORDERS_SQL: &str = include_str!("sql/list_orders.sql");
const LIST_ORDER_ITEMS_SQL: &str = include_str!("sql/list_order_items.sql");
const UPDATE_ORDER_STATUS_SQL: &str = include_str!("sql/update_order_status.sql");

/// Order persistence. Lookups are always scoped to the owning user.
#[automock]
#[async_trait]
pub(crate) trait OrdersRepository: Send + Sync {
    /// Writes the order and its items in one transaction.
    async fn insert_order(&self, order: &OrderRecord) -> Result<(), sqlx::Error>;

    async fn find_order(
        &self,
        user: UserUuid,
        order: OrderUuid,
    ) -> Result<Option<OrderRecord>, sqlx::Error>;

    /// The user's orders, most recent first.
    async fn list_orders(&self, user: UserUuid) -> Result<Vec<OrderRecord>, sqlx::Error>;

    /// Persists `status` and `delivery_date`.
    async fn update_status(&self, order: &OrderRecord) -> Result<u64, sqlx::Error>;
}

#[derive(Debug, Clone)]
pub(crate) struct PgOrdersRepository {
    db: Db,
}

impl PgOrdersRepository {
    #[must_use]
    pub(crate) fn new(db: Db) -> Self {
        Self { db }
    }
}

#[async_trait]
impl OrdersRepository for PgOrdersRepository {
    async fn insert_order(&self, order: &OrderRecord) -> Result<(), sqlx::Error> {
        let mut items = LineColumns::with_capacity(order.items.len());

        for item in &order.items {
            items.push(
                item.product_uuid.into_uuid(),
                item.quantity,
                item.unit_price,
                item.line_total,
            )?;
        }

        let mut tx = self.db.begin().await?;

        query(INSERT_ORDER_SQL)
            .bind(order.uuid.into_uuid())
            .bind(order.user_uuid.into_uuid())
            .bind(amount_to_i64(order.total_amount, "total_amount")?)
            .bind(&order.shipping_address.street)
            .bind(&order.shipping_address.city)
            .bind(&order.shipping_address.postal_code)
            .bind(&order.shipping_address.country)
            .bind(order.payment_method.as_str())
            .bind(order.status.as_str())
            .bind(SqlxTimestamp::from(order.ordered_at))
            .bind(order.delivery_date.map(SqlxTimestamp::from))
            .execute(&mut *tx)
            .await?;

        query(INSERT_ORDER_ITEMS_SQL)
            .bind(order.uuid.into_uuid())
            .bind(items.product_uuids)
            .bind(items.positions)
            .bind(items.quantities)
            .bind(items.unit_prices)
            .bind(items.line_totals)
            .execute(&mut *tx)
            .await?;

        tx.commit().await
    }

    async fn find_order(
        &self,
        user: UserUuid,
        order: OrderUuid,
    ) -> Result<Option<OrderRecord>, sqlx::Error> {
        let mut tx = self.db.begin().await?;

        let Some(order) = query_as::<Postgres, OrderRecord>(FIND_ORDER_SQL)
            .bind(order.into_uuid())
            .bind(user.into_uuid())
            .fetch_optional(&mut *tx)
            .await?
        else {
            return Ok(None);
        };

        let mut orders = [order];

        attach_items(&mut tx, &mut orders).await?;

        tx.commit().await?;

        let [order] = orders;

        Ok(Some(order))
    }

    async fn list_orders(&self, user: UserUuid) -> Result<Vec<OrderRecord>, sqlx::Error> {
        let mut tx = self.db.begin().await?;

        let mut orders = query_as::<Postgres, OrderRecord>(LIST_ORDERS_SQL)
            .bind(user.into_uuid())
            .fetch_all(&mut *tx)
            .await?;

        attach_items(&mut tx, &mut orders).await?;

        tx.commit().await?;

        Ok(orders)
    }

    async fn update_status(&self, order: &OrderRecord) -> Result<u64, sqlx::Error> {
        let rows_affected = query(UPDATE_ORDER_STATUS_SQL)
            .bind(order.uuid.into_uuid())
            .bind(order.user_uuid.into_uuid())
            .bind(order.status.as_str())
            .bind(order.delivery_date.map(SqlxTimestamp::from))
            .execute(self.db.pool())
            .await?
            .rows_affected();

        Ok(rows_affected)
    }
}

async fn attach_items(
    tx: &mut Transaction<'_, Postgres>,
    orders: &mut [OrderRecord],
) -> Result<(), sqlx::Error> {
    if orders.is_empty() {
        return Ok(());
    }

    let uuids: Vec<Uuid> = orders.iter().map(|o| o.uuid.into_uuid()).collect();

    let rows = query_as::<Postgres, OrderItemRow>(LIST_ORDER_ITEMS_SQL)
        .bind(uuids)
        .fetch_all(&mut **tx)
        .await?;

    let mut by_order: FxHashMap<OrderUuid, Vec<OrderItemRecord>> = FxHashMap::default();

    for row in rows {
        by_order.entry(row.order_uuid).or_default().push(row.item);
    }

    for order in orders {
        if let Some(items) = by_order.remove(&order.uuid) {
            order.items = items;
        }
    }

    Ok(())
}

struct OrderItemRow {
    order_uuid: OrderUuid,
    item: OrderItemRecord,
}

fn decode_error(column: &str, error: impl std::error::Error + Send + Sync + 'static) -> sqlx::Error {
    sqlx::Error::ColumnDecode {
        index: column.to_string(),
        source: Box::new(error),
    }
}

impl<'r> FromRow<'r, PgRow> for OrderItemRow {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let quantity: i32 = row.try_get("quantity")?;

        Ok(Self {
            order_uuid: OrderUuid::from_uuid(row.try_get("order_uuid")?),
            item: OrderItemRecord {
                product_uuid: ProductUuid::from_uuid(row.try_get("product_uuid")?),
                quantity: u32::try_from(quantity).map_err(|e| decode_error("quantity", e))?,
                unit_price: amount_from_i64(row.try_get("unit_price")?, "unit_price")?,
                line_total: amount_from_i64(row.try_get("line_total")?, "line_total")?,
            },
        })
    }
}

impl<'r> FromRow<'r, PgRow> for OrderRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let payment_method: String = row.try_get("payment_method")?;
        let status: String = row.try_get("status")?;

        Ok(Self {
            uuid: OrderUuid::from_uuid(row.try_get("uuid")?),
            user_uuid: UserUuid::from_uuid(row.try_get("user_uuid")?),
            items: Vec::new(),
            total_amount: amount_from_i64(row.try_get("total_amount")?, "total_amount")?,
            shipping_address: ShippingAddress {
                street: row.try_get("shipping_street")?,
                city: row.try_get("shipping_city")?,
                postal_code: row.try_get("shipping_postal_code")?,
                country: row.try_get("shipping_country")?,
            },
            payment_method: payment_method
                .parse::<PaymentMethod>()
                .map_err(|e| decode_error("payment_method", e))?,
            status: status
                .parse::<OrderStatus>()
                .map_err(|e| decode_error("status", e))?,
            ordered_at: row.try_get::<SqlxTimestamp, _>("ordered_at")?.to_jiff(),
            delivery_date: row
                .try_get::<Option<SqlxTimestamp>, _>("delivery_date")?
                .map(SqlxTimestamp::to_jiff),
        })
    }
}
