//! Database connection management

use sqlx::{
    PgPool, Postgres, Transaction,
    migrate::{MigrateError, Migrator},
    postgres::PgPoolOptions,
};
use uuid::Uuid;

/// Embedded schema migrations.
pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Default upper bound on pooled connections.
pub const DEFAULT_MAX_CONNECTIONS: u32 = 10;

#[derive(Debug, Clone)]
pub struct Db {
    pool: PgPool,
}

impl Db {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Underlying connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Begin a transaction.
    ///
    /// # Errors
    ///
    /// Returns an error when a connection cannot be acquired.
    pub async fn begin(&self) -> Result<Transaction<'static, Postgres>, sqlx::Error> {
        self.pool.begin().await
    }
}

/// Connect to `PostgreSQL`.
///
/// # Errors
///
/// Returns an error if the connection cannot be established.
pub async fn connect(database_url: &str, max_connections: u32) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await
}

/// Apply any pending schema migrations.
///
/// # Errors
///
/// Returns an error when a migration fails to apply.
pub async fn migrate(pool: &PgPool) -> Result<(), MigrateError> {
    MIGRATOR.run(pool).await
}

/// Converts a minor-unit amount to the signed column type.
pub(crate) fn amount_to_i64(amount: u64, column: &str) -> Result<i64, sqlx::Error> {
    i64::try_from(amount).map_err(|e| sqlx::Error::Encode(format!("{column}: {e}").into()))
}

/// Reads a signed amount column back into minor units.
pub(crate) fn amount_from_i64(amount: i64, column: &str) -> Result<u64, sqlx::Error> {
    u64::try_from(amount).map_err(|e| sqlx::Error::ColumnDecode {
        index: column.to_string(),
        source: Box::new(e),
    })
}

/// Column-wise priced line values, bound as arrays for a single `UNNEST`
/// insert. Positions follow push order.
#[derive(Debug, Default)]
pub(crate) struct LineColumns {
    pub(crate) product_uuids: Vec<Uuid>,
    pub(crate) positions: Vec<i32>,
    pub(crate) quantities: Vec<i32>,
    pub(crate) unit_prices: Vec<i64>,
    pub(crate) line_totals: Vec<i64>,
}

impl LineColumns {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            product_uuids: Vec::with_capacity(capacity),
            positions: Vec::with_capacity(capacity),
            quantities: Vec::with_capacity(capacity),
            unit_prices: Vec::with_capacity(capacity),
            line_totals: Vec::with_capacity(capacity),
        }
    }

    pub(crate) fn push(
        &mut self,
        product: Uuid,
        quantity: u32,
        unit_price: u64,
        line_total: u64,
    ) -> Result<(), sqlx::Error> {
        let position = i32::try_from(self.product_uuids.len())
            .map_err(|e| sqlx::Error::Encode(Box::new(e)))?;
        let quantity = i32::try_from(quantity).map_err(|e| sqlx::Error::Encode(Box::new(e)))?;

        self.product_uuids.push(product);
        self.positions.push(position);
        self.quantities.push(quantity);
        self.unit_prices.push(amount_to_i64(unit_price, "unit_price")?);
        self.line_totals.push(amount_to_i64(line_total, "line_total")?);

        Ok(())
    }
}
