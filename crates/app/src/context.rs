//! App Context

use std::{fmt, sync::Arc};

use jiff::SignedDuration;
use thiserror::Error;
use tracing::info;

use crate::{
    auth::{AuthService, PgAuthService, TokenIssuer},
    database::{self, Db},
    domain::{
        addresses::{AddressesService, PgAddressesService},
        carts::{CartsService, CartsSettings, PgCartsService},
        checkout::{CartCheckoutService, CheckoutService},
        orders::{OrdersService, OrdersSettings, PgOrdersService},
        products::{PgProductsService, ProductsService},
    },
};

#[derive(Debug, Error)]
pub enum AppInitError {
    #[error("failed to connect to database")]
    Database(#[source] sqlx::Error),

    #[error("failed to apply database migrations")]
    Migrate(#[source] sqlx::migrate::MigrateError),
}

/// Everything needed to wire the services together.
#[derive(Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub max_connections: u32,
    pub jwt_secret: String,
    pub access_ttl: SignedDuration,
    pub reset_ttl: SignedDuration,
    pub carts: CartsSettings,
    pub orders: OrdersSettings,
}

impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("max_connections", &self.max_connections)
            .field("access_ttl", &self.access_ttl)
            .field("reset_ttl", &self.reset_ttl)
            .field("carts", &self.carts)
            .field("orders", &self.orders)
            .finish_non_exhaustive()
    }
}

#[derive(Clone)]
pub struct AppContext {
    pub auth: Arc<dyn AuthService>,
    pub products: Arc<dyn ProductsService>,
    pub carts: Arc<dyn CartsService>,
    pub orders: Arc<dyn OrdersService>,
    pub checkout: Arc<dyn CheckoutService>,
    pub addresses: Arc<dyn AddressesService>,
}

impl AppContext {
    /// Connect, migrate and build the service graph.
    ///
    /// # Errors
    ///
    /// Returns an error when establishing a database connection or applying
    /// migrations fails.
    pub async fn from_config(config: &AppConfig) -> Result<Self, AppInitError> {
        let pool = database::connect(&config.database_url, config.max_connections)
            .await
            .map_err(AppInitError::Database)?;

        database::migrate(&pool)
            .await
            .map_err(AppInitError::Migrate)?;

        info!("database migrations applied");

        let db = Db::new(pool);
        let tokens = TokenIssuer::new(
            config.jwt_secret.as_bytes(),
            config.access_ttl,
            config.reset_ttl,
        );

        Ok(Self::from_db(db, tokens, config.carts, config.orders))
    }

    /// Build the service graph over an existing connection pool.
    #[must_use]
    pub fn from_db(
        db: Db,
        tokens: TokenIssuer,
        carts: CartsSettings,
        orders: OrdersSettings,
    ) -> Self {
        let products: Arc<dyn ProductsService> = Arc::new(PgProductsService::new(db.clone()));
        let carts: Arc<dyn CartsService> =
            Arc::new(PgCartsService::new(db.clone(), Arc::clone(&products), carts));
        let orders: Arc<dyn OrdersService> = Arc::new(PgOrdersService::new(
            db.clone(),
            Arc::clone(&products),
            orders,
        ));

        Self {
            auth: Arc::new(PgAuthService::new(db.clone(), tokens)),
            checkout: Arc::new(CartCheckoutService::new(
                Arc::clone(&carts),
                Arc::clone(&orders),
            )),
            addresses: Arc::new(PgAddressesService::new(db)),
            products,
            carts,
            orders,
        }
    }
}

impl fmt::Debug for AppContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppContext").finish_non_exhaustive()
    }
}
