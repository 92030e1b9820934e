//! Server configuration module

use clap::Parser;
use jiff::SignedDuration;

use storefront_app::{
    context::AppConfig,
    domain::{carts::CartsSettings, orders::OrdersSettings},
};

use crate::config::{
    auth::AuthConfig, db::DatabaseConfig, logging::LoggingConfig, server::ServerRuntimeConfig,
    storefront::StorefrontConfig,
};

pub(crate) mod auth;
pub(crate) mod db;
pub(crate) mod logging;
pub(crate) mod server;
pub(crate) mod storefront;

pub(crate) use logging::LogFormat;

/// Storefront JSON API Server configuration
#[derive(Debug, Parser)]
#[command(name = "storefront-json", about = "Storefront JSON API Server", long_about = None)]
pub struct ServerConfig {
    /// Server network settings.
    #[command(flatten)]
    pub server: ServerRuntimeConfig,

    /// Logging output settings.
    #[command(flatten)]
    pub logging: LoggingConfig,

    /// Application database settings.
    #[command(flatten)]
    pub database: DatabaseConfig,

    /// Token signing settings.
    #[command(flatten)]
    pub auth: AuthConfig,

    /// Cart and order behaviour switches.
    #[command(flatten)]
    pub storefront: StorefrontConfig,
}

impl ServerConfig {
    /// Load configuration from environment and CLI arguments
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be parsed
    pub fn load() -> Result<Self, clap::Error> {
        // Load .env file if present (ignore if missing)
        _ = dotenvy::dotenv();

        Self::try_parse()
    }

    /// Get the socket address for binding
    #[must_use]
    pub fn socket_addr(&self) -> String {
        self.server.socket_addr()
    }

    /// Settings for wiring the application services.
    #[must_use]
    pub fn app_config(&self) -> AppConfig {
        AppConfig {
            database_url: self.database.database_url.clone(),
            max_connections: self.database.max_connections,
            jwt_secret: self.auth.jwt_secret.clone(),
            access_ttl: SignedDuration::from_secs(self.auth.jwt_ttl_seconds),
            reset_ttl: SignedDuration::from_secs(self.auth.reset_token_ttl_seconds),
            carts: CartsSettings {
                refresh_price_on_merge: self.storefront.refresh_price_on_merge,
            },
            orders: OrdersSettings {
                empty_list_is_not_found: self.storefront.empty_order_list_is_not_found,
            },
        }
    }
}
