//! Storefront behaviour Config

use clap::{ArgAction, Args};

/// Cart and order behaviour switches.
#[derive(Debug, Args)]
pub struct StorefrontConfig {
    /// Reprice an existing cart line at the current catalog price when more
    /// units are added
    #[arg(
        long,
        env = "REFRESH_PRICE_ON_MERGE",
        default_value_t = false,
        action = ArgAction::Set
    )]
    pub refresh_price_on_merge: bool,

    /// Answer 404 instead of an empty list when a user has no orders
    #[arg(
        long,
        env = "EMPTY_ORDER_LIST_IS_NOT_FOUND",
        default_value_t = true,
        action = ArgAction::Set
    )]
    pub empty_order_list_is_not_found: bool,
}
