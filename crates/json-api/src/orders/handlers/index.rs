//! List Orders Handler

use std::sync::Arc;

use salvo::prelude::*;

use crate::{
    envelope::ApiError,
    extensions::*,
    orders::{errors::into_api_error, models::OrdersEnvelope},
    state::State,
};

/// List Orders Handler
///
/// The caller's orders, most recent first, with each item's current catalog
/// entry (`null` once the product has been deleted).
#[endpoint(
    tags("orders"),
    summary = "List Orders",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Orders found"),
        (status_code = StatusCode::NOT_FOUND, description = "No orders"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(depot: &mut Depot) -> Result<Json<OrdersEnvelope>, ApiError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let identity = depot.identity_or_401()?;

    let orders = state
        .app
        .orders
        .list_orders(identity.user_uuid)
        .await
        .map_err(|e| into_api_error(e, "Error fetching orders."))?;

    Ok(OrdersEnvelope::new("Orders retrieved successfully.", orders))
}
