//! Clear Cart Handler

use std::sync::Arc;

use salvo::prelude::*;

use crate::{
    carts::{errors::into_api_error, models::CartEnvelope},
    envelope::ApiError,
    extensions::*,
    state::State,
};

/// Clear Cart Handler
///
/// Empties the cart; the cart itself is kept.
#[endpoint(
    tags("cart"),
    summary = "Clear Cart",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Cart cleared"),
        (status_code = StatusCode::NOT_FOUND, description = "Cart not found"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
#[tracing::instrument(name = "cart.clear", skip(depot), err)]
pub(crate) async fn handler(depot: &mut Depot) -> Result<Json<CartEnvelope>, ApiError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let identity = depot.identity_or_401()?;

    let cart = state
        .app
        .carts
        .clear_cart(identity.user_uuid)
        .await
        .map_err(|e| into_api_error(e, "Error clearing cart."))?;

    Ok(CartEnvelope::new("Cart cleared successfully.", cart))
}
