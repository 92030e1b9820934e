//! Get Cart Handler

use std::sync::Arc;

use salvo::prelude::*;

use crate::{
    carts::{errors::into_api_error, models::CartEnvelope},
    envelope::ApiError,
    extensions::*,
    state::State,
};

/// Get Cart Handler
///
/// Returns the caller's cart with each line's catalog entry attached.
#[endpoint(
    tags("cart"),
    summary = "Get Cart",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Cart found"),
        (status_code = StatusCode::NOT_FOUND, description = "Cart not found"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(depot: &mut Depot) -> Result<Json<CartEnvelope>, ApiError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let identity = depot.identity_or_401()?;

    let cart = state
        .app
        .carts
        .get_cart(identity.user_uuid)
        .await
        .map_err(|e| into_api_error(e, "Error retrieving cart."))?;

    Ok(CartEnvelope::new("Cart retrieved successfully.", cart))
}
