//! Update Cart Item Handler

use std::sync::Arc;

use salvo::{oapi::extract::JsonBody, prelude::*};

use crate::{
    carts::{
        errors::into_api_error,
        models::{CartEnvelope, CartItemRequest},
    },
    envelope::ApiError,
    extensions::*,
    state::State,
};

/// Update Cart Item Handler
///
/// Sets the quantity of a product already in the cart and reprices the line.
#[endpoint(
    tags("cart"),
    summary = "Update Cart Item",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Quantity updated"),
        (status_code = StatusCode::BAD_REQUEST, description = "Quantity below 1"),
        (status_code = StatusCode::NOT_FOUND, description = "Cart or line not found"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
#[tracing::instrument(
    name = "cart.update",
    skip(json, depot),
    fields(user_uuid = tracing::field::Empty, product_uuid = tracing::field::Empty),
    err
)]
pub(crate) async fn handler(
    json: JsonBody<CartItemRequest>,
    depot: &mut Depot,
) -> Result<Json<CartEnvelope>, ApiError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let identity = depot.identity_or_401()?;
    let request = json.into_inner();

    let span = tracing::Span::current();

    span.record("user_uuid", tracing::field::display(identity.user_uuid));
    span.record("product_uuid", tracing::field::display(request.product_id));

    let cart = state
        .app
        .carts
        .update_item(identity.user_uuid, request.into())
        .await
        .map_err(|e| into_api_error(e, "Error updating cart item."))?;

    Ok(CartEnvelope::new("Cart item quantity updated.", cart))
}
