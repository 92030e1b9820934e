//! Place Order Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};

use storefront_app::domain::{checkout::PlaceOrder, orders::status::PaymentMethod};

use crate::{
    envelope::ApiError,
    extensions::*,
    orders::{
        errors::checkout_api_error,
        models::{OrderEnvelope, ShippingAddressBody},
    },
    state::State,
};

/// Place Order Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PlaceOrderRequest {
    #[serde(default)]
    pub shipping_address: ShippingAddressBody,

    /// `CreditCard`, `PayPal` or `CashOnDelivery` (alias `COD`)
    #[serde(default)]
    pub payment_method: String,
}

impl TryFrom<PlaceOrderRequest> for PlaceOrder {
    type Error = ApiError;

    fn try_from(request: PlaceOrderRequest) -> Result<Self, Self::Error> {
        let payment_method = request
            .payment_method
            .trim()
            .parse::<PaymentMethod>()
            .map_err(|_ignored| ApiError::bad_request("Invalid payment method."))?;

        Ok(PlaceOrder {
            shipping_address: request.shipping_address.into(),
            payment_method,
        })
    }
}

/// Place Order Handler
///
/// Turns the caller's cart into an order and empties the cart.
#[endpoint(
    tags("orders"),
    summary = "Place Order",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::CREATED, description = "Order placed"),
        (status_code = StatusCode::BAD_REQUEST, description = "Empty cart or invalid shipping details"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
#[tracing::instrument(
    name = "orders.place",
    skip(json, depot, res),
    fields(user_uuid = tracing::field::Empty, order_uuid = tracing::field::Empty),
    err
)]
pub(crate) async fn handler(
    json: JsonBody<PlaceOrderRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<OrderEnvelope>, ApiError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let identity = depot.identity_or_401()?;
    let request = PlaceOrder::try_from(json.into_inner())?;

    let span = tracing::Span::current();

    span.record("user_uuid", tracing::field::display(identity.user_uuid));

    let order = state
        .app
        .checkout
        .place_order(identity.user_uuid, request)
        .await
        .map_err(|e| checkout_api_error(e, "Error placing order."))?;

    span.record("order_uuid", tracing::field::display(order.uuid));

    tracing::info!(order_uuid = %order.uuid, total = order.total_amount, "placed order");

    res.status_code(StatusCode::CREATED);

    Ok(OrderEnvelope::new("Order placed successfully.", order))
}
