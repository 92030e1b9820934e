//! Get Order Handler

use std::sync::Arc;

use salvo::{oapi::extract::PathParam, prelude::*};

use storefront_app::domain::orders::records::OrderUuid;

use crate::{
    envelope::ApiError,
    extensions::*,
    orders::{
        errors::{ORDER_NOT_FOUND, into_api_error},
        models::OrderEnvelope,
    },
    state::State,
};

/// Get Order Handler
///
/// Each item carries its current catalog entry, or `null` once the product
/// has been deleted. Malformed ids and orders belonging to other users are
/// reported as not found.
#[endpoint(
    tags("orders"),
    summary = "Get Order",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Order found"),
        (status_code = StatusCode::NOT_FOUND, description = "Order not found"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    id: PathParam<String>,
    depot: &mut Depot,
) -> Result<Json<OrderEnvelope>, ApiError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let identity = depot.identity_or_401()?;

    let order_uuid = id
        .trim()
        .parse::<OrderUuid>()
        .map_err(|_ignored| ApiError::not_found(ORDER_NOT_FOUND))?;

    let order = state
        .app
        .orders
        .get_order(identity.user_uuid, order_uuid)
        .await
        .map_err(|e| into_api_error(e, "Error fetching order details."))?;

    Ok(OrderEnvelope::new("Order retrieved successfully.", order))
}
