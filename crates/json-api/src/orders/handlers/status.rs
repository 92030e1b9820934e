//! Update Order Status Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};

use storefront_app::domain::orders::status::OrderStatus;

use crate::{
    envelope::ApiError,
    extensions::*,
    orders::{
        errors::into_api_error,
        models::{OrderEnvelope, parse_order_id},
    },
    state::State,
};

const REQUIRED: &str = "Order ID and status are required.";

/// Update Order Status Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct UpdateStatusRequest {
    pub order_id: Option<String>,

    /// `Pending`, `Shipped`, `Delivered` or `Cancelled`
    pub status: Option<String>,
}

/// Update Order Status Handler
///
/// Moving an order to `Shipped` stamps its delivery date.
#[endpoint(
    tags("orders"),
    summary = "Update Order Status",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Status updated"),
        (status_code = StatusCode::BAD_REQUEST, description = "Missing or invalid fields"),
        (status_code = StatusCode::NOT_FOUND, description = "Order not found"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
#[tracing::instrument(
    name = "orders.update_status",
    skip(json, depot),
    fields(order_uuid = tracing::field::Empty, status = tracing::field::Empty),
    err
)]
pub(crate) async fn handler(
    json: JsonBody<UpdateStatusRequest>,
    depot: &mut Depot,
) -> Result<Json<OrderEnvelope>, ApiError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let identity = depot.identity_or_401()?;
    let request = json.into_inner();

    let status = request
        .status
        .as_deref()
        .map(str::trim)
        .filter(|status| !status.is_empty())
        .ok_or_else(|| ApiError::bad_request(REQUIRED))?
        .parse::<OrderStatus>()
        .map_err(|_ignored| ApiError::bad_request("Invalid status."))?;

    let order = parse_order_id(request.order_id.as_deref(), REQUIRED)?;

    let span = tracing::Span::current();

    span.record("order_uuid", tracing::field::display(order));
    span.record("status", status.as_str());

    let updated = state
        .app
        .orders
        .update_status(identity.user_uuid, order, status)
        .await
        .map_err(|e| into_api_error(e, "Error updating order status."))?;

    Ok(OrderEnvelope::new("Order status updated successfully.", updated))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::json;
    use testresult::TestResult;

    use storefront_app::domain::orders::records::OrderUuid;

    use crate::{
        envelope::ErrorResponse,
        test_helpers::{TestApp, make_order},
    };

    use super::*;

    fn make_service(app: TestApp) -> Service {
        app.user_service(Router::with_path("order/status").put(handler))
    }

    #[tokio::test]
    async fn test_update_status_success() -> TestResult {
        let mut app = TestApp::default();
        let uuid = OrderUuid::new();

        app.orders
            .expect_update_status()
            .once()
            .withf(move |_, order, status| *order == uuid && *status == OrderStatus::Shipped)
            .return_once(move |_, _, _| Ok(make_order(uuid, OrderStatus::Shipped)));

        let mut res = TestClient::put("http://example.com/order/status")
            .json(&json!({ "orderId": uuid.to_string(), "status": "Shipped" }))
            .send(&make_service(app))
            .await;

        let body: OrderEnvelope = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(body.message, "Order status updated successfully.");
        assert_eq!(body.order.status, "Shipped");

        Ok(())
    }

    #[tokio::test]
    async fn test_update_status_missing_fields_returns_400() -> TestResult {
        let app = TestApp::default();

        let mut res = TestClient::put("http://example.com/order/status")
            .json(&json!({ "status": "Shipped" }))
            .send(&make_service(app))
            .await;

        let body: ErrorResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));
        assert_eq!(body.message, "Order ID and status are required.");

        Ok(())
    }

    #[tokio::test]
    async fn test_update_status_unknown_status_returns_400() -> TestResult {
        let app = TestApp::default();

        let mut res = TestClient::put("http://example.com/order/status")
            .json(&json!({ "orderId": OrderUuid::new().to_string(), "status": "Processing" }))
            .send(&make_service(app))
            .await;

        let body: ErrorResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));
        assert_eq!(body.message, "Invalid status.");

        Ok(())
    }
}
