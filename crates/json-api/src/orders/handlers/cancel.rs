//! Cancel Order Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};

use crate::{
    envelope::ApiError,
    extensions::*,
    orders::{
        errors::into_api_error,
        models::{OrderEnvelope, parse_order_id},
    },
    state::State,
};

/// Cancel Order Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CancelOrderRequest {
    pub order_id: Option<String>,
}

/// Cancel Order Handler
///
/// Shipped and delivered orders cannot be cancelled. Cancelling an already
/// cancelled order succeeds.
#[endpoint(
    tags("orders"),
    summary = "Cancel Order",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Order cancelled"),
        (status_code = StatusCode::BAD_REQUEST, description = "Order already shipped"),
        (status_code = StatusCode::NOT_FOUND, description = "Order not found"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
#[tracing::instrument(
    name = "orders.cancel",
    skip(json, depot),
    fields(order_uuid = tracing::field::Empty),
    err
)]
pub(crate) async fn handler(
    json: JsonBody<CancelOrderRequest>,
    depot: &mut Depot,
) -> Result<Json<OrderEnvelope>, ApiError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let identity = depot.identity_or_401()?;
    let order = parse_order_id(json.into_inner().order_id.as_deref(), "Order ID is required.")?;

    tracing::Span::current().record("order_uuid", tracing::field::display(order));

    let cancelled = state
        .app
        .orders
        .cancel_order(identity.user_uuid, order)
        .await
        .map_err(|e| into_api_error(e, "Error cancelling order."))?;

    Ok(OrderEnvelope::new("Order cancelled successfully.", cancelled))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::json;
    use testresult::TestResult;

    use storefront_app::domain::orders::{
        OrdersServiceError, records::OrderUuid, status::OrderStatus,
    };

    use crate::{
        envelope::ErrorResponse,
        test_helpers::{TEST_USER_UUID, TestApp, make_order},
    };

    use super::*;

    fn make_service(app: TestApp) -> Service {
        app.user_service(Router::with_path("order/cancel").put(handler))
    }

    #[tokio::test]
    async fn test_cancel_pending_order() -> TestResult {
        let mut app = TestApp::default();
        let uuid = OrderUuid::new();

        app.orders
            .expect_cancel_order()
            .once()
            .withf(move |user, order| *user == TEST_USER_UUID && *order == uuid)
            .return_once(move |_, _| Ok(make_order(uuid, OrderStatus::Cancelled)));

        let mut res = TestClient::put("http://example.com/order/cancel")
            .json(&json!({ "orderId": uuid.to_string() }))
            .send(&make_service(app))
            .await;

        let body: OrderEnvelope = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(body.message, "Order cancelled successfully.");
        assert_eq!(body.order.status, "Cancelled");

        Ok(())
    }

    #[tokio::test]
    async fn test_cancel_shipped_order_returns_400() -> TestResult {
        let mut app = TestApp::default();

        app.orders
            .expect_cancel_order()
            .once()
            .return_once(|_, _| Err(OrdersServiceError::InvalidTransition(OrderStatus::Shipped)));

        let mut res = TestClient::put("http://example.com/order/cancel")
            .json(&json!({ "orderId": OrderUuid::new().to_string() }))
            .send(&make_service(app))
            .await;

        let body: ErrorResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));
        assert_eq!(body.message, "Cannot cancel a shipped or delivered order.");

        Ok(())
    }
}
