//! Remove From Cart Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    carts::{errors::into_api_error, models::CartEnvelope},
    envelope::ApiError,
    extensions::*,
    state::State,
};

/// Remove From Cart Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RemoveFromCartRequest {
    pub product_id: Uuid,
}

/// Remove From Cart Handler
#[endpoint(
    tags("cart"),
    summary = "Remove From Cart",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Product removed"),
        (status_code = StatusCode::NOT_FOUND, description = "Cart or line not found"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<RemoveFromCartRequest>,
    depot: &mut Depot,
) -> Result<Json<CartEnvelope>, ApiError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let identity = depot.identity_or_401()?;

    let cart = state
        .app
        .carts
        .remove_item(identity.user_uuid, json.into_inner().product_id.into())
        .await
        .map_err(|e| into_api_error(e, "Error removing product from cart."))?;

    Ok(CartEnvelope::new("Product removed from cart successfully.", cart))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::json;
    use testresult::TestResult;

    use storefront_app::domain::{carts::CartsServiceError, products::records::ProductUuid};

    use crate::{
        envelope::ErrorResponse,
        test_helpers::{TEST_USER_UUID, TestApp, make_cart},
    };

    use super::*;

    fn make_service(app: TestApp) -> Service {
        app.user_service(Router::with_path("cart").delete(handler))
    }

    #[tokio::test]
    async fn test_remove_returns_remaining_cart() -> TestResult {
        let mut app = TestApp::default();
        let product = ProductUuid::new();

        app.carts
            .expect_remove_item()
            .once()
            .withf(move |user, p| *user == TEST_USER_UUID && *p == product)
            .return_once(|_, _| Ok(make_cart(Vec::new())));

        let mut res = TestClient::delete("http://example.com/cart")
            .json(&json!({ "productId": product.into_uuid() }))
            .send(&make_service(app))
            .await;

        let body: CartEnvelope = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(body.message, "Product removed from cart successfully.");
        assert!(body.cart.items.is_empty(), "expected empty cart");
        assert_eq!(body.cart.total_amount, 0);

        Ok(())
    }

    #[tokio::test]
    async fn test_remove_without_cart_returns_404() -> TestResult {
        let mut app = TestApp::default();

        app.carts
            .expect_remove_item()
            .once()
            .return_once(|_, _| Err(CartsServiceError::NotFound));

        let mut res = TestClient::delete("http://example.com/cart")
            .json(&json!({ "productId": ProductUuid::new().into_uuid() }))
            .send(&make_service(app))
            .await;

        let body: ErrorResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));
        assert_eq!(body.message, "Cart not found.");

        Ok(())
    }
}
