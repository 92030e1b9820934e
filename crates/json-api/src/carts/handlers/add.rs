//! Add To Cart Handler

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

/// Add To Cart Handler
///
/// Adds units of a product at its current price. A product already in the
/// cart has its quantity increased instead of gaining a second line.
#[endpoint(
    tags("cart"),
    summary = "Add To Cart",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Product added"),
        (status_code = StatusCode::BAD_REQUEST, description = "Quantity out of range"),
        (status_code = StatusCode::NOT_FOUND, description = "Product not found"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
#[tracing::instrument(
    name = "cart.add",
    skip(json, depot),
    fields(
        user_uuid = tracing::field::Empty,
        product_uuid = tracing::field::Empty,
        quantity = tracing::field::Empty
    ),
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
    span.record("quantity", request.quantity);

    let cart = state
        .app
        .carts
        .add_item(identity.user_uuid, request.into())
        .await
        .map_err(|e| into_api_error(e, "Error adding product to cart."))?;

    Ok(CartEnvelope::new("Product added to cart successfully.", cart))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::json;
    use testresult::TestResult;

    use storefront_app::domain::{
        carts::{CartsServiceError, records::CartLineRecord},
        products::records::ProductUuid,
    };

    use crate::{
        envelope::ErrorResponse,
        test_helpers::{TEST_USER_UUID, TestApp, make_cart},
    };

    use super::*;

    fn make_service(app: TestApp) -> Service {
        app.user_service(Router::with_path("cart").post(handler))
    }

    #[tokio::test]
    async fn test_add_returns_cart() -> TestResult {
        let mut app = TestApp::default();
        let product = ProductUuid::new();
        let cart = make_cart(vec![CartLineRecord::new(product, 3, 2_500)?]);

        app.carts
            .expect_add_item()
            .once()
            .withf(move |user, item| {
                *user == TEST_USER_UUID && item.product_uuid == product && item.quantity == 3
            })
            .return_once(move |_, _| Ok(cart));

        let mut res = TestClient::post("http://example.com/cart")
            .json(&json!({ "productId": product.into_uuid(), "quantity": 3 }))
            .send(&make_service(app))
            .await;

        let body: CartEnvelope = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(body.message, "Product added to cart successfully.");
        assert_eq!(body.cart.total_amount, 7_500);
        assert_eq!(body.cart.items.len(), 1);

        Ok(())
    }

    #[tokio::test]
    async fn test_add_zero_quantity_returns_400() -> TestResult {
        let mut app = TestApp::default();

        app.carts
            .expect_add_item()
            .once()
            .return_once(|_, _| Err(CartsServiceError::InvalidQuantity));

        let mut res = TestClient::post("http://example.com/cart")
            .json(&json!({ "productId": ProductUuid::new().into_uuid(), "quantity": 0 }))
            .send(&make_service(app))
            .await;

        let body: ErrorResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));
        assert_eq!(body.message, "Quantity must be between 1 and 2147483647.");

        Ok(())
    }

    #[tokio::test]
    async fn test_add_quantity_beyond_column_range_returns_400() -> TestResult {
        let mut app = TestApp::default();

        app.carts
            .expect_add_item()
            .once()
            .withf(|_, item| item.quantity == 3_000_000_000)
            .return_once(|_, _| Err(CartsServiceError::InvalidQuantity));

        let mut res = TestClient::post("http://example.com/cart")
            .json(&json!({ "productId": ProductUuid::new().into_uuid(), "quantity": 3_000_000_000_u32 }))
            .send(&make_service(app))
            .await;

        let body: ErrorResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));
        assert!(!body.success, "error envelope must report failure");
        assert!(body.error.is_none(), "client errors carry no internal detail");

        Ok(())
    }

    #[tokio::test]
    async fn test_add_unknown_product_returns_404() -> TestResult {
        let mut app = TestApp::default();

        app.carts
            .expect_add_item()
            .once()
            .return_once(|_, _| Err(CartsServiceError::ProductNotFound));

        let mut res = TestClient::post("http://example.com/cart")
            .json(&json!({ "productId": ProductUuid::new().into_uuid(), "quantity": 1 }))
            .send(&make_service(app))
            .await;

        let body: ErrorResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));
        assert_eq!(body.message, "Product not found.");

        Ok(())
    }
}
