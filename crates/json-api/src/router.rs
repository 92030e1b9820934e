//! App Router

use salvo::Router;

use crate::{
    addresses,
    auth::{
        self,
        middleware::{authenticate, require_admin},
    },
    carts, orders, products,
};

/// Every route under `/api`.
///
/// `products` appears twice: reads are public, writes sit behind the admin
/// guard. Salvo falls through to the second branch when the method does not
/// match the first.
pub(crate) fn app_router() -> Router {
    Router::with_path("api")
        .push(
            Router::with_path("auth")
                .push(Router::with_path("register").post(auth::register::handler))
                .push(Router::with_path("login").post(auth::login::handler))
                .push(Router::with_path("forgot-password").post(auth::forgot_password::handler))
                .push(Router::with_path("reset-password").post(auth::reset_password::handler)),
        )
        .push(
            Router::with_path("products")
                .get(products::index::handler)
                .push(Router::with_path("{id}").get(products::get::handler)),
        )
        .push(
            Router::new()
                .hoop(authenticate)
                .push(
                    Router::with_path("cart")
                        .get(carts::get::handler)
                        .post(carts::add::handler)
                        .put(carts::update::handler)
                        .delete(carts::remove::handler)
                        .push(Router::with_path("clear").delete(carts::clear::handler)),
                )
                .push(
                    Router::with_path("order")
                        .post(orders::place::handler)
                        .push(Router::with_path("status").put(orders::status::handler))
                        .push(Router::with_path("cancel").put(orders::cancel::handler))
                        .push(Router::with_path("{id}").get(orders::get::handler)),
                )
                .push(Router::with_path("orders").get(orders::index::handler))
                .push(
                    Router::with_path("products/{id}/reviews")
                        .post(products::reviews::handlers::create::handler)
                        .push(
                            Router::with_path("{review_id}")
                                .put(products::reviews::handlers::update::handler)
                                .delete(products::reviews::handlers::delete::handler),
                        ),
                )
                .push(
                    Router::with_path("address")
                        .post(addresses::create::handler)
                        .push(
                            Router::with_path("{address_id}")
                                .put(addresses::update::handler)
                                .delete(addresses::delete::handler),
                        ),
                )
                .push(Router::with_path("addresses").get(addresses::index::handler))
                .push(
                    Router::new().hoop(require_admin).push(
                        Router::with_path("products")
                            .post(products::create::handler)
                            .push(
                                Router::with_path("{id}")
                                    .put(products::update::handler)
                                    .delete(products::delete::handler),
                            ),
                    ),
                ),
        )
}

#[cfg(test)]
mod tests {
    use salvo::{
        affix_state::inject,
        prelude::*,
        test::{ResponseExt, TestClient},
    };
    use serde_json::json;
    use testresult::TestResult;

    use storefront_app::{
        auth::Identity,
        domain::{
            orders::{records::OrderUuid, status::OrderStatus},
            products::records::ProductUuid,
            users::{Role, UserUuid},
        },
    };

    use crate::{
        envelope::ErrorResponse,
        test_helpers::{TestApp, make_populated_order, make_product},
    };

    use super::*;

    fn make_service(app: TestApp) -> Service {
        Service::new(
            Router::new()
                .hoop(inject(app.into_state()))
                .push(app_router()),
        )
    }

    fn expect_bearer(app: &mut TestApp, role: Role) {
        app.auth
            .expect_authenticate_bearer()
            .once()
            .withf(|token| token == "good")
            .return_once(move |_| {
                Ok(Identity {
                    user_uuid: UserUuid::new(),
                    role,
                })
            });
    }

    #[tokio::test]
    async fn test_catalog_reads_are_public() -> TestResult {
        let mut app = TestApp::default();
        let uuid = ProductUuid::new();

        app.products
            .expect_get_product()
            .once()
            .return_once(move |_| Ok(make_product(uuid)));

        let res = TestClient::get(format!("http://example.com/api/products/{uuid}"))
            .send(&make_service(app))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));

        Ok(())
    }

    #[tokio::test]
    async fn test_cart_requires_token() -> TestResult {
        let app = TestApp::default();

        let mut res = TestClient::get("http://example.com/api/cart")
            .send(&make_service(app))
            .await;

        let body: ErrorResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::UNAUTHORIZED));
        assert_eq!(body.message, "Not authorized, no token.");

        Ok(())
    }

    #[tokio::test]
    async fn test_product_writes_need_admin() -> TestResult {
        let mut app = TestApp::default();

        expect_bearer(&mut app, Role::User);

        let mut res = TestClient::delete(format!(
            "http://example.com/api/products/{}",
            ProductUuid::new()
        ))
        .add_header("authorization", "Bearer good", true)
        .send(&make_service(app))
        .await;

        let body: ErrorResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::FORBIDDEN));
        assert_eq!(body.message, "Access denied, admin privileges required.");

        Ok(())
    }

    #[tokio::test]
    async fn test_admin_reaches_product_create() -> TestResult {
        let mut app = TestApp::default();
        let uuid = ProductUuid::new();

        expect_bearer(&mut app, Role::Admin);

        app.products
            .expect_create_product()
            .once()
            .return_once(move |_| Ok(make_product(uuid)));

        let res = TestClient::post("http://example.com/api/products")
            .add_header("authorization", "Bearer good", true)
            .json(&json!({
                "productName": "Oxford Shirt",
                "description": "Button-down cotton shirt",
                "price": 2500,
                "brandName": "Acme",
                "color": "Blue",
                "size": ["M"],
                "imageUrl": "https://example.com/shirt.png",
                "category": "Shirts"
            }))
            .send(&make_service(app))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::CREATED));

        Ok(())
    }

    #[tokio::test]
    async fn test_order_by_id_routes_past_fixed_segments() -> TestResult {
        let mut app = TestApp::default();

        expect_bearer(&mut app, Role::User);

        app.orders
            .expect_get_order()
            .once()
            .return_once(|_, order| Ok(make_populated_order(order, OrderStatus::Pending)));

        let res = TestClient::get(format!("http://example.com/api/order/{}", OrderUuid::new()))
            .add_header("authorization", "Bearer good", true)
            .send(&make_service(app))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));

        Ok(())
    }
}
