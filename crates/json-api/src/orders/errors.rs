//! Errors

use tracing::error;

use storefront_app::domain::{checkout::CheckoutError, orders::OrdersServiceError};

use crate::envelope::ApiError;

pub(crate) const EMPTY_CART: &str = "Cart is empty. Cannot place an order.";

pub(crate) const ORDER_NOT_FOUND: &str = "Order not found or user not authorized.";

pub(crate) fn into_api_error(error: OrdersServiceError, failure: &'static str) -> ApiError {
    match error {
        OrdersServiceError::NotFound => ApiError::not_found(ORDER_NOT_FOUND),
        OrdersServiceError::NoOrders => ApiError::not_found("No orders found for this user."),
        OrdersServiceError::NoItems => ApiError::bad_request(EMPTY_CART),
        OrdersServiceError::MissingAddressField(field) => {
            ApiError::bad_request(format!("Shipping address {field} is required."))
        }
        OrdersServiceError::AmountOverflow => ApiError::bad_request("Order total is too large."),
        OrdersServiceError::InvalidTransition(_) => {
            ApiError::bad_request("Cannot cancel a shipped or delivered order.")
        }
        OrdersServiceError::InvalidData => ApiError::bad_request("Invalid order payload."),
        OrdersServiceError::Catalog(source) => {
            error!("{failure} {source}");

            ApiError::internal(failure, &source)
        }
        OrdersServiceError::Sql(source) => {
            error!("{failure} {source}");

            ApiError::internal(failure, &source)
        }
    }
}

pub(crate) fn checkout_api_error(error: CheckoutError, failure: &'static str) -> ApiError {
    match error {
        CheckoutError::EmptyCart => ApiError::bad_request(EMPTY_CART),
        CheckoutError::Order(source) => into_api_error(source, failure),
        CheckoutError::Cart(source) => {
            error!("{failure} {source}");

            ApiError::internal(failure, &source)
        }
        CheckoutError::CartNotCleared { order_uuid, source } => {
            error!(%order_uuid, "order placed but cart not cleared: {source}");

            ApiError::internal(
                format!("Order {order_uuid} was placed but the cart could not be cleared."),
                &source,
            )
        }
    }
}
