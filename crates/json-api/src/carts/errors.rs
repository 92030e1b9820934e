//! Errors

use tracing::error;

use storefront_app::domain::carts::{CartsServiceError, records::MAX_QUANTITY};

use crate::envelope::ApiError;

pub(crate) fn into_api_error(error: CartsServiceError, failure: &'static str) -> ApiError {
    match error {
        CartsServiceError::NotFound => ApiError::not_found("Cart not found."),
        CartsServiceError::LineNotFound => ApiError::not_found("Product not found in cart."),
        CartsServiceError::ProductNotFound | CartsServiceError::InvalidReference => {
            ApiError::not_found("Product not found.")
        }
        CartsServiceError::InvalidQuantity => {
            ApiError::bad_request(format!("Quantity must be between 1 and {MAX_QUANTITY}."))
        }
        CartsServiceError::AmountOverflow => ApiError::bad_request("Cart total is too large."),
        CartsServiceError::InvalidData => ApiError::bad_request("Invalid cart payload."),
        CartsServiceError::Catalog(source) => {
            error!("{failure} {source}");

            ApiError::internal(failure, &source)
        }
        CartsServiceError::Sql(source) => {
            error!("{failure} {source}");

            ApiError::internal(failure, &source)
        }
    }
}
