//! Errors

use tracing::error;

use storefront_app::domain::products::ProductsServiceError;

use crate::envelope::ApiError;

pub(crate) fn into_api_error(error: ProductsServiceError, failure: &'static str) -> ApiError {
    match error {
        ProductsServiceError::NotFound => ApiError::not_found("Product not found."),
        ProductsServiceError::ReviewNotFound => ApiError::not_found("Review not found."),
        ProductsServiceError::Validation(message) => ApiError::bad_request(message),
        ProductsServiceError::AlreadyExists => ApiError::bad_request("Product already exists."),
        ProductsServiceError::InvalidReference => {
            ApiError::bad_request("Referenced resource not found.")
        }
        ProductsServiceError::MissingRequiredData | ProductsServiceError::InvalidData => {
            ApiError::bad_request("Invalid product payload.")
        }
        ProductsServiceError::Sql(source) => {
            error!("{failure} {source}");

            ApiError::internal(failure, &source)
        }
    }
}

#[cfg(test)]
mod tests {
    use salvo::http::StatusCode;

    use super::*;

    #[test]
    fn validation_message_is_passed_through() {
        let error = into_api_error(
            ProductsServiceError::Validation("Color is required."),
            "Error creating product.",
        );

        assert_eq!(error.status(), StatusCode::BAD_REQUEST);
        assert_eq!(error.message(), "Color is required.");
    }

    #[test]
    fn missing_review_is_404() {
        let error = into_api_error(ProductsServiceError::ReviewNotFound, "Error updating review.");

        assert_eq!(error.status(), StatusCode::NOT_FOUND);
        assert_eq!(error.message(), "Review not found.");
    }
}
