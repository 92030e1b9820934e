//! Errors

use tracing::error;

use storefront_app::domain::addresses::AddressesServiceError;

use crate::envelope::ApiError;

pub(crate) fn into_api_error(error: AddressesServiceError, failure: &'static str) -> ApiError {
    match error {
        AddressesServiceError::NotFound => ApiError::not_found("Address not found."),
        AddressesServiceError::MissingField(field) => {
            ApiError::bad_request(format!("{field} is required."))
        }
        AddressesServiceError::AlreadyExists
        | AddressesServiceError::InvalidReference
        | AddressesServiceError::InvalidData => ApiError::bad_request("Invalid address payload."),
        AddressesServiceError::Sql(source) => {
            error!("{failure} {source}");

            ApiError::internal(failure, &source)
        }
    }
}
