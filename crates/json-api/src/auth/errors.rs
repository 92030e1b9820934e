//! Auth Errors

use tracing::error;

use storefront_app::auth::AuthServiceError;

use crate::envelope::ApiError;

pub(crate) fn into_api_error(error: AuthServiceError, failure: &'static str) -> ApiError {
    match error {
        AuthServiceError::MissingRequiredData(field) => {
            ApiError::bad_request(format!("{field} is required."))
        }
        AuthServiceError::AlreadyExists => ApiError::bad_request("User already exists"),
        AuthServiceError::InvalidCredentials => ApiError::bad_request("Invalid credentials"),
        AuthServiceError::NotFound => ApiError::not_found("User not found"),
        AuthServiceError::InvalidOrExpiredToken => {
            ApiError::bad_request("Invalid or expired token")
        }
        AuthServiceError::Unauthorized => ApiError::unauthorized("Not authorized, token failed."),
        error @ (AuthServiceError::PasswordHash(_)
        | AuthServiceError::Token(_)
        | AuthServiceError::Sql(_)) => {
            error!("{failure} {error}");

            ApiError::internal(failure, &error)
        }
    }
}

#[cfg(test)]
mod tests {
    use salvo::http::StatusCode;

    use super::*;

    #[test]
    fn client_failures_keep_their_messages() {
        let error = into_api_error(AuthServiceError::AlreadyExists, "Error registering user.");

        assert_eq!(error.status(), StatusCode::BAD_REQUEST);
        assert_eq!(error.message(), "User already exists");
    }

    #[test]
    fn hashing_failures_are_internal() {
        let error = into_api_error(
            AuthServiceError::PasswordHash("bad salt".to_string()),
            "Error registering user.",
        );

        assert_eq!(error.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(error.message(), "Error registering user.");
    }
}
