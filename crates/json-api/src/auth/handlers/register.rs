//! Register Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};

use storefront_app::auth::{Password, Registration};

use crate::{
    auth::{
        errors::into_api_error,
        handlers::{AUTHENTICATED, TokenResponse},
    },
    envelope::{ApiError, DataResponse},
    extensions::*,
    state::State,
};

/// Register Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct RegisterRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

impl From<RegisterRequest> for Registration {
    fn from(request: RegisterRequest) -> Self {
        Registration {
            name: request.name,
            email: request.email,
            password: Password::from(request.password),
        }
    }
}

/// Register Handler
///
/// Creates a customer account and signs it in.
#[endpoint(
    tags("auth"),
    summary = "Register",
    responses(
        (status_code = StatusCode::OK, description = "Account created"),
        (status_code = StatusCode::BAD_REQUEST, description = "Missing field or email taken"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
#[tracing::instrument(name = "auth.register", skip(json, depot), err)]
pub(crate) async fn handler(
    json: JsonBody<RegisterRequest>,
    depot: &mut Depot,
) -> Result<Json<DataResponse<TokenResponse>>, ApiError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let issued = state
        .app
        .auth
        .register(json.into_inner().into())
        .await
        .map_err(|e| into_api_error(e, "Error registering user."))?;

    Ok(DataResponse::new(AUTHENTICATED, issued.into()))
}

#[cfg(test)]
mod tests {
    use jiff::Timestamp;
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::json;
    use testresult::TestResult;

    use storefront_app::auth::{AuthServiceError, IssuedToken};

    use crate::{envelope::ErrorResponse, test_helpers::TestApp};

    use super::*;

    fn make_service(app: TestApp) -> Service {
        app.public_service(Router::with_path("auth/register").post(handler))
    }

    #[tokio::test]
    async fn test_register_returns_token() -> TestResult {
        let mut app = TestApp::default();

        app.auth
            .expect_register()
            .once()
            .withf(|registration| {
                registration.name == "Ada"
                    && registration.email == "ada@example.com"
                    && registration.password.expose() == "secret"
            })
            .return_once(|_| {
                Ok(IssuedToken {
                    token: "jwt".to_string(),
                    expires_at: Timestamp::UNIX_EPOCH,
                })
            });

        let mut res = TestClient::post("http://example.com/auth/register")
            .json(&json!({
                "name": "Ada",
                "email": "ada@example.com",
                "password": "secret",
                "role": "admin"
            }))
            .send(&make_service(app))
            .await;

        let body: DataResponse<TokenResponse> = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert!(body.success, "expected success envelope");
        assert_eq!(body.message, "Authentication successful");
        assert_eq!(body.data.token, "jwt");

        Ok(())
    }

    #[tokio::test]
    async fn test_register_duplicate_email_returns_400() -> TestResult {
        let mut app = TestApp::default();

        app.auth
            .expect_register()
            .once()
            .return_once(|_| Err(AuthServiceError::AlreadyExists));

        let mut res = TestClient::post("http://example.com/auth/register")
            .json(&json!({ "name": "Ada", "email": "ada@example.com", "password": "secret" }))
            .send(&make_service(app))
            .await;

        let body: ErrorResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));
        assert_eq!(body.message, "User already exists");

        Ok(())
    }

    #[tokio::test]
    async fn test_register_missing_field_returns_400() -> TestResult {
        let mut app = TestApp::default();

        app.auth
            .expect_register()
            .once()
            .withf(|registration| registration.password.is_blank())
            .return_once(|_| Err(AuthServiceError::MissingRequiredData("password")));

        let mut res = TestClient::post("http://example.com/auth/register")
            .json(&json!({ "name": "Ada", "email": "ada@example.com" }))
            .send(&make_service(app))
            .await;

        let body: ErrorResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));
        assert_eq!(body.message, "password is required.");

        Ok(())
    }
}
