//! Reset Password Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};

use storefront_app::auth::Password;

use crate::{
    auth::{
        errors::into_api_error,
        handlers::{AUTHENTICATED, TokenResponse},
    },
    envelope::{ApiError, DataResponse},
    extensions::*,
    state::State,
};

/// Reset Password Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct ResetPasswordRequest {
    #[serde(default)]
    pub token: String,
    #[serde(default)]
    pub password: String,
}

/// Reset Password Handler
#[endpoint(
    tags("auth"),
    summary = "Reset Password",
    responses(
        (status_code = StatusCode::OK, description = "Password replaced and signed in"),
        (status_code = StatusCode::BAD_REQUEST, description = "Invalid or expired token"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
#[tracing::instrument(name = "auth.reset_password", skip(json, depot), err)]
pub(crate) async fn handler(
    json: JsonBody<ResetPasswordRequest>,
    depot: &mut Depot,
) -> Result<Json<DataResponse<TokenResponse>>, ApiError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let request = json.into_inner();

    let issued = state
        .app
        .auth
        .reset_password(&request.token, Password::from(request.password))
        .await
        .map_err(|e| into_api_error(e, "Error resetting password."))?;

    Ok(DataResponse::new(AUTHENTICATED, issued.into()))
}
