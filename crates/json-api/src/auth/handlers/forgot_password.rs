//! Forgot Password Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};

use crate::{
    auth::errors::into_api_error,
    envelope::{ApiError, DataResponse},
    extensions::*,
    state::State,
};

/// Forgot Password Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct ForgotPasswordRequest {
    #[serde(default)]
    pub email: String,
}

/// Reset token issued in place of an email
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ResetTokenResponse {
    pub reset_token: String,
}

/// Forgot Password Handler
///
/// Returns the reset token directly; there is no mail delivery.
#[endpoint(
    tags("auth"),
    summary = "Forgot Password",
    responses(
        (status_code = StatusCode::OK, description = "Reset token issued"),
        (status_code = StatusCode::NOT_FOUND, description = "User not found"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
#[tracing::instrument(name = "auth.forgot_password", skip(json, depot), err)]
pub(crate) async fn handler(
    json: JsonBody<ForgotPasswordRequest>,
    depot: &mut Depot,
) -> Result<Json<DataResponse<ResetTokenResponse>>, ApiError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let issued = state
        .app
        .auth
        .forgot_password(&json.into_inner().email)
        .await
        .map_err(|e| into_api_error(e, "Error generating reset token."))?;

    Ok(DataResponse::new(
        "Password reset token generated successfully.",
        ResetTokenResponse {
            reset_token: issued.token,
        },
    ))
}
