//! Auth Handlers

use salvo::oapi::ToSchema;
use serde::{Deserialize, Serialize};

use storefront_app::auth::IssuedToken;

pub(crate) mod forgot_password;
pub(crate) mod login;
pub(crate) mod register;
pub(crate) mod reset_password;

/// Signed access token
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct TokenResponse {
    /// Bearer token for the `Authorization` header
    pub token: String,

    /// When the token stops being accepted
    pub expires_at: String,
}

impl From<IssuedToken> for TokenResponse {
    fn from(issued: IssuedToken) -> Self {
        Self {
            token: issued.token,
            expires_at: issued.expires_at.to_string(),
        }
    }
}

pub(crate) const AUTHENTICATED: &str = "Authentication successful";
