//! Response envelope
//!
//! Every response body is `{success, message, <payload>}`; failures carry
//! `success: false` and, for internal errors, an `error` detail string.

use std::{
    borrow::Cow,
    fmt::{self, Display},
};

use salvo::{
    http::StatusCode,
    oapi::{self, Components, Content, EndpointOutRegister, Operation, ToSchema},
    prelude::*,
};
use serde::{Deserialize, Serialize};

/// Successful response carrying a `data` payload.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct DataResponse<T> {
    pub success: bool,
    pub message: String,
    pub data: T,
}

impl<T> DataResponse<T> {
    pub(crate) fn new(message: &str, data: T) -> Json<Self> {
        Json(Self {
            success: true,
            message: message.to_string(),
            data,
        })
    }
}

/// Successful response with no payload.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct MessageResponse {
    pub success: bool,
    pub message: String,
}

impl MessageResponse {
    pub(crate) fn new(message: &str) -> Json<Self> {
        Json(Self {
            success: true,
            message: message.to_string(),
        })
    }
}

/// Failure body.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct ErrorResponse {
    pub success: bool,
    pub message: String,

    /// Underlying cause, present for internal failures only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// A failed request, rendered as an [`ErrorResponse`] with its status code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ApiError {
    status: StatusCode,
    message: Cow<'static, str>,
    error: Option<String>,
}

impl ApiError {
    pub(crate) fn new(status: StatusCode, message: impl Into<Cow<'static, str>>) -> Self {
        Self {
            status,
            message: message.into(),
            error: None,
        }
    }

    pub(crate) fn bad_request(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub(crate) fn unauthorized(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, message)
    }

    pub(crate) fn forbidden(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(StatusCode::FORBIDDEN, message)
    }

    pub(crate) fn not_found(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    /// 500 with the cause's text exposed in the `error` field.
    pub(crate) fn internal(message: impl Into<Cow<'static, str>>, cause: &impl Display) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: message.into(),
            error: Some(cause.to_string()),
        }
    }

    pub(crate) fn status(&self) -> StatusCode {
        self.status
    }

    pub(crate) fn message(&self) -> &str {
        &self.message
    }
}

impl Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.status.as_u16(), self.message)
    }
}

impl Scribe for ApiError {
    fn render(self, res: &mut Response) {
        res.status_code(self.status);
        res.render(Json(ErrorResponse {
            success: false,
            message: self.message.into_owned(),
            error: self.error,
        }));
    }
}

impl EndpointOutRegister for ApiError {
    fn register(components: &mut Components, operation: &mut Operation) {
        let schema = ErrorResponse::to_schema(components);

        operation.responses.insert(
            "4XX",
            oapi::Response::new("Request rejected")
                .add_content("application/json", Content::new(schema.clone())),
        );
        operation.responses.insert(
            "5XX",
            oapi::Response::new("Internal failure")
                .add_content("application/json", Content::new(schema)),
        );
    }
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use super::*;

    #[handler]
    async fn fail() -> Result<Json<MessageResponse>, ApiError> {
        Err(ApiError::internal("Error doing work.", &"disk full"))
    }

    #[handler]
    async fn reject() -> Result<Json<MessageResponse>, ApiError> {
        Err(ApiError::not_found("Thing not found."))
    }

    #[tokio::test]
    async fn internal_error_renders_cause() -> TestResult {
        let service = Service::new(Router::new().get(fail));

        let mut res = TestClient::get("http://example.com").send(&service).await;
        let body: ErrorResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::INTERNAL_SERVER_ERROR));
        assert!(!body.success, "failures must not report success");
        assert_eq!(body.message, "Error doing work.");
        assert_eq!(body.error.as_deref(), Some("disk full"));

        Ok(())
    }

    #[tokio::test]
    async fn client_error_omits_cause() -> TestResult {
        let service = Service::new(Router::new().get(reject));

        let mut res = TestClient::get("http://example.com").send(&service).await;
        let body: serde_json::Value = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));
        assert_eq!(
            body,
            serde_json::json!({ "success": false, "message": "Thing not found." })
        );

        Ok(())
    }
}
