//! Update Address Handler

use std::sync::Arc;

use salvo::{
    oapi::extract::{JsonBody, PathParam},
    prelude::*,
};
use uuid::Uuid;

use crate::{
    addresses::{
        errors::into_api_error,
        models::{AddressRequest, AddressResponse},
    },
    envelope::{ApiError, DataResponse},
    extensions::*,
    state::State,
};

/// Update Address Handler
#[endpoint(
    tags("addresses"),
    summary = "Update Address",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Address updated"),
        (status_code = StatusCode::BAD_REQUEST, description = "Missing field"),
        (status_code = StatusCode::NOT_FOUND, description = "Address not found"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
#[tracing::instrument(
    name = "addresses.update",
    skip(address_id, json, depot),
    fields(address_uuid = tracing::field::Empty),
    err
)]
pub(crate) async fn handler(
    address_id: PathParam<Uuid>,
    json: JsonBody<AddressRequest>,
    depot: &mut Depot,
) -> Result<Json<DataResponse<AddressResponse>>, ApiError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let identity = depot.identity_or_401()?;
    let address = address_id.into_inner();

    tracing::Span::current().record("address_uuid", tracing::field::display(address));

    let updated = state
        .app
        .addresses
        .update_address(identity.user_uuid, address.into(), json.into_inner().into())
        .await
        .map_err(|e| into_api_error(e, "Error updating address."))?;

    Ok(DataResponse::new(
        "Address updated successfully.",
        updated.into(),
    ))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::json;
    use testresult::TestResult;

    use storefront_app::domain::addresses::{AddressesServiceError, records::AddressUuid};

    use crate::{envelope::ErrorResponse, test_helpers::TestApp};

    use super::{super::tests::*, *};

    fn make_service(app: TestApp) -> Service {
        app.user_service(Router::with_path("address/{address_id}").put(handler))
    }

    fn payload() -> serde_json::Value {
        json!({
            "street": "2 Low Road",
            "city": "Leeds",
            "state": "West Yorkshire",
            "postalCode": "LS2 2BB",
            "country": "UK",
            "isPrimary": false
        })
    }

    #[tokio::test]
    async fn test_update_address_success() -> TestResult {
        let mut app = TestApp::default();
        let uuid = AddressUuid::new();

        app.addresses
            .expect_update_address()
            .once()
            .withf(move |_, address, details| *address == uuid && details.street == "2 Low Road")
            .return_once(move |_, _, _| Ok(make_address_record(uuid, false)));

        let mut res = TestClient::put(format!("http://example.com/address/{uuid}"))
            .json(&payload())
            .send(&make_service(app))
            .await;

        let body: DataResponse<AddressResponse> = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(body.message, "Address updated successfully.");

        Ok(())
    }

    #[tokio::test]
    async fn test_update_foreign_address_returns_404() -> TestResult {
        let mut app = TestApp::default();

        app.addresses
            .expect_update_address()
            .once()
            .return_once(|_, _, _| Err(AddressesServiceError::NotFound));

        let mut res = TestClient::put(format!("http://example.com/address/{}", Uuid::now_v7()))
            .json(&payload())
            .send(&make_service(app))
            .await;

        let body: ErrorResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));
        assert_eq!(body.message, "Address not found.");

        Ok(())
    }
}
