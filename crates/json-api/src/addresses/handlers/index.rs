//! List Addresses Handler

use std::sync::Arc;

use salvo::prelude::*;

use crate::{
    addresses::{errors::into_api_error, models::AddressResponse},
    envelope::{ApiError, DataResponse},
    extensions::*,
    state::State,
};

/// List Addresses Handler
///
/// An empty address book is returned as an empty list.
#[endpoint(
    tags("addresses"),
    summary = "List Addresses",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Address list"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    depot: &mut Depot,
) -> Result<Json<DataResponse<Vec<AddressResponse>>>, ApiError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let identity = depot.identity_or_401()?;

    let addresses = state
        .app
        .addresses
        .list_addresses(identity.user_uuid)
        .await
        .map_err(|e| into_api_error(e, "Error retrieving addresses."))?;

    Ok(DataResponse::new(
        "Addresses retrieved successfully.",
        addresses.into_iter().map(Into::into).collect(),
    ))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use storefront_app::domain::addresses::records::AddressUuid;

    use crate::test_helpers::{TEST_USER_UUID, TestApp};

    use super::{super::tests::*, *};

    fn make_service(app: TestApp) -> Service {
        app.user_service(Router::with_path("addresses").get(handler))
    }

    #[tokio::test]
    async fn test_index_returns_addresses() -> TestResult {
        let mut app = TestApp::default();

        app.addresses
            .expect_list_addresses()
            .once()
            .withf(|user| *user == TEST_USER_UUID)
            .return_once(|_| {
                Ok(vec![
                    make_address_record(AddressUuid::new(), true),
                    make_address_record(AddressUuid::new(), false),
                ])
            });

        let mut res = TestClient::get("http://example.com/addresses")
            .send(&make_service(app))
            .await;

        let body: DataResponse<Vec<AddressResponse>> = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(body.data.len(), 2);
        assert_eq!(body.data.first().map(|a| a.is_primary), Some(true));

        Ok(())
    }

    #[tokio::test]
    async fn test_index_empty_book_returns_200() -> TestResult {
        let mut app = TestApp::default();

        app.addresses
            .expect_list_addresses()
            .once()
            .return_once(|_| Ok(Vec::new()));

        let mut res = TestClient::get("http://example.com/addresses")
            .send(&make_service(app))
            .await;

        let body: DataResponse<Vec<AddressResponse>> = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert!(body.data.is_empty(), "expected empty list");

        Ok(())
    }
}
