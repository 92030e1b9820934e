//! Add Address Handler

use std::sync::Arc;

use salvo::{oapi::extract::JsonBody, prelude::*};

use crate::{
    addresses::{
        errors::into_api_error,
        models::{AddressRequest, AddressResponse},
    },
    envelope::{ApiError, DataResponse},
    extensions::*,
    state::State,
};

/// Add Address Handler
#[endpoint(
    tags("addresses"),
    summary = "Add Address",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::CREATED, description = "Address added"),
        (status_code = StatusCode::BAD_REQUEST, description = "Missing field"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
#[tracing::instrument(
    name = "addresses.create",
    skip(json, depot, res),
    fields(user_uuid = tracing::field::Empty, is_primary = tracing::field::Empty),
    err
)]
pub(crate) async fn handler(
    json: JsonBody<AddressRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<DataResponse<AddressResponse>>, ApiError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let identity = depot.identity_or_401()?;
    let request = json.into_inner();

    let span = tracing::Span::current();

    span.record("user_uuid", tracing::field::display(identity.user_uuid));
    span.record("is_primary", request.is_primary);

    let address = state
        .app
        .addresses
        .add_address(identity.user_uuid, request.into())
        .await
        .map_err(|e| into_api_error(e, "Error adding address."))?;

    res.status_code(StatusCode::CREATED);

    Ok(DataResponse::new("Address added successfully.", address.into()))
}
