//! Delete Address Handler

use std::sync::Arc;

use salvo::{oapi::extract::PathParam, prelude::*};
use uuid::Uuid;

use crate::{
    addresses::errors::into_api_error,
    envelope::{ApiError, MessageResponse},
    extensions::*,
    state::State,
};

/// Delete Address Handler
#[endpoint(
    tags("addresses"),
    summary = "Delete Address",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Address deleted"),
        (status_code = StatusCode::NOT_FOUND, description = "Address not found"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    address_id: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<MessageResponse>, ApiError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let identity = depot.identity_or_401()?;

    state
        .app
        .addresses
        .delete_address(identity.user_uuid, address_id.into_inner().into())
        .await
        .map_err(|e| into_api_error(e, "Error deleting address."))?;

    Ok(MessageResponse::new("Address deleted successfully."))
}
