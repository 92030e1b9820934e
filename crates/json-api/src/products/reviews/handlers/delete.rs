//! Delete Review Handler

use std::sync::Arc;

use salvo::{oapi::extract::PathParam, prelude::*};
use uuid::Uuid;

use crate::{
    envelope::{ApiError, MessageResponse},
    extensions::*,
    products::errors::into_api_error,
    state::State,
};

/// Delete Review Handler
#[endpoint(
    tags("reviews"),
    summary = "Delete Review",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Review deleted"),
        (status_code = StatusCode::NOT_FOUND, description = "Product or review not found"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    id: PathParam<Uuid>,
    review_id: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<MessageResponse>, ApiError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    state
        .app
        .products
        .delete_review(id.into_inner().into(), review_id.into_inner().into())
        .await
        .map_err(|e| into_api_error(e, "Error deleting review."))?;

    Ok(MessageResponse::new("Review deleted successfully."))
}
