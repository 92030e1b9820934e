//! Update Review Handler

use std::sync::Arc;

use salvo::{
    oapi::extract::{JsonBody, PathParam},
    prelude::*,
};
use uuid::Uuid;

use storefront_app::domain::products::data::ReviewUpdate;

use crate::{
    envelope::{ApiError, DataResponse},
    extensions::*,
    products::{errors::into_api_error, models::ReviewResponse, reviews::ReviewRequest},
    state::State,
};

/// Update Review Handler
#[endpoint(
    tags("reviews"),
    summary = "Update Review",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Review updated"),
        (status_code = StatusCode::NOT_FOUND, description = "Product or review not found"),
        (status_code = StatusCode::BAD_REQUEST, description = "Rating or comment invalid"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
#[tracing::instrument(
    name = "reviews.update",
    skip(id, review_id, json, depot),
    fields(
        product_uuid = tracing::field::Empty,
        review_uuid = tracing::field::Empty
    ),
    err
)]
pub(crate) async fn handler(
    id: PathParam<Uuid>,
    review_id: PathParam<Uuid>,
    json: JsonBody<ReviewRequest>,
    depot: &mut Depot,
) -> Result<Json<DataResponse<ReviewResponse>>, ApiError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let product = id.into_inner();
    let review = review_id.into_inner();
    let request = json.into_inner();

    let span = tracing::Span::current();

    span.record("product_uuid", tracing::field::display(product));
    span.record("review_uuid", tracing::field::display(review));

    let updated = state
        .app
        .products
        .update_review(
            product.into(),
            review.into(),
            ReviewUpdate {
                rating: request.rating,
                comment: request.comment,
            },
        )
        .await
        .map_err(|e| into_api_error(e, "Error updating review."))?;

    Ok(DataResponse::new(
        "Review updated successfully.",
        updated.into(),
    ))
}
