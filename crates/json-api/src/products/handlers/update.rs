//! Update Product Handler

use std::sync::Arc;

use salvo::{
    oapi::extract::{JsonBody, PathParam},
    prelude::*,
};
use uuid::Uuid;

use storefront_app::domain::products::data::ProductDetails;

use crate::{
    envelope::{ApiError, DataResponse},
    extensions::*,
    products::{
        errors::into_api_error,
        models::{ProductRequest, ProductResponse},
    },
    state::State,
};

/// Update Product Handler
///
/// Admin only. Replaces every editable field; reviews are untouched.
#[endpoint(
    tags("products"),
    summary = "Update Product",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Product updated"),
        (status_code = StatusCode::NOT_FOUND, description = "Product not found"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::UNAUTHORIZED, description = "Missing or invalid token"),
        (status_code = StatusCode::FORBIDDEN, description = "Caller is not an admin"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
#[tracing::instrument(
    name = "products.update",
    skip(id, json, depot),
    fields(product_uuid = tracing::field::Empty, price = tracing::field::Empty),
    err
)]
pub(crate) async fn handler(
    id: PathParam<Uuid>,
    json: JsonBody<ProductRequest>,
    depot: &mut Depot,
) -> Result<Json<DataResponse<ProductResponse>>, ApiError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let product = id.into_inner();
    let details = ProductDetails::try_from(json.into_inner())?;

    let span = tracing::Span::current();

    span.record("product_uuid", tracing::field::display(product));
    span.record("price", details.price);

    let updated = state
        .app
        .products
        .update_product(product.into(), details)
        .await
        .map_err(|e| into_api_error(e, "Error updating product."))?;

    Ok(DataResponse::new(
        "Product updated successfully.",
        updated.into(),
    ))
}
