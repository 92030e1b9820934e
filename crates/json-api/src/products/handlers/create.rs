//! Create Product Handler

use std::sync::Arc;

use salvo::{
    http::header::LOCATION,
    oapi::extract::JsonBody,
    prelude::*,
};

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

/// Create Product Handler
///
/// Admin only. New products start with no reviews and a rating of `1.0`.
#[endpoint(
    tags("products"),
    summary = "Create Product",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::CREATED, description = "Product created"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::UNAUTHORIZED, description = "Missing or invalid token"),
        (status_code = StatusCode::FORBIDDEN, description = "Caller is not an admin"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
#[tracing::instrument(
    name = "products.create",
    skip(json, depot, res),
    fields(product_uuid = tracing::field::Empty, price = tracing::field::Empty),
    err
)]
pub(crate) async fn handler(
    json: JsonBody<ProductRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<DataResponse<ProductResponse>>, ApiError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let details = ProductDetails::try_from(json.into_inner())?;

    let span = tracing::Span::current();

    span.record("price", details.price);

    let product = state
        .app
        .products
        .create_product(details)
        .await
        .map_err(|e| into_api_error(e, "Error creating product."))?;

    span.record("product_uuid", tracing::field::display(product.uuid));

    res.add_header(LOCATION, format!("/api/products/{}", product.uuid), true)
        .or_500("Error creating product.")?
        .status_code(StatusCode::CREATED);

    Ok(DataResponse::new(
        "Product created successfully.",
        product.into(),
    ))
}
