//! List Products Handler

use std::sync::Arc;

use salvo::prelude::*;

use crate::{
    envelope::{ApiError, DataResponse},
    extensions::*,
    products::{errors::into_api_error, models::ProductResponse},
    state::State,
};

/// List Products Handler
///
/// Returns the whole catalog with reviews.
#[endpoint(
    tags("products"),
    summary = "List Products",
    responses(
        (status_code = StatusCode::OK, description = "Product list"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    depot: &mut Depot,
) -> Result<Json<DataResponse<Vec<ProductResponse>>>, ApiError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let products = state
        .app
        .products
        .list_products()
        .await
        .map_err(|e| into_api_error(e, "Error fetching products."))?;

    Ok(DataResponse::new(
        "Products retrieved successfully.",
        products.into_iter().map(Into::into).collect(),
    ))
}
