//! Add Review Handler

use std::sync::Arc;

use salvo::{
    oapi::extract::{JsonBody, PathParam},
    prelude::*,
};
use uuid::Uuid;

use storefront_app::domain::products::data::NewReview;

use crate::{
    envelope::{ApiError, DataResponse},
    extensions::*,
    products::{errors::into_api_error, models::ReviewResponse, reviews::ReviewRequest},
    state::State,
};

/// Add Review Handler
///
/// Reviews the product as the calling user and recomputes its average rating.
#[endpoint(
    tags("reviews"),
    summary = "Add Review",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::CREATED, description = "Review added"),
        (status_code = StatusCode::NOT_FOUND, description = "Product not found"),
        (status_code = StatusCode::BAD_REQUEST, description = "Rating or comment invalid"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
#[tracing::instrument(
    name = "reviews.create",
    skip(id, json, depot, res),
    fields(
        user_uuid = tracing::field::Empty,
        product_uuid = tracing::field::Empty,
        rating = tracing::field::Empty
    ),
    err
)]
pub(crate) async fn handler(
    id: PathParam<Uuid>,
    json: JsonBody<ReviewRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<DataResponse<ReviewResponse>>, ApiError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let identity = depot.identity_or_401()?;
    let product = id.into_inner();
    let request = json.into_inner();

    let span = tracing::Span::current();

    span.record("user_uuid", tracing::field::display(identity.user_uuid));
    span.record("product_uuid", tracing::field::display(product));
    span.record("rating", request.rating);

    let review = state
        .app
        .products
        .add_review(
            product.into(),
            NewReview {
                user_uuid: identity.user_uuid,
                rating: request.rating,
                comment: request.comment,
            },
        )
        .await
        .map_err(|e| into_api_error(e, "Error adding review."))?;

    res.status_code(StatusCode::CREATED);

    Ok(DataResponse::new("Review added successfully.", review.into()))
}

#[cfg(test)]
mod tests {
    use jiff::Timestamp;
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::json;
    use testresult::TestResult;

    use storefront_app::domain::products::{
        ProductsServiceError,
        records::{ProductUuid, ReviewRecord, ReviewUuid},
    };

    use crate::{
        envelope::ErrorResponse,
        test_helpers::{TEST_USER_UUID, TestApp},
    };

    use super::*;

    fn make_service(app: TestApp) -> Service {
        app.user_service(Router::with_path("products/{id}/reviews").post(handler))
    }

    #[tokio::test]
    async fn test_add_review_as_caller() -> TestResult {
        let mut app = TestApp::default();
        let product = ProductUuid::new();
        let review = ReviewUuid::new();

        app.products
            .expect_add_review()
            .once()
            .withf(move |p, new| {
                *p == product
                    && new.user_uuid == TEST_USER_UUID
                    && new.rating == 4
                    && new.comment == "Fits well"
            })
            .return_once(move |_, new| {
                Ok(ReviewRecord {
                    uuid: review,
                    product_uuid: product,
                    user_uuid: new.user_uuid,
                    rating: new.rating,
                    comment: new.comment,
                    created_at: Timestamp::UNIX_EPOCH,
                    updated_at: Timestamp::UNIX_EPOCH,
                })
            });

        let mut res = TestClient::post(format!("http://example.com/products/{product}/reviews"))
            .json(&json!({ "rating": 4, "comment": "Fits well" }))
            .send(&make_service(app))
            .await;

        let body: DataResponse<ReviewResponse> = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::CREATED));
        assert_eq!(body.message, "Review added successfully.");
        assert_eq!(body.data.id, review.into_uuid());
        assert_eq!(body.data.user, TEST_USER_UUID.into_uuid());

        Ok(())
    }

    #[tokio::test]
    async fn test_add_review_out_of_range_rating_returns_400() -> TestResult {
        let mut app = TestApp::default();

        app.products
            .expect_add_review()
            .once()
            .return_once(|_, _| {
                Err(ProductsServiceError::Validation(
                    "Rating must be between 1 and 5.",
                ))
            });

        let mut res = TestClient::post(format!(
            "http://example.com/products/{}/reviews",
            Uuid::now_v7()
        ))
        .json(&json!({ "rating": 9, "comment": "Great" }))
        .send(&make_service(app))
        .await;

        let body: ErrorResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));
        assert_eq!(body.message, "Rating must be between 1 and 5.");

        Ok(())
    }

    #[tokio::test]
    async fn test_add_review_without_identity_returns_401() -> TestResult {
        let app = TestApp::default();

        let service = app.public_service(Router::with_path("products/{id}/reviews").post(handler));

        let res = TestClient::post(format!(
            "http://example.com/products/{}/reviews",
            Uuid::now_v7()
        ))
        .json(&json!({ "rating": 4, "comment": "Great" }))
        .send(&service)
        .await;

        assert_eq!(res.status_code, Some(StatusCode::UNAUTHORIZED));

        Ok(())
    }
}
