//! Product request and response bodies shared by the product, review and
//! cart routes.

use salvo::oapi::ToSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use storefront_app::domain::products::{
    data::ProductDetails,
    records::{ProductCategory, ProductRecord, ProductSize, ReviewRecord},
};

use crate::envelope::ApiError;

/// Product fields accepted on create and update
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ProductRequest {
    #[serde(default)]
    pub product_name: String,

    #[serde(default)]
    pub description: String,

    /// Price in minor currency units
    pub price: u64,

    #[serde(default)]
    pub brand_name: String,

    #[serde(default)]
    pub color: String,

    /// One or more of `S`, `M`, `L`, `XL`, `XXL`
    #[serde(default)]
    pub size: Vec<String>,

    #[serde(default)]
    pub image_url: String,

    /// One of `Shirts`, `Pants`, `Jackets`, `Accessories`, `Others`
    #[serde(default)]
    pub category: String,
}

impl TryFrom<ProductRequest> for ProductDetails {
    type Error = ApiError;

    fn try_from(request: ProductRequest) -> Result<Self, Self::Error> {
        let category = request
            .category
            .parse::<ProductCategory>()
            .map_err(|_ignored| ApiError::bad_request("Invalid category."))?;

        let sizes = request
            .size
            .iter()
            .map(|size| size.parse::<ProductSize>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|_ignored| ApiError::bad_request("Invalid size."))?;

        Ok(ProductDetails {
            name: request.product_name,
            description: request.description,
            price: request.price,
            brand_name: request.brand_name,
            color: request.color,
            sizes,
            image_url: request.image_url,
            category,
        })
    }
}

/// Product Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ProductResponse {
    pub id: Uuid,
    pub product_name: String,
    pub description: String,
    pub price: u64,
    pub brand_name: String,
    pub color: String,
    pub size: Vec<String>,
    pub image_url: String,
    pub category: String,

    /// Mean review rating, `1.0` while the product has no reviews
    pub average_rating: f64,

    pub reviews: Vec<ReviewResponse>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<ProductRecord> for ProductResponse {
    fn from(product: ProductRecord) -> Self {
        Self {
            id: product.uuid.into_uuid(),
            product_name: product.name,
            description: product.description,
            price: product.price,
            brand_name: product.brand_name,
            color: product.color,
            size: product
                .sizes
                .iter()
                .map(|size| size.as_str().to_string())
                .collect(),
            image_url: product.image_url,
            category: product.category.as_str().to_string(),
            average_rating: product.average_rating,
            reviews: product.reviews.into_iter().map(Into::into).collect(),
            created_at: product.created_at.to_string(),
            updated_at: product.updated_at.to_string(),
        }
    }
}

/// Review Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ReviewResponse {
    pub id: Uuid,

    /// Author of the review
    pub user: Uuid,

    pub rating: u8,
    pub comment: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<ReviewRecord> for ReviewResponse {
    fn from(review: ReviewRecord) -> Self {
        Self {
            id: review.uuid.into_uuid(),
            user: review.user_uuid.into_uuid(),
            rating: review.rating,
            comment: review.comment,
            created_at: review.created_at.to_string(),
            updated_at: review.updated_at.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    fn request() -> ProductRequest {
        ProductRequest {
            product_name: "Oxford Shirt".to_string(),
            description: "Button-down".to_string(),
            price: 2_500,
            brand_name: "Acme".to_string(),
            color: "Blue".to_string(),
            size: vec!["M".to_string(), "XL".to_string()],
            image_url: "https://example.com/shirt.png".to_string(),
            category: "Shirts".to_string(),
        }
    }

    #[test]
    fn request_converts_to_details() -> TestResult {
        let details = ProductDetails::try_from(request())?;

        assert_eq!(details.name, "Oxford Shirt");
        assert_eq!(details.sizes, vec![ProductSize::M, ProductSize::Xl]);
        assert_eq!(details.category, ProductCategory::Shirts);

        Ok(())
    }

    #[test]
    fn unknown_category_is_rejected() {
        let result = ProductDetails::try_from(ProductRequest {
            category: "Hats".to_string(),
            ..request()
        });

        assert!(
            matches!(&result, Err(error) if error.message() == "Invalid category."),
            "expected invalid category, got {result:?}"
        );
    }

    #[test]
    fn unknown_size_is_rejected() {
        let result = ProductDetails::try_from(ProductRequest {
            size: vec!["XS".to_string()],
            ..request()
        });

        assert!(
            matches!(&result, Err(error) if error.message() == "Invalid size."),
            "expected invalid size, got {result:?}"
        );
    }
}
