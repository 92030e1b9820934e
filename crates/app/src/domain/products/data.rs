//! Products Data

use crate::domain::{
    products::{
        errors::ProductsServiceError,
        records::{ProductCategory, ProductSize},
    },
    users::UserUuid,
};

/// Product fields supplied on create and on update.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductDetails {
    pub name: String,
    pub description: String,
    pub price: u64,
    pub brand_name: String,
    pub color: String,
    pub sizes: Vec<ProductSize>,
    pub image_url: String,
    pub category: ProductCategory,
}

impl ProductDetails {
    /// Trims text fields and rejects blanks or an empty size list.
    ///
    /// # Errors
    ///
    /// Returns [`ProductsServiceError::Validation`] naming the offending field.
    pub fn normalized(mut self) -> Result<Self, ProductsServiceError> {
        for (field, message) in [
            (&mut self.name, "Product name is required."),
            (&mut self.description, "Product description is required."),
            (&mut self.brand_name, "Brand name is required."),
            (&mut self.color, "Color is required."),
            (&mut self.image_url, "Image URL is required."),
        ] {
            let trimmed = field.trim();

            if trimmed.is_empty() {
                return Err(ProductsServiceError::Validation(message));
            }

            *field = trimmed.to_string();
        }

        if self.sizes.is_empty() {
            return Err(ProductsServiceError::Validation(
                "At least one size is required.",
            ));
        }

        self.sizes.sort_unstable();
        self.sizes.dedup();

        Ok(self)
    }
}

/// New Review Data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewReview {
    pub user_uuid: UserUuid,
    pub rating: u8,
    pub comment: String,
}

/// Review Update Data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewUpdate {
    pub rating: u8,
    pub comment: String,
}

/// Checks a rating/comment pair, returning the trimmed comment.
pub(crate) fn validate_review(rating: u8, comment: &str) -> Result<String, ProductsServiceError> {
    if !(1..=5).contains(&rating) {
        return Err(ProductsServiceError::Validation(
            "Rating must be between 1 and 5.",
        ));
    }

    let comment = comment.trim();

    if comment.is_empty() {
        return Err(ProductsServiceError::Validation("Comment is required."));
    }

    Ok(comment.to_string())
}
