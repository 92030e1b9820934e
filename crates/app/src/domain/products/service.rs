//! Products service.

use std::{fmt, sync::Arc};

use async_trait::async_trait;
use jiff::Timestamp;
use mockall::automock;
use tracing::debug;

use crate::{
    database::Db,
    domain::products::{
        data::{NewReview, ProductDetails, ReviewUpdate, validate_review},
        errors::ProductsServiceError,
        records::{DEFAULT_RATING, ProductRecord, ProductUuid, ReviewRecord, ReviewUuid},
        repository::{PgProductsRepository, ProductsRepository},
    },
};

#[derive(Clone)]
pub struct PgProductsService {
    repository: Arc<dyn ProductsRepository>,
}

impl PgProductsService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            repository: Arc::new(PgProductsRepository::new(db)),
        }
    }

    #[cfg(test)]
    pub(crate) fn with_repository(repository: impl ProductsRepository + 'static) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    async fn load(&self, product: ProductUuid) -> Result<ProductRecord, ProductsServiceError> {
        self.repository
            .find_product(product)
            .await?
            .ok_or(ProductsServiceError::NotFound)
    }
}

impl fmt::Debug for PgProductsService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PgProductsService").finish_non_exhaustive()
    }
}

#[async_trait]
impl ProductsService for PgProductsService {
    async fn list_products(&self) -> Result<Vec<ProductRecord>, ProductsServiceError> {
        Ok(self.repository.list_products().await?)
    }

    async fn get_product(&self, product: ProductUuid) -> Result<ProductRecord, ProductsServiceError> {
        self.load(product).await
    }

    async fn find_products(
        &self,
        products: Vec<ProductUuid>,
    ) -> Result<Vec<ProductRecord>, ProductsServiceError> {
        if products.is_empty() {
            return Ok(Vec::new());
        }

        Ok(self.repository.find_products(products).await?)
    }

    async fn create_product(
        &self,
        details: ProductDetails,
    ) -> Result<ProductRecord, ProductsServiceError> {
        let details = details.normalized()?;
        let now = Timestamp::now();

        let product = ProductRecord {
            uuid: ProductUuid::new(),
            name: details.name,
            description: details.description,
            price: details.price,
            brand_name: details.brand_name,
            color: details.color,
            sizes: details.sizes,
            image_url: details.image_url,
            category: details.category,
            average_rating: DEFAULT_RATING,
            reviews: Vec::new(),
            created_at: now,
            updated_at: now,
        };

        self.repository.create_product(&product).await?;

        debug!(product = %product.uuid, "created product");

        Ok(product)
    }

    async fn update_product(
        &self,
        product: ProductUuid,
        details: ProductDetails,
    ) -> Result<ProductRecord, ProductsServiceError> {
        let details = details.normalized()?;
        let mut record = self.load(product).await?;

        record.name = details.name;
        record.description = details.description;
        record.price = details.price;
        record.brand_name = details.brand_name;
        record.color = details.color;
        record.sizes = details.sizes;
        record.image_url = details.image_url;
        record.category = details.category;
        record.updated_at = Timestamp::now();

        if self.repository.update_product(&record).await? == 0 {
            return Err(ProductsServiceError::NotFound);
        }

        Ok(record)
    }

    async fn delete_product(&self, product: ProductUuid) -> Result<(), ProductsServiceError> {
        let rows_affected = self.repository.delete_product(product).await?;

        if rows_affected == 0 {
            return Err(ProductsServiceError::NotFound);
        }

        Ok(())
    }

    async fn add_review(
        &self,
        product: ProductUuid,
        review: NewReview,
    ) -> Result<ReviewRecord, ProductsServiceError> {
        let comment = validate_review(review.rating, &review.comment)?;
        let mut record = self.load(product).await?;
        let now = Timestamp::now();

        let review = ReviewRecord {
            uuid: ReviewUuid::new(),
            product_uuid: product,
            user_uuid: review.user_uuid,
            rating: review.rating,
            comment,
            created_at: now,
            updated_at: now,
        };

        record.reviews.push(review.clone());
        record.refresh_average_rating();

        self.repository
            .save_review(&review, record.average_rating)
            .await?;

        Ok(review)
    }

    async fn update_review(
        &self,
        product: ProductUuid,
        review: ReviewUuid,
        update: ReviewUpdate,
    ) -> Result<ReviewRecord, ProductsServiceError> {
        let comment = validate_review(update.rating, &update.comment)?;
        let mut record = self.load(product).await?;

        let existing = record
            .review_mut(review)
            .ok_or(ProductsServiceError::ReviewNotFound)?;

        existing.rating = update.rating;
        existing.comment = comment;
        existing.updated_at = Timestamp::now();

        let updated = existing.clone();

        record.refresh_average_rating();

        self.repository
            .save_review(&updated, record.average_rating)
            .await?;

        Ok(updated)
    }

    async fn delete_review(
        &self,
        product: ProductUuid,
        review: ReviewUuid,
    ) -> Result<(), ProductsServiceError> {
        let mut record = self.load(product).await?;

        let position = record
            .reviews
            .iter()
            .position(|r| r.uuid == review)
            .ok_or(ProductsServiceError::ReviewNotFound)?;

        let removed = record.reviews.remove(position);

        record.refresh_average_rating();

        let rows_affected = self
            .repository
            .delete_review(&removed, record.average_rating)
            .await?;

        if rows_affected == 0 {
            return Err(ProductsServiceError::ReviewNotFound);
        }

        Ok(())
    }
}

#[automock]
#[async_trait]
pub trait ProductsService: Send + Sync {
    /// Retrieves all products.
    async fn list_products(&self) -> Result<Vec<ProductRecord>, ProductsServiceError>;

    /// Retrieve a single product.
    async fn get_product(&self, product: ProductUuid) -> Result<ProductRecord, ProductsServiceError>;

    /// Batch lookup; ids with no matching product are omitted from the result.
    async fn find_products(
        &self,
        products: Vec<ProductUuid>,
    ) -> Result<Vec<ProductRecord>, ProductsServiceError>;

    /// Creates a new product.
    async fn create_product(
        &self,
        details: ProductDetails,
    ) -> Result<ProductRecord, ProductsServiceError>;

    /// Replaces the editable fields of a product.
    async fn update_product(
        &self,
        product: ProductUuid,
        details: ProductDetails,
    ) -> Result<ProductRecord, ProductsServiceError>;

    /// Deletes a product with the given UUID.
    async fn delete_product(&self, product: ProductUuid) -> Result<(), ProductsServiceError>;

    /// Adds a review and recomputes the product's average rating.
    async fn add_review(
        &self,
        product: ProductUuid,
        review: NewReview,
    ) -> Result<ReviewRecord, ProductsServiceError>;

    /// Edits a review and recomputes the product's average rating.
    async fn update_review(
        &self,
        product: ProductUuid,
        review: ReviewUuid,
        update: ReviewUpdate,
    ) -> Result<ReviewRecord, ProductsServiceError>;

    /// Removes a review and recomputes the product's average rating.
    async fn delete_review(
        &self,
        product: ProductUuid,
        review: ReviewUuid,
    ) -> Result<(), ProductsServiceError>;
}
