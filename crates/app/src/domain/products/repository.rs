//! Products Repository

use async_trait::async_trait;
use jiff_sqlx::Timestamp as SqlxTimestamp;
use mockall::automock;
use rustc_hash::FxHashMap;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as};
use uuid::Uuid;

use crate::{
    database::Db,
    domain::products::records::{
        ProductCategory, ProductRecord, ProductSize, ProductUuid, ReviewRecord, ReviewUuid,
    },
};

const LIST_PRODUCTS_SQL: &str = include_str!("sql/list_products.sql");
const FIND_PRODUCT_SQL: &str = include_str!("sql/find_product.sql");
const FIND_PRODUCTS_SQL: &str = include_str!("sql/find_products.sql");
const LIST_REVIEWS_SQL: &str = include_str!("sql/list_reviews.sql");
const CREATE_PRODUCT_SQL: &str = include_str!("sql/create_product.sql");
const UPDATE_PRODUCT_SQL: &str = include_str!("sql/update_product.sql");
const DELETE_PRODUCT_SQL: &str = include_str!("sql/delete_product.sql");
const SAVE_REVIEW_SQL: &str = include_str!("sql/save_review.sql");
const DELETE_REVIEW_SQL: &str = include_str!("sql/delete_review.sql");
const UPDATE_AVERAGE_RATING_SQL: &str = include_str!("sql/update_average_rating.sql");

/// Catalog persistence.
#[automock]
#[async_trait]
pub(crate) trait ProductsRepository: Send + Sync {
    /// All products with their reviews, newest first.
    async fn list_products(&self) -> Result<Vec<ProductRecord>, sqlx::Error>;

    async fn find_product(
        &self,
        product: ProductUuid,
    ) -> Result<Option<ProductRecord>, sqlx::Error>;

    /// Products matching any of `products`; unknown ids are skipped.
    async fn find_products(
        &self,
        products: Vec<ProductUuid>,
    ) -> Result<Vec<ProductRecord>, sqlx::Error>;

    async fn create_product(&self, product: &ProductRecord) -> Result<(), sqlx::Error>;

    async fn update_product(&self, product: &ProductRecord) -> Result<u64, sqlx::Error>;

    async fn delete_product(&self, product: ProductUuid) -> Result<u64, sqlx::Error>;

    /// Inserts or updates `review` and stores the product's new average in
    /// the same transaction.
    async fn save_review(
        &self,
        review: &ReviewRecord,
        average_rating: f64,
    ) -> Result<(), sqlx::Error>;

    /// Deletes `review` and stores the product's new average in the same
    /// transaction.
    async fn delete_review(
        &self,
        review: &ReviewRecord,
        average_rating: f64,
    ) -> Result<u64, sqlx::Error>;
}

#[derive(Debug, Clone)]
pub(crate) struct PgProductsRepository {
    db: Db,
}

impl PgProductsRepository {
    #[must_use]
    pub(crate) fn new(db: Db) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ProductsRepository for PgProductsRepository {
    async fn list_products(&self) -> Result<Vec<ProductRecord>, sqlx::Error> {
        let mut tx = self.db.begin().await?;

        let mut products = query_as::<Postgres, ProductRecord>(LIST_PRODUCTS_SQL)
            .fetch_all(&mut *tx)
            .await?;

        attach_reviews(&mut tx, &mut products).await?;

        tx.commit().await?;

        Ok(products)
    }

    async fn find_product(
        &self,
        product: ProductUuid,
    ) -> Result<Option<ProductRecord>, sqlx::Error> {
        let mut tx = self.db.begin().await?;

        let Some(product) = query_as::<Postgres, ProductRecord>(FIND_PRODUCT_SQL)
            .bind(product.into_uuid())
            .fetch_optional(&mut *tx)
            .await?
        else {
            return Ok(None);
        };

        let mut products = [product];

        attach_reviews(&mut tx, &mut products).await?;

        tx.commit().await?;

        let [product] = products;

        Ok(Some(product))
    }

    async fn find_products(
        &self,
        products: Vec<ProductUuid>,
    ) -> Result<Vec<ProductRecord>, sqlx::Error> {
        let uuids: Vec<Uuid> = products.into_iter().map(ProductUuid::into_uuid).collect();

        let mut tx = self.db.begin().await?;

        let mut products = query_as::<Postgres, ProductRecord>(FIND_PRODUCTS_SQL)
            .bind(uuids)
            .fetch_all(&mut *tx)
            .await?;

        attach_reviews(&mut tx, &mut products).await?;

        tx.commit().await?;

        Ok(products)
    }

    async fn create_product(&self, product: &ProductRecord) -> Result<(), sqlx::Error> {
        query(CREATE_PRODUCT_SQL)
            .bind(product.uuid.into_uuid())
            .bind(&product.name)
            .bind(&product.description)
            .bind(price_to_i64(product.price)?)
            .bind(&product.brand_name)
            .bind(&product.color)
            .bind(size_names(&product.sizes))
            .bind(&product.image_url)
            .bind(product.category.as_str())
            .bind(product.average_rating)
            .bind(SqlxTimestamp::from(product.created_at))
            .bind(SqlxTimestamp::from(product.updated_at))
            .execute(self.db.pool())
            .await?;

        Ok(())
    }

    async fn update_product(&self, product: &ProductRecord) -> Result<u64, sqlx::Error> {
        let rows_affected = query(UPDATE_PRODUCT_SQL)
            .bind(product.uuid.into_uuid())
            .bind(&product.name)
            .bind(&product.description)
            .bind(price_to_i64(product.price)?)
            .bind(&product.brand_name)
            .bind(&product.color)
            .bind(size_names(&product.sizes))
            .bind(&product.image_url)
            .bind(product.category.as_str())
            .bind(SqlxTimestamp::from(product.updated_at))
            .execute(self.db.pool())
            .await?
            .rows_affected();

        Ok(rows_affected)
    }

    async fn delete_product(&self, product: ProductUuid) -> Result<u64, sqlx::Error> {
        let rows_affected = query(DELETE_PRODUCT_SQL)
            .bind(product.into_uuid())
            .execute(self.db.pool())
            .await?
            .rows_affected();

        Ok(rows_affected)
    }

    async fn save_review(
        &self,
        review: &ReviewRecord,
        average_rating: f64,
    ) -> Result<(), sqlx::Error> {
        let mut tx = self.db.begin().await?;

        query(SAVE_REVIEW_SQL)
            .bind(review.uuid.into_uuid())
            .bind(review.product_uuid.into_uuid())
            .bind(review.user_uuid.into_uuid())
            .bind(i16::from(review.rating))
            .bind(&review.comment)
            .bind(SqlxTimestamp::from(review.created_at))
            .bind(SqlxTimestamp::from(review.updated_at))
            .execute(&mut *tx)
            .await?;

        query(UPDATE_AVERAGE_RATING_SQL)
            .bind(review.product_uuid.into_uuid())
            .bind(average_rating)
            .execute(&mut *tx)
            .await?;

        tx.commit().await
    }

    async fn delete_review(
        &self,
        review: &ReviewRecord,
        average_rating: f64,
    ) -> Result<u64, sqlx::Error> {
        let mut tx = self.db.begin().await?;

        let rows_affected = query(DELETE_REVIEW_SQL)
            .bind(review.uuid.into_uuid())
            .bind(review.product_uuid.into_uuid())
            .execute(&mut *tx)
            .await?
            .rows_affected();

        query(UPDATE_AVERAGE_RATING_SQL)
            .bind(review.product_uuid.into_uuid())
            .bind(average_rating)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(rows_affected)
    }
}

async fn attach_reviews(
    tx: &mut Transaction<'_, Postgres>,
    products: &mut [ProductRecord],
) -> Result<(), sqlx::Error> {
    if products.is_empty() {
        return Ok(());
    }

    let uuids: Vec<Uuid> = products.iter().map(|p| p.uuid.into_uuid()).collect();

    let reviews = query_as::<Postgres, ReviewRecord>(LIST_REVIEWS_SQL)
        .bind(uuids)
        .fetch_all(&mut **tx)
        .await?;

    let mut by_product: FxHashMap<ProductUuid, Vec<ReviewRecord>> = FxHashMap::default();

    for review in reviews {
        by_product.entry(review.product_uuid).or_default().push(review);
    }

    for product in products {
        if let Some(reviews) = by_product.remove(&product.uuid) {
            product.reviews = reviews;
        }
    }

    Ok(())
}

fn price_to_i64(price: u64) -> Result<i64, sqlx::Error> {
    i64::try_from(price).map_err(|e| sqlx::Error::Encode(Box::new(e)))
}

fn size_names(sizes: &[ProductSize]) -> Vec<String> {
    sizes.iter().map(ToString::to_string).collect()
}

impl<'r> FromRow<'r, PgRow> for ProductRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let price: i64 = row.try_get("price")?;
        let sizes: Vec<String> = row.try_get("sizes")?;
        let category: String = row.try_get("category")?;

        Ok(Self {
            uuid: ProductUuid::from_uuid(row.try_get("uuid")?),
            name: row.try_get("name")?,
            description: row.try_get("description")?,
            price: u64::try_from(price).map_err(|e| sqlx::Error::ColumnDecode {
                index: "price".to_string(),
                source: Box::new(e),
            })?,
            brand_name: row.try_get("brand_name")?,
            color: row.try_get("color")?,
            sizes: sizes
                .iter()
                .map(|size| size.parse::<ProductSize>())
                .collect::<Result<_, _>>()
                .map_err(|e| sqlx::Error::ColumnDecode {
                    index: "sizes".to_string(),
                    source: Box::new(e),
                })?,
            image_url: row.try_get("image_url")?,
            category: category
                .parse::<ProductCategory>()
                .map_err(|e| sqlx::Error::ColumnDecode {
                    index: "category".to_string(),
                    source: Box::new(e),
                })?,
            average_rating: row.try_get("average_rating")?,
            reviews: Vec::new(),
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}

impl<'r> FromRow<'r, PgRow> for ReviewRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let rating: i16 = row.try_get("rating")?;

        Ok(Self {
            uuid: ReviewUuid::from_uuid(row.try_get("uuid")?),
            product_uuid: ProductUuid::from_uuid(row.try_get("product_uuid")?),
            user_uuid: row.try_get::<Uuid, _>("user_uuid")?.into(),
            rating: u8::try_from(rating).map_err(|e| sqlx::Error::ColumnDecode {
                index: "rating".to_string(),
                source: Box::new(e),
            })?,
            comment: row.try_get("comment")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}
