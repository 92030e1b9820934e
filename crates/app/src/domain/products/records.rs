//! Product Records

use std::{fmt, str::FromStr};

use jiff::Timestamp;
use thiserror::Error;

use crate::{domain::users::UserUuid, uuids::TypedUuid};

/// Product UUID
pub type ProductUuid = TypedUuid<ProductRecord>;

/// Review UUID
pub type ReviewUuid = TypedUuid<ReviewRecord>;

/// Rating given to products without any reviews.
pub const DEFAULT_RATING: f64 = 1.0;

/// Product Record
#[derive(Debug, Clone, PartialEq)]
pub struct ProductRecord {
    pub uuid: ProductUuid,
    pub name: String,
    pub description: String,
    pub price: u64,
    pub brand_name: String,
    pub color: String,
    pub sizes: Vec<ProductSize>,
    pub image_url: String,
    pub category: ProductCategory,
    pub average_rating: f64,
    pub reviews: Vec<ReviewRecord>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl ProductRecord {
    /// Recomputes `average_rating` from the attached reviews.
    pub fn refresh_average_rating(&mut self) {
        self.average_rating = average_rating(&self.reviews);
    }

    pub(crate) fn review_mut(&mut self, review: ReviewUuid) -> Option<&mut ReviewRecord> {
        self.reviews.iter_mut().find(|r| r.uuid == review)
    }
}

/// Review Record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewRecord {
    pub uuid: ReviewUuid,
    pub product_uuid: ProductUuid,
    pub user_uuid: UserUuid,
    pub rating: u8,
    pub comment: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Mean rating across `reviews`, or [`DEFAULT_RATING`] when there are none.
#[must_use]
pub fn average_rating(reviews: &[ReviewRecord]) -> f64 {
    if reviews.is_empty() {
        return DEFAULT_RATING;
    }

    let sum: u32 = reviews.iter().map(|r| u32::from(r.rating)).sum();
    let count = u32::try_from(reviews.len()).unwrap_or(u32::MAX);

    f64::from(sum) / f64::from(count)
}

/// Catalog category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProductCategory {
    Shirts,
    Pants,
    Jackets,
    Accessories,
    Others,
}

impl ProductCategory {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Shirts => "Shirts",
            Self::Pants => "Pants",
            Self::Jackets => "Jackets",
            Self::Accessories => "Accessories",
            Self::Others => "Others",
        }
    }
}

impl fmt::Display for ProductCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unrecognised category name.
#[derive(Debug, Error)]
#[error("invalid category `{0}`")]
pub struct InvalidCategory(pub String);

impl FromStr for ProductCategory {
    type Err = InvalidCategory;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "Shirts" => Ok(Self::Shirts),
            "Pants" => Ok(Self::Pants),
            "Jackets" => Ok(Self::Jackets),
            "Accessories" => Ok(Self::Accessories),
            "Others" => Ok(Self::Others),
            other => Err(InvalidCategory(other.to_string())),
        }
    }
}

/// Garment size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ProductSize {
    S,
    M,
    L,
    Xl,
    Xxl,
}

impl ProductSize {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::S => "S",
            Self::M => "M",
            Self::L => "L",
            Self::Xl => "XL",
            Self::Xxl => "XXL",
        }
    }
}

impl fmt::Display for ProductSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unrecognised size name.
#[derive(Debug, Error)]
#[error("invalid size `{0}`")]
pub struct InvalidSize(pub String);

impl FromStr for ProductSize {
    type Err = InvalidSize;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "S" => Ok(Self::S),
            "M" => Ok(Self::M),
            "L" => Ok(Self::L),
            "XL" => Ok(Self::Xl),
            "XXL" => Ok(Self::Xxl),
            other => Err(InvalidSize(other.to_string())),
        }
    }
}
