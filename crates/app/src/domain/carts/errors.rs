//! Carts service errors.

use sqlx::{
    Error,
    error::{DatabaseError, ErrorKind},
};
use thiserror::Error;

use crate::domain::{carts::records::MAX_QUANTITY, products::ProductsServiceError};

#[derive(Debug, Error)]
pub enum CartsServiceError {
    /// The user has no cart yet.
    #[error("cart not found")]
    NotFound,

    /// The cart has no line for the product.
    #[error("product not found in cart")]
    LineNotFound,

    /// The product does not exist in the catalog.
    #[error("product not found")]
    ProductNotFound,

    #[error("quantity must be between 1 and {MAX_QUANTITY}")]
    InvalidQuantity,

    /// A line or cart total does not fit in the amount type.
    #[error("amount overflow")]
    AmountOverflow,

    #[error("related resource not found")]
    InvalidReference,

    #[error("invalid data")]
    InvalidData,

    #[error("catalog lookup failed")]
    Catalog(#[source] ProductsServiceError),

    #[error("storage error")]
    Sql(#[source] Error),
}

impl From<Error> for CartsServiceError {
    fn from(error: Error) -> Self {
        if matches!(error, Error::RowNotFound) {
            return Self::NotFound;
        }

        match error.as_database_error().map(DatabaseError::kind) {
            Some(ErrorKind::ForeignKeyViolation) => Self::InvalidReference,
            Some(ErrorKind::CheckViolation | ErrorKind::NotNullViolation) => Self::InvalidData,
            Some(ErrorKind::UniqueViolation | ErrorKind::Other | _) | None => Self::Sql(error),
        }
    }
}

impl From<ProductsServiceError> for CartsServiceError {
    fn from(error: ProductsServiceError) -> Self {
        match error {
            ProductsServiceError::NotFound => Self::ProductNotFound,
            other => Self::Catalog(other),
        }
    }
}
