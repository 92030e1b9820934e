//! Orders service errors.

use sqlx::{
    Error,
    error::{DatabaseError, ErrorKind},
};
use thiserror::Error;

use crate::domain::{orders::status::OrderStatus, products::ProductsServiceError};

#[derive(Debug, Error)]
pub enum OrdersServiceError {
    /// No order with that id belongs to the caller.
    #[error("order not found")]
    NotFound,

    /// The caller has no orders at all.
    #[error("no orders found")]
    NoOrders,

    #[error("order has no items")]
    NoItems,

    /// A shipping address field is blank.
    #[error("shipping address {0} is required")]
    MissingAddressField(&'static str),

    #[error("order total overflows")]
    AmountOverflow,

    #[error("cannot cancel a {0} order")]
    InvalidTransition(OrderStatus),

    #[error("invalid data")]
    InvalidData,

    #[error("catalog lookup failed")]
    Catalog(#[source] ProductsServiceError),

    #[error("storage error")]
    Sql(#[source] Error),
}

impl From<Error> for OrdersServiceError {
    fn from(error: Error) -> Self {
        if matches!(error, Error::RowNotFound) {
            return Self::NotFound;
        }

        match error.as_database_error().map(DatabaseError::kind) {
            Some(ErrorKind::CheckViolation | ErrorKind::NotNullViolation) => Self::InvalidData,
            Some(
                ErrorKind::UniqueViolation | ErrorKind::ForeignKeyViolation | ErrorKind::Other | _,
            )
            | None => Self::Sql(error),
        }
    }
}
