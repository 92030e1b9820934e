//! Checkout errors.

use thiserror::Error;

use crate::domain::{
    carts::CartsServiceError,
    orders::{OrdersServiceError, records::OrderUuid},
};

#[derive(Debug, Error)]
pub enum CheckoutError {
    /// The user has no cart, or it has no lines.
    #[error("cart is empty")]
    EmptyCart,

    #[error("failed to load cart")]
    Cart(#[source] CartsServiceError),

    #[error("failed to create order")]
    Order(#[source] OrdersServiceError),

    /// The order was placed but the cart still holds its lines.
    #[error("order {order_uuid} was placed but the cart could not be cleared")]
    CartNotCleared {
        order_uuid: OrderUuid,
        #[source]
        source: CartsServiceError,
    },
}
