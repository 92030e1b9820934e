//! Checkout service.

use std::{fmt, sync::Arc};

use async_trait::async_trait;
use mockall::automock;
use tracing::{error, info};

use crate::domain::{
    carts::{CartsService, CartsServiceError},
    checkout::errors::CheckoutError,
    orders::{
        OrdersService,
        data::{NewOrder, ShippingAddress},
        records::{OrderItemRecord, OrderRecord},
        status::PaymentMethod,
    },
    users::UserUuid,
};

/// Checkout request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceOrder {
    pub shipping_address: ShippingAddress,
    pub payment_method: PaymentMethod,
}

/// Turns a cart into an order in two ordered steps: create the order, then
/// empty the cart. There is no enclosing transaction; if clearing fails the
/// order stands and the failure is reported as
/// [`CheckoutError::CartNotCleared`].
#[derive(Clone)]
pub struct CartCheckoutService {
    carts: Arc<dyn CartsService>,
    orders: Arc<dyn OrdersService>,
}

impl CartCheckoutService {
    #[must_use]
    pub fn new(carts: Arc<dyn CartsService>, orders: Arc<dyn OrdersService>) -> Self {
        Self { carts, orders }
    }
}

impl fmt::Debug for CartCheckoutService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CartCheckoutService").finish_non_exhaustive()
    }
}

#[async_trait]
impl CheckoutService for CartCheckoutService {
    async fn place_order(
        &self,
        user: UserUuid,
        request: PlaceOrder,
    ) -> Result<OrderRecord, CheckoutError> {
        let cart = match self.carts.current_cart(user).await {
            Ok(cart) if !cart.is_empty() => cart,
            Ok(_) | Err(CartsServiceError::NotFound) => return Err(CheckoutError::EmptyCart),
            Err(error) => return Err(CheckoutError::Cart(error)),
        };

        let items = cart
            .lines
            .iter()
            .copied()
            .map(OrderItemRecord::from)
            .collect();

        let order = self
            .orders
            .create_order(
                user,
                NewOrder {
                    items,
                    shipping_address: request.shipping_address,
                    payment_method: request.payment_method,
                },
            )
            .await
            .map_err(CheckoutError::Order)?;

        if let Err(source) = self.carts.clear_cart(user).await {
            error!(order = %order.uuid, error = %source, "order placed but cart not cleared");

            return Err(CheckoutError::CartNotCleared {
                order_uuid: order.uuid,
                source,
            });
        }

        info!(order = %order.uuid, total_amount = order.total_amount, "order placed");

        Ok(order)
    }
}

#[automock]
#[async_trait]
pub trait CheckoutService: Send + Sync {
    /// Places an order for everything in the user's cart and empties it.
    async fn place_order(
        &self,
        user: UserUuid,
        request: PlaceOrder,
    ) -> Result<OrderRecord, CheckoutError>;
}
