//! Order Records

use jiff::Timestamp;
use rustc_hash::FxHashMap;

use crate::{
    domain::{
        carts::records::CartLineRecord,
        orders::{
            data::ShippingAddress,
            errors::OrdersServiceError,
            status::{OrderStatus, PaymentMethod},
        },
        products::records::{ProductRecord, ProductUuid},
        users::UserUuid,
    },
    uuids::TypedUuid,
};

/// Order UUID
pub type OrderUuid = TypedUuid<OrderRecord>;

/// A placed order. Items and `total_amount` never change after creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderRecord {
    /// Order id.
    pub uuid: OrderUuid,

    /// The user who placed the order; only they can read or change it.
    pub user_uuid: UserUuid,

    /// Line snapshots taken from the cart.
    pub items: Vec<OrderItemRecord>,

    /// Sum of the item totals at creation, in minor units.
    pub total_amount: u64,

    /// Where the order ships.
    pub shipping_address: ShippingAddress,

    /// How the order is paid.
    pub payment_method: PaymentMethod,

    /// Current lifecycle status.
    pub status: OrderStatus,

    /// When the order was placed.
    pub ordered_at: Timestamp,

    /// Stamped each time the order enters [`OrderStatus::Shipped`].
    pub delivery_date: Option<Timestamp>,
}

/// Purchased product, copied by value from the cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderItemRecord {
    /// Catalog product the item refers to.
    pub product_uuid: ProductUuid,

    /// Units ordered.
    pub quantity: u32,

    /// Unit price snapshotted from the cart line, in minor units.
    pub unit_price: u64,

    /// `quantity x unit_price`, in minor units.
    pub line_total: u64,
}

/// An order together with the catalog entries its items point at.
///
/// Items whose product has since been deleted have no entry in `products`.
#[derive(Debug, Clone, PartialEq)]
pub struct PopulatedOrderRecord {
    /// The order snapshot.
    pub order: OrderRecord,

    /// Catalog entries keyed by product.
    pub products: FxHashMap<ProductUuid, ProductRecord>,
}

impl PopulatedOrderRecord {
    /// The catalog entry for `product`, if it still exists.
    #[must_use]
    pub fn product(&self, product: ProductUuid) -> Option<&ProductRecord> {
        self.products.get(&product)
    }
}

impl From<CartLineRecord> for OrderItemRecord {
    fn from(line: CartLineRecord) -> Self {
        Self {
            product_uuid: line.product_uuid,
            quantity: line.quantity,
            unit_price: line.unit_price,
            line_total: line.line_total,
        }
    }
}

impl OrderRecord {
    /// Moves the order to `status`. Entering `Shipped` stamps the delivery
    /// date; any other status leaves it as is.
    pub fn transition(&mut self, status: OrderStatus, now: Timestamp) {
        self.status = status;

        if status == OrderStatus::Shipped {
            self.delivery_date = Some(now);
        }
    }

    /// Cancels the order unless it has already shipped.
    ///
    /// # Errors
    ///
    /// [`OrdersServiceError::InvalidTransition`] for shipped or delivered
    /// orders.
    pub fn cancel(&mut self) -> Result<(), OrdersServiceError> {
        if !self.status.is_cancellable() {
            return Err(OrdersServiceError::InvalidTransition(self.status));
        }

        self.status = OrderStatus::Cancelled;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    fn order(status: OrderStatus) -> OrderRecord {
        OrderRecord {
            uuid: OrderUuid::new(),
            user_uuid: UserUuid::new(),
            items: vec![OrderItemRecord {
                product_uuid: ProductUuid::new(),
                quantity: 2,
                unit_price: 10,
                line_total: 20,
            }],
            total_amount: 20,
            shipping_address: ShippingAddress {
                street: "1 High Street".to_string(),
                city: "Leeds".to_string(),
                postal_code: "LS1 1AA".to_string(),
                country: "UK".to_string(),
            },
            payment_method: PaymentMethod::CreditCard,
            status,
            ordered_at: Timestamp::now(),
            delivery_date: None,
        }
    }

    #[test]
    fn transition_to_shipped_sets_delivery_date() {
        let mut order = order(OrderStatus::Pending);
        let now = Timestamp::now();

        order.transition(OrderStatus::Shipped, now);

        assert_eq!(order.status, OrderStatus::Shipped);
        assert_eq!(order.delivery_date, Some(now));
    }

    #[test]
    fn transition_elsewhere_leaves_delivery_date_alone() {
        let mut pending = order(OrderStatus::Pending);

        pending.transition(OrderStatus::Delivered, Timestamp::now());

        assert_eq!(pending.status, OrderStatus::Delivered);
        assert!(pending.delivery_date.is_none(), "delivery date is only set on ship");

        let shipped_at = Timestamp::now();
        let mut shipped = order(OrderStatus::Pending);

        shipped.transition(OrderStatus::Shipped, shipped_at);
        shipped.transition(OrderStatus::Delivered, Timestamp::now());

        assert_eq!(shipped.delivery_date, Some(shipped_at));
    }

    #[test]
    fn transition_does_not_touch_totals() {
        let mut order = order(OrderStatus::Pending);

        order.transition(OrderStatus::Cancelled, Timestamp::now());

        assert_eq!(order.total_amount, 20);
        assert_eq!(order.items.len(), 1);
    }

    #[test]
    fn cancel_pending_order() -> TestResult {
        let mut order = order(OrderStatus::Pending);

        order.cancel()?;

        assert_eq!(order.status, OrderStatus::Cancelled);

        Ok(())
    }

    #[test]
    fn cancel_is_idempotent() -> TestResult {
        let mut order = order(OrderStatus::Cancelled);

        order.cancel()?;

        assert_eq!(order.status, OrderStatus::Cancelled);

        Ok(())
    }

    #[test]
    fn cancel_rejects_shipped_and_delivered() {
        for status in [OrderStatus::Shipped, OrderStatus::Delivered] {
            let mut order = order(status);

            let result = order.cancel();

            assert!(
                matches!(result, Err(OrdersServiceError::InvalidTransition(s)) if s == status),
                "expected InvalidTransition for {status}, got {result:?}"
            );
            assert_eq!(order.status, status, "status must be unchanged");
        }
    }

    #[test]
    fn order_item_copies_cart_line_by_value() -> TestResult {
        let line = CartLineRecord::new(ProductUuid::new(), 3, 7)?;

        let item = OrderItemRecord::from(line);

        assert_eq!(item.product_uuid, line.product_uuid);
        assert_eq!((item.quantity, item.unit_price, item.line_total), (3, 7, 21));

        Ok(())
    }
}
