//! Orders service.

use std::{fmt, sync::Arc};

use async_trait::async_trait;
use jiff::Timestamp;
use mockall::automock;
use rustc_hash::FxHashMap;
use tracing::debug;

use crate::{
    database::Db,
    domain::{
        carts::records::MAX_AMOUNT,
        orders::{
            data::NewOrder,
            errors::OrdersServiceError,
            records::{OrderRecord, OrderUuid, PopulatedOrderRecord},
            repository::{OrdersRepository, PgOrdersRepository},
            status::OrderStatus,
        },
        products::{ProductsService, records::ProductUuid},
        users::UserUuid,
    },
};

/// Order listing behaviour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrdersSettings {
    /// Report a user with no orders as [`OrdersServiceError::NoOrders`]
    /// instead of returning an empty list.
    pub empty_list_is_not_found: bool,
}

impl Default for OrdersSettings {
    fn default() -> Self {
        Self {
            empty_list_is_not_found: true,
        }
    }
}

#[derive(Clone)]
pub struct PgOrdersService {
    repository: Arc<dyn OrdersRepository>,
    products: Arc<dyn ProductsService>,
    settings: OrdersSettings,
}

impl PgOrdersService {
    #[must_use]
    pub fn new(db: Db, products: Arc<dyn ProductsService>, settings: OrdersSettings) -> Self {
        Self {
            repository: Arc::new(PgOrdersRepository::new(db)),
            products,
            settings,
        }
    }

    #[cfg(test)]
    pub(crate) fn with_repository(
        repository: impl OrdersRepository + 'static,
        products: impl ProductsService + 'static,
        settings: OrdersSettings,
    ) -> Self {
        Self {
            repository: Arc::new(repository),
            products: Arc::new(products),
            settings,
        }
    }

    /// Resolves the products referenced by `orders` with one catalog lookup.
    async fn populate(
        &self,
        orders: Vec<OrderRecord>,
    ) -> Result<Vec<PopulatedOrderRecord>, OrdersServiceError> {
        let mut uuids: Vec<ProductUuid> = orders
            .iter()
            .flat_map(|order| order.items.iter().map(|item| item.product_uuid))
            .collect();

        uuids.sort_unstable();
        uuids.dedup();

        let catalog: FxHashMap<_, _> = if uuids.is_empty() {
            FxHashMap::default()
        } else {
            self.products
                .find_products(uuids)
                .await
                .map_err(OrdersServiceError::Catalog)?
                .into_iter()
                .map(|product| (product.uuid, product))
                .collect()
        };

        Ok(orders
            .into_iter()
            .map(|order| {
                let products = order
                    .items
                    .iter()
                    .filter_map(|item| catalog.get(&item.product_uuid))
                    .map(|product| (product.uuid, product.clone()))
                    .collect();

                PopulatedOrderRecord { order, products }
            })
            .collect())
    }

    async fn load(
        &self,
        user: UserUuid,
        order: OrderUuid,
    ) -> Result<OrderRecord, OrdersServiceError> {
        self.repository
            .find_order(user, order)
            .await?
            .ok_or(OrdersServiceError::NotFound)
    }

    async fn store_status(&self, order: &OrderRecord) -> Result<(), OrdersServiceError> {
        if self.repository.update_status(order).await? == 0 {
            return Err(OrdersServiceError::NotFound);
        }

        Ok(())
    }
}

impl fmt::Debug for PgOrdersService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PgOrdersService")
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl OrdersService for PgOrdersService {
    async fn create_order(
        &self,
        user: UserUuid,
        order: NewOrder,
    ) -> Result<OrderRecord, OrdersServiceError> {
        if order.items.is_empty() {
            return Err(OrdersServiceError::NoItems);
        }

        let shipping_address = order.shipping_address.normalized()?;

        let total_amount = order.items.iter().try_fold(0_u64, |total, item| {
            total
                .checked_add(item.line_total)
                .filter(|total| *total <= MAX_AMOUNT)
                .ok_or(OrdersServiceError::AmountOverflow)
        })?;

        let record = OrderRecord {
            uuid: OrderUuid::new(),
            user_uuid: user,
            items: order.items,
            total_amount,
            shipping_address,
            payment_method: order.payment_method,
            status: OrderStatus::Pending,
            ordered_at: Timestamp::now(),
            delivery_date: None,
        };

        self.repository.insert_order(&record).await?;

        debug!(order = %record.uuid, total_amount, "created order");

        Ok(record)
    }

    async fn get_order(
        &self,
        user: UserUuid,
        order: OrderUuid,
    ) -> Result<PopulatedOrderRecord, OrdersServiceError> {
        let order = self.load(user, order).await?;

        self.populate(vec![order])
            .await?
            .pop()
            .ok_or(OrdersServiceError::NotFound)
    }

    async fn list_orders(
        &self,
        user: UserUuid,
    ) -> Result<Vec<PopulatedOrderRecord>, OrdersServiceError> {
        let orders = self.repository.list_orders(user).await?;

        if orders.is_empty() && self.settings.empty_list_is_not_found {
            return Err(OrdersServiceError::NoOrders);
        }

        self.populate(orders).await
    }

    async fn update_status(
        &self,
        user: UserUuid,
        order: OrderUuid,
        status: OrderStatus,
    ) -> Result<OrderRecord, OrdersServiceError> {
        let mut record = self.load(user, order).await?;

        record.transition(status, Timestamp::now());

        self.store_status(&record).await?;

        Ok(record)
    }

    async fn cancel_order(
        &self,
        user: UserUuid,
        order: OrderUuid,
    ) -> Result<OrderRecord, OrdersServiceError> {
        let mut record = self.load(user, order).await?;

        record.cancel()?;

        self.store_status(&record).await?;

        Ok(record)
    }
}

#[automock]
#[async_trait]
pub trait OrdersService: Send + Sync {
    /// Persists a new pending order built from `order`.
    async fn create_order(
        &self,
        user: UserUuid,
        order: NewOrder,
    ) -> Result<OrderRecord, OrdersServiceError>;

    /// One of the user's orders, with its products resolved.
    async fn get_order(
        &self,
        user: UserUuid,
        order: OrderUuid,
    ) -> Result<PopulatedOrderRecord, OrdersServiceError>;

    /// The user's orders, most recent first, with their products resolved.
    async fn list_orders(
        &self,
        user: UserUuid,
    ) -> Result<Vec<PopulatedOrderRecord>, OrdersServiceError>;

    /// Sets the order status unconditionally.
    async fn update_status(
        &self,
        user: UserUuid,
        order: OrderUuid,
        status: OrderStatus,
    ) -> Result<OrderRecord, OrdersServiceError>;

    /// Cancels an order that has not shipped yet.
    async fn cancel_order(
        &self,
        user: UserUuid,
        order: OrderUuid,
    ) -> Result<OrderRecord, OrdersServiceError>;
}
