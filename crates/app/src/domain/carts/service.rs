//! Carts service.

use std::{fmt, sync::Arc};

use async_trait::async_trait;
use jiff::Timestamp;
use mockall::automock;
use rustc_hash::FxHashMap;
use tracing::debug;

use crate::{
    database::Db,
    domain::{
        carts::{
            data::CartItem,
            errors::CartsServiceError,
            records::{CartRecord, PopulatedCartRecord, validate_quantity},
            repository::{CartsRepository, PgCartsRepository},
        },
        products::{ProductsService, records::ProductUuid},
        users::UserUuid,
    },
};

/// Cart pricing behaviour.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CartsSettings {
    /// Reprice an existing line at the current catalog price when more units
    /// of the same product are added.
    pub refresh_price_on_merge: bool,
}

#[derive(Clone)]
pub struct PgCartsService {
    repository: Arc<dyn CartsRepository>,
    products: Arc<dyn ProductsService>,
    settings: CartsSettings,
}

impl PgCartsService {
    #[must_use]
    pub fn new(db: Db, products: Arc<dyn ProductsService>, settings: CartsSettings) -> Self {
        Self {
            repository: Arc::new(PgCartsRepository::new(db)),
            products,
            settings,
        }
    }

    #[cfg(test)]
    pub(crate) fn with_repository(
        repository: impl CartsRepository + 'static,
        products: impl ProductsService + 'static,
        settings: CartsSettings,
    ) -> Self {
        Self {
            repository: Arc::new(repository),
            products: Arc::new(products),
            settings,
        }
    }

    async fn load(&self, user: UserUuid) -> Result<CartRecord, CartsServiceError> {
        self.repository
            .find_cart(user)
            .await?
            .ok_or(CartsServiceError::NotFound)
    }

    async fn current_price(&self, product: ProductUuid) -> Result<u64, CartsServiceError> {
        Ok(self.products.get_product(product).await?.price)
    }

    async fn save(&self, mut cart: CartRecord) -> Result<CartRecord, CartsServiceError> {
        cart.updated_at = Timestamp::now();

        Ok(self.repository.save_cart(&cart).await?)
    }
}

impl fmt::Debug for PgCartsService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PgCartsService")
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl CartsService for PgCartsService {
    async fn add_item(
        &self,
        user: UserUuid,
        item: CartItem,
    ) -> Result<CartRecord, CartsServiceError> {
        validate_quantity(item.quantity)?;

        let price = self.current_price(item.product_uuid).await?;

        let mut cart = self
            .repository
            .find_cart(user)
            .await?
            .unwrap_or_else(|| CartRecord::new(user, Timestamp::now()));

        cart.add_line(
            item.product_uuid,
            item.quantity,
            price,
            self.settings.refresh_price_on_merge,
        )?;

        debug!(cart = %cart.uuid, product = %item.product_uuid, total = cart.total, "added cart item");

        self.save(cart).await
    }

    async fn remove_item(
        &self,
        user: UserUuid,
        product: ProductUuid,
    ) -> Result<CartRecord, CartsServiceError> {
        let mut cart = self.load(user).await?;

        cart.remove_line(product)?;

        self.save(cart).await
    }

    async fn update_item(
        &self,
        user: UserUuid,
        item: CartItem,
    ) -> Result<CartRecord, CartsServiceError> {
        validate_quantity(item.quantity)?;

        let mut cart = self.load(user).await?;

        if cart.line(item.product_uuid).is_none() {
            return Err(CartsServiceError::LineNotFound);
        }

        let price = self.current_price(item.product_uuid).await?;

        cart.set_quantity(item.product_uuid, item.quantity, price)?;

        self.save(cart).await
    }

    async fn get_cart(&self, user: UserUuid) -> Result<PopulatedCartRecord, CartsServiceError> {
        let cart = self.load(user).await?;

        let uuids = cart.lines.iter().map(|line| line.product_uuid).collect();

        let products: FxHashMap<_, _> = self
            .products
            .find_products(uuids)
            .await
            .map_err(CartsServiceError::Catalog)?
            .into_iter()
            .map(|product| (product.uuid, product))
            .collect();

        Ok(PopulatedCartRecord { cart, products })
    }

    async fn current_cart(&self, user: UserUuid) -> Result<CartRecord, CartsServiceError> {
        self.load(user).await
    }

    async fn clear_cart(&self, user: UserUuid) -> Result<CartRecord, CartsServiceError> {
        let mut cart = self.load(user).await?;

        cart.clear();

        self.save(cart).await
    }
}

#[automock]
#[async_trait]
pub trait CartsService: Send + Sync {
    /// Adds units of a product at its current price, creating the cart on
    /// first use.
    async fn add_item(&self, user: UserUuid, item: CartItem)
    -> Result<CartRecord, CartsServiceError>;

    /// Removes a product's line from the cart.
    async fn remove_item(
        &self,
        user: UserUuid,
        product: ProductUuid,
    ) -> Result<CartRecord, CartsServiceError>;

    /// Sets the quantity of an existing line, repricing it.
    async fn update_item(
        &self,
        user: UserUuid,
        item: CartItem,
    ) -> Result<CartRecord, CartsServiceError>;

    /// The cart with its lines resolved to catalog entries.
    async fn get_cart(&self, user: UserUuid) -> Result<PopulatedCartRecord, CartsServiceError>;

    /// The cart as stored.
    async fn current_cart(&self, user: UserUuid) -> Result<CartRecord, CartsServiceError>;

    /// Empties the cart, keeping the cart itself.
    async fn clear_cart(&self, user: UserUuid) -> Result<CartRecord, CartsServiceError>;
}
