//! Cart Records

use jiff::Timestamp;
use rustc_hash::FxHashMap;

use crate::{
    domain::{
        carts::errors::CartsServiceError,
        products::records::{ProductRecord, ProductUuid},
        users::UserUuid,
    },
    uuids::TypedUuid,
};

/// Cart UUID
pub type CartUuid = TypedUuid<CartRecord>;

/// Largest quantity a single line can hold (`INTEGER` column).
pub const MAX_QUANTITY: u32 = i32::MAX.unsigned_abs();

/// Largest amount, in minor units, that can be stored (`BIGINT` column).
pub const MAX_AMOUNT: u64 = i64::MAX.unsigned_abs();

/// A user's cart. `total` always equals the sum of the line totals.
#[derive(Debug, Clone, PartialEq)]
pub struct CartRecord {
    /// Cart id.
    pub uuid: CartUuid,

    /// Owner; at most one cart exists per user.
    pub user_uuid: UserUuid,

    /// Lines in insertion order, unique by product.
    pub lines: Vec<CartLineRecord>,

    /// Sum of the line totals, in minor units.
    pub total: u64,

    /// When the cart was first created.
    pub created_at: Timestamp,

    /// When the cart was last written.
    pub updated_at: Timestamp,
}

/// One product in a cart, priced at the time it was added.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CartLineRecord {
    /// Catalog product the line refers to.
    pub product_uuid: ProductUuid,

    /// Between 1 and [`MAX_QUANTITY`].
    pub quantity: u32,

    /// Price per unit in minor units, captured when the line was priced.
    pub unit_price: u64,

    /// Amount charged for the line in minor units.
    pub line_total: u64,
}

/// A cart together with the catalog entries its lines point at.
///
/// Lines whose product has since been deleted have no entry in `products`.
#[derive(Debug, Clone, PartialEq)]
pub struct PopulatedCartRecord {
    /// The raw cart.
    pub cart: CartRecord,

    /// Catalog entries keyed by product.
    pub products: FxHashMap<ProductUuid, ProductRecord>,
}

impl PopulatedCartRecord {
    /// The catalog entry for `product`, if it still exists.
    #[must_use]
    pub fn product(&self, product: ProductUuid) -> Option<&ProductRecord> {
        self.products.get(&product)
    }
}

impl CartLineRecord {
    /// Builds a line, computing its total.
    ///
    /// # Errors
    ///
    /// Fails for a quantity outside `1..=MAX_QUANTITY` or when the total
    /// exceeds [`MAX_AMOUNT`].
    pub fn new(
        product_uuid: ProductUuid,
        quantity: u32,
        unit_price: u64,
    ) -> Result<Self, CartsServiceError> {
        Ok(Self {
            product_uuid,
            quantity,
            unit_price,
            line_total: line_amount(quantity, unit_price)?,
        })
    }

    /// Adds `quantity` more units to this line.
    ///
    /// When `refresh_price` is set the whole line is repriced at
    /// `current_price`; otherwise the added units are charged at the stored
    /// unit price.
    fn merged(
        self,
        quantity: u32,
        current_price: u64,
        refresh_price: bool,
    ) -> Result<Self, CartsServiceError> {
        validate_quantity(quantity)?;

        let merged_quantity = self
            .quantity
            .checked_add(quantity)
            .ok_or(CartsServiceError::InvalidQuantity)?;

        validate_quantity(merged_quantity)?;

        if refresh_price {
            return Self::new(self.product_uuid, merged_quantity, current_price);
        }

        let line_total = self
            .line_total
            .checked_add(line_amount(quantity, self.unit_price)?)
            .filter(|total| *total <= MAX_AMOUNT)
            .ok_or(CartsServiceError::AmountOverflow)?;

        Ok(Self {
            quantity: merged_quantity,
            line_total,
            ..self
        })
    }
}

impl CartRecord {
    /// An empty cart for `user_uuid`.
    #[must_use]
    pub fn new(user_uuid: UserUuid, now: Timestamp) -> Self {
        Self {
            uuid: CartUuid::new(),
            user_uuid,
            lines: Vec::new(),
            total: 0,
            created_at: now,
            updated_at: now,
        }
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// The line for `product`, if any.
    #[must_use]
    pub fn line(&self, product: ProductUuid) -> Option<&CartLineRecord> {
        self.lines.iter().find(|line| line.product_uuid == product)
    }

    /// Adds `quantity` units of a product, merging into an existing line for
    /// the same product.
    ///
    /// # Errors
    ///
    /// Fails for an out-of-range quantity or an amount above [`MAX_AMOUNT`];
    /// the cart is left unchanged.
    pub fn add_line(
        &mut self,
        product: ProductUuid,
        quantity: u32,
        current_price: u64,
        refresh_price: bool,
    ) -> Result<(), CartsServiceError> {
        let line = match self.line(product) {
            Some(existing) => existing.merged(quantity, current_price, refresh_price)?,
            None => CartLineRecord::new(product, quantity, current_price)?,
        };

        self.put_line(line)
    }

    /// Overwrites the quantity of an existing line, repricing it at
    /// `current_price`.
    ///
    /// # Errors
    ///
    /// [`CartsServiceError::LineNotFound`] when the product is not in the
    /// cart, or a quantity/amount error; the cart is left unchanged.
    pub fn set_quantity(
        &mut self,
        product: ProductUuid,
        quantity: u32,
        current_price: u64,
    ) -> Result<(), CartsServiceError> {
        if self.line(product).is_none() {
            return Err(CartsServiceError::LineNotFound);
        }

        self.put_line(CartLineRecord::new(product, quantity, current_price)?)
    }

    /// Removes the line for `product`.
    ///
    /// # Errors
    ///
    /// [`CartsServiceError::LineNotFound`] when the product is not in the cart.
    pub fn remove_line(&mut self, product: ProductUuid) -> Result<CartLineRecord, CartsServiceError> {
        let position = self
            .lines
            .iter()
            .position(|line| line.product_uuid == product)
            .ok_or(CartsServiceError::LineNotFound)?;

        let removed = self.lines.remove(position);

        // Removing a line can only shrink the sum.
        self.total = self.total.saturating_sub(removed.line_total);

        Ok(removed)
    }

    /// Drops every line.
    pub fn clear(&mut self) {
        self.lines.clear();
        self.total = 0;
    }

    fn put_line(&mut self, line: CartLineRecord) -> Result<(), CartsServiceError> {
        let mut lines = self.lines.clone();

        match lines
            .iter_mut()
            .find(|existing| existing.product_uuid == line.product_uuid)
        {
            Some(existing) => *existing = line,
            None => lines.push(line),
        }

        self.total = sum_line_totals(&lines)?;
        self.lines = lines;

        Ok(())
    }
}

/// Checks that `quantity` is in `1..=MAX_QUANTITY`.
///
/// # Errors
///
/// [`CartsServiceError::InvalidQuantity`] otherwise.
pub fn validate_quantity(quantity: u32) -> Result<(), CartsServiceError> {
    if (1..=MAX_QUANTITY).contains(&quantity) {
        Ok(())
    } else {
        Err(CartsServiceError::InvalidQuantity)
    }
}

/// `quantity x unit_price`.
///
/// # Errors
///
/// [`CartsServiceError::InvalidQuantity`] for a quantity outside
/// `1..=MAX_QUANTITY` and [`CartsServiceError::AmountOverflow`] when the
/// product exceeds [`MAX_AMOUNT`].
pub fn line_amount(quantity: u32, unit_price: u64) -> Result<u64, CartsServiceError> {
    validate_quantity(quantity)?;

    unit_price
        .checked_mul(u64::from(quantity))
        .filter(|amount| *amount <= MAX_AMOUNT)
        .ok_or(CartsServiceError::AmountOverflow)
}

/// Sum of the line totals.
///
/// # Errors
///
/// [`CartsServiceError::AmountOverflow`] when the sum exceeds [`MAX_AMOUNT`].
pub fn sum_line_totals(lines: &[CartLineRecord]) -> Result<u64, CartsServiceError> {
    lines.iter().try_fold(0_u64, |total, line| {
        total
            .checked_add(line.line_total)
            .filter(|total| *total <= MAX_AMOUNT)
            .ok_or(CartsServiceError::AmountOverflow)
    })
}
