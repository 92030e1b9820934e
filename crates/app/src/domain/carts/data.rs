//! Cart Data

use crate::domain::products::records::ProductUuid;

/// Units of a product to put in the cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CartItem {
    /// Catalog product to add or update.
    pub product_uuid: ProductUuid,

    /// Units to add, or the new line quantity on update.
    pub quantity: u32,
}
