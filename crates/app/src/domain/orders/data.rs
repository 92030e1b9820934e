//! Order Data

use crate::domain::orders::{
    errors::OrdersServiceError, records::OrderItemRecord, status::PaymentMethod,
};

/// Where an order ships to. Every field is required.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShippingAddress {
    /// Street line, also accepted as `address` on the wire.
    pub street: String,
    /// City or town.
    pub city: String,
    /// Postal or ZIP code.
    pub postal_code: String,
    /// Country name.
    pub country: String,
}

impl ShippingAddress {
    /// Trims every field, rejecting blanks.
    ///
    /// # Errors
    ///
    /// [`OrdersServiceError::MissingAddressField`] naming the first blank field.
    pub fn normalized(mut self) -> Result<Self, OrdersServiceError> {
        for (field, name) in [
            (&mut self.street, "street"),
            (&mut self.city, "city"),
            (&mut self.postal_code, "postalCode"),
            (&mut self.country, "country"),
        ] {
            let trimmed = field.trim();

            if trimmed.is_empty() {
                return Err(OrdersServiceError::MissingAddressField(name));
            }

            *field = trimmed.to_string();
        }

        Ok(self)
    }
}

/// New Order Data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrder {
    /// Must not be empty.
    pub items: Vec<OrderItemRecord>,
    /// Where the order ships.
    pub shipping_address: ShippingAddress,
    /// How the order is paid.
    pub payment_method: PaymentMethod,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalized_trims_fields() {
        let address = ShippingAddress {
            street: " 1 High Street ".to_string(),
            city: "Leeds".to_string(),
            postal_code: "LS1 1AA ".to_string(),
            country: "UK".to_string(),
        }
        .normalized();

        assert_eq!(
            address.ok(),
            Some(ShippingAddress {
                street: "1 High Street".to_string(),
                city: "Leeds".to_string(),
                postal_code: "LS1 1AA".to_string(),
                country: "UK".to_string(),
            })
        );
    }

    #[test]
    fn normalized_names_blank_field() {
        let result = ShippingAddress {
            street: "1 High Street".to_string(),
            city: "Leeds".to_string(),
            postal_code: String::new(),
            country: "UK".to_string(),
        }
        .normalized();

        assert!(
            matches!(result, Err(OrdersServiceError::MissingAddressField("postalCode"))),
            "expected missing postalCode, got {result:?}"
        );
    }
}
