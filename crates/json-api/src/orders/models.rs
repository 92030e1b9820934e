//! Order request and response bodies

use salvo::{oapi::ToSchema, prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use storefront_app::domain::{
    orders::{
        data::ShippingAddress,
        records::{OrderItemRecord, OrderRecord, OrderUuid, PopulatedOrderRecord},
    },
    products::records::ProductUuid,
};

use crate::{envelope::ApiError, products::models::ProductResponse};

/// Shipping address as sent and returned. `address` is accepted in place of
/// `street`.
#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ShippingAddressBody {
    #[serde(default, alias = "address")]
    pub street: String,

    #[serde(default)]
    pub city: String,

    #[serde(default)]
    pub postal_code: String,

    #[serde(default)]
    pub country: String,
}

impl From<ShippingAddressBody> for ShippingAddress {
    fn from(body: ShippingAddressBody) -> Self {
        ShippingAddress {
            street: body.street,
            city: body.city,
            postal_code: body.postal_code,
            country: body.country,
        }
    }
}

impl From<ShippingAddress> for ShippingAddressBody {
    fn from(address: ShippingAddress) -> Self {
        Self {
            street: address.street,
            city: address.city,
            postal_code: address.postal_code,
            country: address.country,
        }
    }
}

/// Order Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct OrderResponse {
    pub id: Uuid,
    pub user: Uuid,
    pub items: Vec<OrderItemResponse>,
    pub total_amount: u64,
    pub shipping_address: ShippingAddressBody,
    pub payment_method: String,
    pub status: String,
    pub order_date: String,

    /// Set when the order ships
    pub delivery_date: Option<String>,
}

impl From<OrderRecord> for OrderResponse {
    fn from(order: OrderRecord) -> Self {
        Self {
            id: order.uuid.into_uuid(),
            user: order.user_uuid.into_uuid(),
            items: order.items.into_iter().map(Into::into).collect(),
            total_amount: order.total_amount,
            shipping_address: order.shipping_address.into(),
            payment_method: order.payment_method.as_str().to_string(),
            status: order.status.as_str().to_string(),
            order_date: order.ordered_at.to_string(),
            delivery_date: order.delivery_date.map(|at| at.to_string()),
        }
    }
}

impl From<PopulatedOrderRecord> for OrderResponse {
    fn from(populated: PopulatedOrderRecord) -> Self {
        let PopulatedOrderRecord { order, products } = populated;
        let mut response = OrderResponse::from(order);

        for item in &mut response.items {
            item.product = products
                .get(&ProductUuid::from(item.product_id))
                .cloned()
                .map(ProductResponse::from);
        }

        response
    }
}

/// Order Item Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct OrderItemResponse {
    pub product_id: Uuid,
    pub quantity: u32,
    pub price: u64,
    pub total: u64,

    /// Current catalog entry on order reads; `null` after placing, on status
    /// changes, or once the product has been deleted
    #[serde(default)]
    pub product: Option<ProductResponse>,
}

impl From<OrderItemRecord> for OrderItemResponse {
    fn from(item: OrderItemRecord) -> Self {
        Self {
            product_id: item.product_uuid.into_uuid(),
            quantity: item.quantity,
            price: item.unit_price,
            total: item.line_total,
            product: None,
        }
    }
}

/// `{success, message, order}`
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct OrderEnvelope {
    pub success: bool,
    pub message: String,
    pub order: OrderResponse,
}

impl OrderEnvelope {
    pub(crate) fn new(message: &str, order: impl Into<OrderResponse>) -> Json<Self> {
        Json(Self {
            success: true,
            message: message.to_string(),
            order: order.into(),
        })
    }
}

/// `{success, message, orders}`
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct OrdersEnvelope {
    pub success: bool,
    pub message: String,
    pub orders: Vec<OrderResponse>,
}

impl OrdersEnvelope {
    pub(crate) fn new(message: &str, orders: Vec<PopulatedOrderRecord>) -> Json<Self> {
        Json(Self {
            success: true,
            message: message.to_string(),
            orders: orders.into_iter().map(Into::into).collect(),
        })
    }
}

/// Parses an `orderId` body field, treating blank as missing.
pub(crate) fn parse_order_id(
    order_id: Option<&str>,
    missing: &'static str,
) -> Result<OrderUuid, ApiError> {
    let order_id = order_id
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .ok_or_else(|| ApiError::bad_request(missing))?;

    order_id
        .parse::<OrderUuid>()
        .map_err(|_ignored| ApiError::bad_request("Invalid order ID."))
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use testresult::TestResult;

    use super::*;

    #[test]
    fn address_alias_fills_street() -> TestResult {
        let body: ShippingAddressBody = serde_json::from_value(json!({
            "address": "1 High Street",
            "city": "Leeds",
            "postalCode": "LS1 1AA",
            "country": "UK"
        }))?;

        assert_eq!(body.street, "1 High Street");
        assert_eq!(body.postal_code, "LS1 1AA");

        Ok(())
    }

    #[test]
    fn parse_order_id_rejects_blank_and_garbage() {
        let blank = parse_order_id(Some("  "), "Order ID is required.");
        let garbage = parse_order_id(Some("not-a-uuid"), "Order ID is required.");

        assert!(
            matches!(&blank, Err(error) if error.message() == "Order ID is required."),
            "expected missing id, got {blank:?}"
        );
        assert!(
            matches!(&garbage, Err(error) if error.message() == "Invalid order ID."),
            "expected invalid id, got {garbage:?}"
        );
    }
}
