//! Cart response bodies

use salvo::{oapi::ToSchema, prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use storefront_app::domain::{
    carts::{
        data::CartItem,
        records::{CartLineRecord, CartRecord, PopulatedCartRecord},
    },
    products::records::ProductUuid,
};

use crate::products::models::ProductResponse;

/// Product and quantity for adding to or updating a cart
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CartItemRequest {
    pub product_id: Uuid,

    /// Between 1 and 2147483647
    pub quantity: u32,
}

impl From<CartItemRequest> for CartItem {
    fn from(request: CartItemRequest) -> Self {
        CartItem {
            product_uuid: request.product_id.into(),
            quantity: request.quantity,
        }
    }
}

/// `{success, message, cart}`
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CartEnvelope {
    pub success: bool,
    pub message: String,
    pub cart: CartResponse,
}

impl CartEnvelope {
    pub(crate) fn new(message: &str, cart: impl Into<CartResponse>) -> Json<Self> {
        Json(Self {
            success: true,
            message: message.to_string(),
            cart: cart.into(),
        })
    }
}

/// Cart Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CartResponse {
    pub id: Uuid,
    pub user: Uuid,
    pub items: Vec<CartItemResponse>,

    /// Sum of the line totals, in minor currency units
    pub total_amount: u64,

    pub updated_at: String,
}

impl From<CartRecord> for CartResponse {
    fn from(cart: CartRecord) -> Self {
        Self {
            id: cart.uuid.into_uuid(),
            user: cart.user_uuid.into_uuid(),
            items: cart.lines.into_iter().map(CartItemResponse::from).collect(),
            total_amount: cart.total,
            updated_at: cart.updated_at.to_string(),
        }
    }
}

impl From<PopulatedCartRecord> for CartResponse {
    fn from(populated: PopulatedCartRecord) -> Self {
        let PopulatedCartRecord { cart, mut products } = populated;
        let mut response = CartResponse::from(cart);

        for item in &mut response.items {
            item.product = products
                .remove(&ProductUuid::from(item.product_id))
                .map(ProductResponse::from);
        }

        response
    }
}

/// Cart Item Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CartItemResponse {
    pub product_id: Uuid,
    pub quantity: u32,

    /// Unit price captured when the line was added
    pub price: u64,

    /// `quantity * price`
    pub total: u64,

    /// Current catalog entry; absent outside `GET /cart` or once the product
    /// has been deleted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product: Option<ProductResponse>,
}

impl From<CartLineRecord> for CartItemResponse {
    fn from(line: CartLineRecord) -> Self {
        Self {
            product_id: line.product_uuid.into_uuid(),
            quantity: line.quantity,
            price: line.unit_price,
            total: line.line_total,
            product: None,
        }
    }
}
