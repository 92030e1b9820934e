//! Address request and response bodies

use salvo::oapi::ToSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use storefront_app::domain::addresses::{data::AddressDetails, records::AddressRecord};

/// Address fields accepted on create and update
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AddressRequest {
    #[serde(default)]
    pub street: String,

    #[serde(default)]
    pub city: String,

    #[serde(default)]
    pub state: String,

    #[serde(default)]
    pub postal_code: String,

    #[serde(default)]
    pub country: String,

    /// Marking an address primary demotes the caller's other addresses
    #[serde(default)]
    pub is_primary: bool,
}

impl From<AddressRequest> for AddressDetails {
    fn from(request: AddressRequest) -> Self {
        AddressDetails {
            street: request.street,
            city: request.city,
            state: request.state,
            postal_code: request.postal_code,
            country: request.country,
            is_primary: request.is_primary,
        }
    }
}

/// Address Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AddressResponse {
    pub id: Uuid,
    pub user: Uuid,
    pub street: String,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub country: String,
    pub is_primary: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl From<AddressRecord> for AddressResponse {
    fn from(address: AddressRecord) -> Self {
        Self {
            id: address.uuid.into_uuid(),
            user: address.user_uuid.into_uuid(),
            street: address.street,
            city: address.city,
            state: address.state,
            postal_code: address.postal_code,
            country: address.country,
            is_primary: address.is_primary,
            created_at: address.created_at.to_string(),
            updated_at: address.updated_at.to_string(),
        }
    }
}
