//! Address Records

use jiff::Timestamp;

use crate::{domain::users::UserUuid, uuids::TypedUuid};

/// Address UUID
pub type AddressUuid = TypedUuid<AddressRecord>;

/// Address Record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressRecord {
    pub uuid: AddressUuid,
    pub user_uuid: UserUuid,
    pub street: String,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub country: String,
    pub is_primary: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
