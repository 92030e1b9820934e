//! Addresses service.

use std::{fmt, sync::Arc};

use async_trait::async_trait;
use jiff::Timestamp;
use mockall::automock;

use crate::{
    database::Db,
    domain::{
        addresses::{
            data::AddressDetails,
            errors::AddressesServiceError,
            records::{AddressRecord, AddressUuid},
            repository::{AddressesRepository, PgAddressesRepository},
        },
        users::UserUuid,
    },
};

#[derive(Clone)]
pub struct PgAddressesService {
    repository: Arc<dyn AddressesRepository>,
}

impl PgAddressesService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            repository: Arc::new(PgAddressesRepository::new(db)),
        }
    }

    #[cfg(test)]
    pub(crate) fn with_repository(repository: impl AddressesRepository + 'static) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }
}

impl fmt::Debug for PgAddressesService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PgAddressesService").finish_non_exhaustive()
    }
}

#[async_trait]
impl AddressesService for PgAddressesService {
    async fn list_addresses(
        &self,
        user: UserUuid,
    ) -> Result<Vec<AddressRecord>, AddressesServiceError> {
        Ok(self.repository.list_addresses(user).await?)
    }

    async fn add_address(
        &self,
        user: UserUuid,
        details: AddressDetails,
    ) -> Result<AddressRecord, AddressesServiceError> {
        let details = details.normalized()?;
        let now = Timestamp::now();

        let address = AddressRecord {
            uuid: AddressUuid::new(),
            user_uuid: user,
            street: details.street,
            city: details.city,
            state: details.state,
            postal_code: details.postal_code,
            country: details.country,
            is_primary: details.is_primary,
            created_at: now,
            updated_at: now,
        };

        self.repository.insert_address(&address).await?;

        Ok(address)
    }

    async fn update_address(
        &self,
        user: UserUuid,
        address: AddressUuid,
        details: AddressDetails,
    ) -> Result<AddressRecord, AddressesServiceError> {
        let details = details.normalized()?;

        let existing = self
            .repository
            .find_address(user, address)
            .await?
            .ok_or(AddressesServiceError::NotFound)?;

        let updated = AddressRecord {
            street: details.street,
            city: details.city,
            state: details.state,
            postal_code: details.postal_code,
            country: details.country,
            is_primary: details.is_primary,
            updated_at: Timestamp::now(),
            ..existing
        };

        if self.repository.update_address(&updated).await? == 0 {
            return Err(AddressesServiceError::NotFound);
        }

        Ok(updated)
    }

    async fn delete_address(
        &self,
        user: UserUuid,
        address: AddressUuid,
    ) -> Result<(), AddressesServiceError> {
        if self.repository.delete_address(user, address).await? == 0 {
            return Err(AddressesServiceError::NotFound);
        }

        Ok(())
    }
}

#[automock]
#[async_trait]
pub trait AddressesService: Send + Sync {
    /// The user's addresses, primary first.
    async fn list_addresses(
        &self,
        user: UserUuid,
    ) -> Result<Vec<AddressRecord>, AddressesServiceError>;

    /// Saves a new address. Marking it primary demotes the others.
    async fn add_address(
        &self,
        user: UserUuid,
        details: AddressDetails,
    ) -> Result<AddressRecord, AddressesServiceError>;

    /// Replaces an address's fields. Marking it primary demotes the others.
    async fn update_address(
        &self,
        user: UserUuid,
        address: AddressUuid,
        details: AddressDetails,
    ) -> Result<AddressRecord, AddressesServiceError>;

    async fn delete_address(
        &self,
        user: UserUuid,
        address: AddressUuid,
    ) -> Result<(), AddressesServiceError>;
}
