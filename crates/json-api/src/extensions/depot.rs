//! Depot helper extensions.

use std::any::Any;

use salvo::prelude::Depot;
use storefront_app::auth::Identity;

use crate::envelope::ApiError;

/// Helpers for mapping depot extraction failures to HTTP errors.
pub(crate) trait DepotExt {
    fn obtain_or_500<T: Any + Send + Sync>(&self) -> Result<&T, ApiError>;

    fn insert_identity(&mut self, identity: Identity);

    /// The caller resolved by the auth middleware.
    fn identity_or_401(&self) -> Result<Identity, ApiError>;
}

impl DepotExt for Depot {
    fn obtain_or_500<T: Any + Send + Sync>(&self) -> Result<&T, ApiError> {
        self.obtain::<T>()
            .map_err(|_ignored| ApiError::internal("Internal server error.", &"missing state"))
    }

    fn insert_identity(&mut self, identity: Identity) {
        self.inject(identity);
    }

    fn identity_or_401(&self) -> Result<Identity, ApiError> {
        self.obtain::<Identity>()
            .copied()
            .map_err(|_ignored| ApiError::unauthorized("Not authorized, no token."))
    }
}
