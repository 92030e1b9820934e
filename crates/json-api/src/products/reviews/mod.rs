//! Product Reviews

use salvo::oapi::ToSchema;
use serde::{Deserialize, Serialize};

pub(crate) mod handlers;

/// Rating and comment supplied when adding or editing a review
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct ReviewRequest {
    /// Whole number from 1 to 5
    pub rating: u8,

    #[serde(default)]
    pub comment: String,
}
