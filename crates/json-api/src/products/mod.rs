//! Products

mod errors;
pub(crate) mod handlers;
pub(crate) mod models;
pub(crate) mod reviews;

pub(crate) use handlers::*;
