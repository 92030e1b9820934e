//! Users

pub mod records;

pub use records::{Role, UserRecord, UserUuid};
