//! Authentication

mod errors;
mod models;
pub mod password;
mod repository;
mod service;
mod token;

pub use errors::*;
pub use models::*;
pub use password::{Password, PasswordHashing};
pub use service::*;
pub use token::*;
