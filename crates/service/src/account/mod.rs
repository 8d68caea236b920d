//! Account module: registration, session login/logout and profile maintenance.

pub mod domain;
pub mod errors;
pub mod repository;
pub mod service;
pub mod repo;

pub use errors::AccountError;
pub use repository::AccountStore;
pub use service::{AccountConfig, AccountService};
