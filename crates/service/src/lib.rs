//! Service layer providing the catalog queries and account workflows on top of models.
//! - Separates business logic from data access through repository traits.
//! - Ships a SeaORM implementation and an in-memory mock for each repository.
//! - Provides clear error types and documented interfaces.

pub mod errors;
pub mod catalog;
pub mod account;
pub mod seed;
#[cfg(test)]
pub mod test_support;
