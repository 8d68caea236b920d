//! Catalog module: read-only queries over categories, products and banners.

pub mod domain;
pub mod repository;
pub mod service;
pub mod repo;

pub use repository::CatalogStore;
pub use service::CatalogService;
