//! Migrator registering entity-specific migrations in dependency order.
//! Indexes are applied last.
pub use sea_orm_migration::prelude::*;

mod m20240601_000001_create_category;
mod m20240601_000002_create_product;
mod m20240601_000003_create_banner;
mod m20240601_000004_create_user;
mod m20240601_000005_create_user_credentials;
mod m20240601_000006_create_profile;
mod m20240601_000007_create_session;
mod m20240601_000008_add_indexes;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240601_000001_create_category::Migration),
            Box::new(m20240601_000002_create_product::Migration),
            Box::new(m20240601_000003_create_banner::Migration),
            Box::new(m20240601_000004_create_user::Migration),
            Box::new(m20240601_000005_create_user_credentials::Migration),
            Box::new(m20240601_000006_create_profile::Migration),
            Box::new(m20240601_000007_create_session::Migration),
            // Indexes should always be applied last
            Box::new(m20240601_000008_add_indexes::Migration),
        ]
    }
}
