use migration::MigratorTrait;
use sea_orm::DatabaseConnection;

/// CRUD operations tests for the catalog and account models
pub mod crud_tests;

/// Connect and migrate, or `None` when no database is configured for tests.
pub(crate) async fn setup_test_db() -> anyhow::Result<Option<DatabaseConnection>> {
    let _ = dotenvy::dotenv();
    let url = match std::env::var("DATABASE_URL") {
        Ok(url) if std::env::var("SKIP_DB_TESTS").is_err() => url,
        _ => {
            eprintln!("skip: DATABASE_URL not set (or SKIP_DB_TESTS set)");
            return Ok(None);
        }
    };
    let cfg = crate::db::DatabaseConfig { url, min_connections: 1, ..Default::default() };
    let db = crate::db::connect_with_config(&cfg).await?;
    migration::Migrator::up(&db, None).await?;
    Ok(Some(db))
}
