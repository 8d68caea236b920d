use anyhow::Context;
use dotenvy::dotenv;
use migration::MigratorTrait;
use tracing::info;

/// Apply migrations and load the sample catalog. Safe to run repeatedly.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    common::utils::logging::init_logging_from_env();

    let cfg = configs::AppConfig::load_or_env().context("loading configuration")?;
    let db = models::db::connect_with_config(&cfg.database).await?;
    migration::Migrator::up(&db, None).await.context("applying migrations")?;

    let report = service::seed::load_sample_data(&db).await?;
    info!(
        categories_created = report.categories_created,
        products_created = report.products_created,
        banners_created = report.banners_created,
        "sample data loaded"
    );
    Ok(())
}
