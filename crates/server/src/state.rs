use std::sync::Arc;

use chrono::Duration;
use sea_orm::DatabaseConnection;

use configs::AppConfig;
use service::account::repo::seaorm::SeaOrmAccountStore;
use service::account::{AccountConfig, AccountService, AccountStore};
use service::catalog::repo::seaorm::SeaOrmCatalogStore;
use service::catalog::{CatalogService, CatalogStore};

/// Session cookie settings.
#[derive(Clone, Debug)]
pub struct SessionSettings {
    pub cookie_name: String,
    pub secure: bool,
}

#[derive(Clone)]
pub struct ServerState {
    pub catalog: Arc<CatalogService<dyn CatalogStore>>,
    pub accounts: Arc<AccountService<dyn AccountStore>>,
    pub session: SessionSettings,
    pub media_base_url: Arc<str>,
}

impl ServerState {
    pub fn new(catalog: Arc<dyn CatalogStore>, accounts: Arc<dyn AccountStore>, cfg: &AppConfig) -> Self {
        let ttl = i64::try_from(cfg.session.ttl_secs.min(configs::MAX_SESSION_TTL_SECS)).unwrap_or(0);
        let account_cfg = AccountConfig {
            session_ttl: Duration::seconds(ttl),
            ..AccountConfig::default()
        };
        Self {
            catalog: Arc::new(CatalogService::new(catalog)),
            accounts: Arc::new(AccountService::new(accounts, account_cfg)),
            session: SessionSettings { cookie_name: cfg.session.cookie_name.clone(), secure: cfg.session.secure },
            media_base_url: Arc::from(cfg.media.base_url.as_str()),
        }
    }

    /// State backed by the SeaORM stores on one shared pool.
    pub fn from_db(db: DatabaseConnection, cfg: &AppConfig) -> Self {
        let catalog: Arc<dyn CatalogStore> = Arc::new(SeaOrmCatalogStore::new(db.clone()));
        let accounts: Arc<dyn AccountStore> = Arc::new(SeaOrmAccountStore::new(db));
        Self::new(catalog, accounts, cfg)
    }
}
