use std::net::SocketAddr;

use axum::http::{header, HeaderValue, Method};
use axum::Router;
use common::utils::logging::init_logging_from_env;
use configs::AppConfig;
use dotenvy::dotenv;
use migration::MigratorTrait;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing::{info, warn};

use crate::errors::StartupError;
use crate::routes;
use crate::state::ServerState;

/// Initialize logging via shared common utils
fn init_logging() {
    init_logging_from_env();
}

/// Credentialed CORS for the configured origins only. With none configured,
/// no cross-origin headers are sent.
pub fn build_cors(origins: &[String]) -> Result<CorsLayer, StartupError> {
    if origins.is_empty() {
        return Ok(CorsLayer::new());
    }
    let allowed = origins
        .iter()
        .map(|o| HeaderValue::from_str(o).map_err(|e| StartupError::InvalidConfig(format!("cors origin {o:?}: {e}"))))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed))
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::PATCH])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .allow_credentials(true))
}

/// Config file first, then environment variables.
pub fn load_config() -> Result<AppConfig, StartupError> {
    AppConfig::load_or_env().map_err(|e| StartupError::InvalidConfig(e.to_string()))
}

fn bind_addr(cfg: &AppConfig) -> Result<SocketAddr, StartupError> {
    format!("{}:{}", cfg.server.host, cfg.server.port)
        .parse()
        .map_err(|e| StartupError::InvalidConfig(format!("server address: {e}")))
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("shutdown signal received");
    }
}

/// Public entry: build the app and run the HTTP server
pub async fn run() -> anyhow::Result<()> {
    dotenv().ok();
    init_logging();

    let cfg = load_config()?;
    let addr = bind_addr(&cfg)?;

    // DB connection
    let db = models::db::connect_with_config(&cfg.database)
        .await
        .map_err(|e| StartupError::Database(e.to_string()))?;
    if cfg.database.run_migrations {
        migration::Migrator::up(&db, None).await?;
        info!("migrations applied");
    }

    let state = ServerState::from_db(db, &cfg);
    if let Err(e) = state.accounts.sweep_expired_sessions().await {
        warn!(error = %e, "expired session sweep failed");
    }
    let app: Router = routes::build_router(state, build_cors(&cfg.server.cors_allowed_origins)?);

    info!(%addr, media = %cfg.media.base_url, "starting server");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bind_addr_from_config() {
        let mut cfg = AppConfig::default();
        cfg.server.host = "0.0.0.0".into();
        cfg.server.port = 8000;
        assert_eq!(bind_addr(&cfg).unwrap().port(), 8000);
        cfg.server.host = "not a host".into();
        assert!(bind_addr(&cfg).is_err());
    }

    async fn preflight_origin(cors: CorsLayer, origin: &str) -> Option<String> {
        use axum::body::Body;
        use axum::http::Request;
        use tower::ServiceExt;

        let app = Router::new().route("/api/productos/", axum::routing::get(|| async { "ok" })).layer(cors);
        let req = Request::builder()
            .method(Method::OPTIONS)
            .uri("/api/productos/")
            .header(header::ORIGIN, origin)
            .header(header::ACCESS_CONTROL_REQUEST_METHOD, "GET")
            .body(Body::empty())
            .unwrap();
        let resp = app.oneshot(req).await.unwrap();
        resp.headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    }

    #[tokio::test]
    async fn cors_allows_only_configured_origins() {
        let cors = build_cors(&["http://localhost:5173".to_string()]).unwrap();
        assert_eq!(
            preflight_origin(cors.clone(), "http://localhost:5173").await.as_deref(),
            Some("http://localhost:5173")
        );
        assert_eq!(preflight_origin(cors, "https://evil.example").await, None);
    }

    #[tokio::test]
    async fn no_configured_origins_means_no_cors_headers() {
        let cors = build_cors(&[]).unwrap();
        assert_eq!(preflight_origin(cors, "https://evil.example").await, None);
    }
}
