pub mod account;
pub mod catalog;

use axum::{
    middleware,
    routing::{get, post},
    Json, Router,
};
use tower_http::{
    cors::CorsLayer,
    trace::{TraceLayer, DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, DefaultOnFailure},
};
use tracing::Level;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use common::types::Health;

use crate::openapi::ApiDoc;
use crate::session;
use crate::state::ServerState;

#[utoipa::path(get, path = "/health", tag = "health", responses((status = 200, description = "Service is up")))]
pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

/// Build the full application router: catalog, account and docs routes
pub fn build_router(state: ServerState, cors: CorsLayer) -> Router {
    // Public routes
    let public = Router::new()
        .route("/health", get(health))
        .route("/api/productos/", get(catalog::list_products))
        .route("/api/productos/categorias/", get(catalog::list_categories))
        .route("/api/productos/destacados/", get(catalog::list_featured))
        .route("/api/productos/banners/", get(catalog::list_banners))
        .route("/api/productos/:id/", get(catalog::get_product))
        .route("/api/usuarios/registro/", post(account::register))
        .route("/api/usuarios/login/", post(account::login));

    // Session-bound routes
    let protected = Router::new()
        .route("/api/usuarios/logout/", post(account::logout))
        .route(
            "/api/usuarios/perfil/",
            get(account::get_profile).put(account::update_profile).patch(account::update_profile),
        )
        .route_layer(middleware::from_fn_with_state(state.clone(), session::require_session));

    // Compose
    public
        .merge(protected)
        .with_state(state)
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(
                    DefaultMakeSpan::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                .on_request(
                    DefaultOnRequest::new()
                        .level(Level::INFO),
                )
                .on_response(
                    DefaultOnResponse::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                // 5xx responses are logged at ERROR
                .on_failure(
                    DefaultOnFailure::new()
                        .level(Level::ERROR),
                )
        )
}
