use axum::{
    extract::{Path, Query, State},
    Json,
};
use tracing::info;

use service::catalog::domain::ProductFilter;

use crate::errors::JsonApiError;
use crate::state::ServerState;
use crate::wire::{self, BannerWire, CategoryWire, ProductQuery, ProductWire};

#[utoipa::path(
    get, path = "/api/productos/categorias/", tag = "catalog",
    responses((status = 200, description = "All categories", body = [CategoryWire]))
)]
pub async fn list_categories(State(state): State<ServerState>) -> Result<Json<Vec<CategoryWire>>, JsonApiError> {
    let categories = state.catalog.list_categories().await?;
    Ok(Json(categories.iter().map(wire::category_to_wire).collect()))
}

#[utoipa::path(
    get, path = "/api/productos/", tag = "catalog",
    params(ProductQuery),
    responses((status = 200, description = "Matching products", body = [ProductWire]))
)]
pub async fn list_products(
    State(state): State<ServerState>,
    Query(query): Query<ProductQuery>,
) -> Result<Json<Vec<ProductWire>>, JsonApiError> {
    let products = state.catalog.list_products(ProductFilter::from(query)).await?;
    info!(count = products.len(), "list products");
    Ok(Json(products.iter().map(|p| wire::product_to_wire(p, &state.media_base_url)).collect()))
}

#[utoipa::path(
    get, path = "/api/productos/destacados/", tag = "catalog",
    responses((status = 200, description = "Up to eight featured products", body = [ProductWire]))
)]
pub async fn list_featured(State(state): State<ServerState>) -> Result<Json<Vec<ProductWire>>, JsonApiError> {
    let products = state.catalog.list_featured().await?;
    Ok(Json(products.iter().map(|p| wire::product_to_wire(p, &state.media_base_url)).collect()))
}

#[utoipa::path(
    get, path = "/api/productos/{id}/", tag = "catalog",
    params(("id" = i32, Path, description = "Product id")),
    responses(
        (status = 200, description = "Product", body = ProductWire),
        (status = 404, description = "Not Found", body = wire::ErrorBody)
    )
)]
pub async fn get_product(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<Json<ProductWire>, JsonApiError> {
    // Non-numeric ids never match a product.
    let id: i32 = id.parse().map_err(|_| JsonApiError::not_found())?;
    let product = state.catalog.get_product(id).await?;
    Ok(Json(wire::product_to_wire(&product, &state.media_base_url)))
}

#[utoipa::path(
    get, path = "/api/productos/banners/", tag = "catalog",
    responses((status = 200, description = "Active banners", body = [BannerWire]))
)]
pub async fn list_banners(State(state): State<ServerState>) -> Result<Json<Vec<BannerWire>>, JsonApiError> {
    let banners = state.catalog.list_active_banners().await?;
    Ok(Json(banners.iter().map(|b| wire::banner_to_wire(b, &state.media_base_url)).collect()))
}
