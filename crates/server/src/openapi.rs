use utoipa::OpenApi;

use crate::wire::{
    BannerWire, CategoryWire, ErrorBody, LoginRequest, LoginResponse, MessageResponse, PerfilUpdate, PerfilWire,
    ProductWire, ProfileUpdateRequest, RegisterRequest, UserWire,
};

#[derive(utoipa::ToSchema)]
pub struct HealthResponse { pub status: String }

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::catalog::list_categories,
        crate::routes::catalog::list_products,
        crate::routes::catalog::list_featured,
        crate::routes::catalog::get_product,
        crate::routes::catalog::list_banners,
        crate::routes::account::register,
        crate::routes::account::login,
        crate::routes::account::logout,
        crate::routes::account::get_profile,
        crate::routes::account::update_profile,
    ),
    components(
        schemas(
            HealthResponse,
            CategoryWire,
            ProductWire,
            BannerWire,
            PerfilWire,
            UserWire,
            RegisterRequest,
            LoginRequest,
            LoginResponse,
            MessageResponse,
            PerfilUpdate,
            ProfileUpdateRequest,
            ErrorBody,
        )
    ),
    tags(
        (name = "health"),
        (name = "catalog"),
        (name = "account")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_storefront_paths() {
        let doc = ApiDoc::openapi();
        let paths = &doc.paths.paths;
        assert!(paths.contains_key("/api/productos/"));
        assert!(paths.contains_key("/api/productos/{id}/"));
        assert!(paths.contains_key("/api/usuarios/perfil/"));
    }
}
