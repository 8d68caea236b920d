//! JSON shapes exchanged with the storefront, and the mappings between them
//! and the service records. Field names follow the storefront's Spanish API.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use common::media::{absolute_url, relative_path};
use service::account::domain::{Account, LoginInput, Profile, ProfileChanges, RegisterInput, User};
use service::catalog::domain::{Banner, Category, Product, ProductFilter};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CategoryWire {
    pub id: i32,
    pub nombre: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ProductWire {
    pub id: i32,
    pub nombre: String,
    pub descripcion: Option<String>,
    /// Decimal with two places, e.g. `"18000.00"`.
    #[schema(example = "18000.00")]
    pub precio: String,
    /// Category id.
    pub categoria: i32,
    pub categoria_nombre: String,
    pub stock: i32,
    /// Absolute media URL.
    pub imagen: Option<String>,
    pub destacado: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct BannerWire {
    pub id: i32,
    pub titulo: String,
    pub subtitulo: String,
    pub tag: String,
    pub imagen: Option<String>,
    pub color_fondo: String,
    pub color_texto: String,
    pub texto_boton: String,
    pub enlace: String,
    pub activo: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PerfilWire {
    pub telefono: String,
    pub direccion: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct UserWire {
    pub id: i32,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub perfil: PerfilWire,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ProductQuery {
    /// Exact category name.
    pub categoria: Option<String>,
    /// Substring of name or description, case-insensitive.
    pub search: Option<String>,
}

/// Missing fields deserialize as empty strings so validation can name them.
#[derive(Clone, Default, Deserialize, ToSchema)]
#[serde(default)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub password_confirm: String,
    pub first_name: String,
    pub last_name: String,
    pub telefono: String,
    pub direccion: String,
}

#[derive(Clone, Default, Deserialize, ToSchema)]
#[serde(default)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct PerfilUpdate {
    pub telefono: Option<String>,
    pub direccion: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct ProfileUpdateRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub perfil: Option<PerfilUpdate>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LoginResponse {
    pub user: UserWire,
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    pub error: String,
    pub field: Option<String>,
}

pub fn category_to_wire(c: &Category) -> CategoryWire {
    CategoryWire { id: c.id, nombre: c.name.clone() }
}

pub fn category_from_wire(w: &CategoryWire) -> Category {
    Category { id: w.id, name: w.nombre.clone() }
}

/// Render a price with exactly two decimal places.
pub fn format_price(price: Decimal) -> String {
    let mut p = price.round_dp(2);
    p.rescale(2);
    p.to_string()
}

pub fn product_to_wire(p: &Product, media_base: &str) -> ProductWire {
    ProductWire {
        id: p.id,
        nombre: p.name.clone(),
        descripcion: p.description.clone(),
        precio: format_price(p.price),
        categoria: p.category_id,
        categoria_nombre: p.category_name.clone(),
        stock: p.stock,
        imagen: p.image.as_deref().and_then(|i| absolute_url(media_base, i)),
        destacado: p.featured,
    }
}

pub fn product_from_wire(w: &ProductWire, media_base: &str) -> Result<Product, rust_decimal::Error> {
    Ok(Product {
        id: w.id,
        name: w.nombre.clone(),
        description: w.descripcion.clone(),
        price: Decimal::from_str(&w.precio)?,
        category_id: w.categoria,
        category_name: w.categoria_nombre.clone(),
        stock: w.stock,
        image: w.imagen.as_deref().map(|u| relative_path(media_base, u)),
        featured: w.destacado,
    })
}

pub fn banner_to_wire(b: &Banner, media_base: &str) -> BannerWire {
    BannerWire {
        id: b.id,
        titulo: b.title.clone(),
        subtitulo: b.subtitle.clone(),
        tag: b.tag.clone(),
        imagen: absolute_url(media_base, &b.image),
        color_fondo: b.background_style.clone(),
        color_texto: b.text_style.clone(),
        texto_boton: b.button_label.clone(),
        enlace: b.link.clone(),
        activo: b.active,
    }
}

pub fn banner_from_wire(w: &BannerWire, media_base: &str) -> Banner {
    Banner {
        id: w.id,
        title: w.titulo.clone(),
        subtitle: w.subtitulo.clone(),
        tag: w.tag.clone(),
        image: w.imagen.as_deref().map(|u| relative_path(media_base, u)).unwrap_or_default(),
        background_style: w.color_fondo.clone(),
        text_style: w.color_texto.clone(),
        button_label: w.texto_boton.clone(),
        link: w.enlace.clone(),
        active: w.activo,
    }
}

pub fn user_to_wire(a: &Account) -> UserWire {
    UserWire {
        id: a.user.id,
        username: a.user.username.clone(),
        email: a.user.email.clone(),
        first_name: a.user.first_name.clone(),
        last_name: a.user.last_name.clone(),
        perfil: PerfilWire { telefono: a.profile.phone.clone(), direccion: a.profile.address.clone() },
    }
}

pub fn user_from_wire(w: &UserWire) -> Account {
    Account {
        user: User {
            id: w.id,
            username: w.username.clone(),
            email: w.email.clone(),
            first_name: w.first_name.clone(),
            last_name: w.last_name.clone(),
        },
        profile: Profile { phone: w.perfil.telefono.clone(), address: w.perfil.direccion.clone() },
    }
}

impl From<ProductQuery> for ProductFilter {
    fn from(q: ProductQuery) -> Self {
        ProductFilter { category: q.categoria, search: q.search }.normalized()
    }
}

impl From<RegisterRequest> for RegisterInput {
    fn from(r: RegisterRequest) -> Self {
        RegisterInput {
            username: r.username,
            email: r.email,
            password: r.password,
            password_confirm: r.password_confirm,
            first_name: r.first_name,
            last_name: r.last_name,
            phone: r.telefono,
            address: r.direccion,
        }
    }
}

impl From<LoginRequest> for LoginInput {
    fn from(r: LoginRequest) -> Self {
        LoginInput { username: r.username, password: r.password }
    }
}

impl From<ProfileUpdateRequest> for ProfileChanges {
    fn from(r: ProfileUpdateRequest) -> Self {
        let perfil = r.perfil.unwrap_or_default();
        ProfileChanges {
            username: r.username,
            email: r.email,
            first_name: r.first_name,
            last_name: r.last_name,
            phone: perfil.telefono,
            address: perfil.direccion,
        }
    }
}
