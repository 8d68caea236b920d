use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Extension, Json,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use tracing::info;

use service::account::domain::SessionContext;

use crate::errors::JsonApiError;
use crate::state::ServerState;
use crate::wire::{self, LoginRequest, LoginResponse, MessageResponse, ProfileUpdateRequest, RegisterRequest, UserWire};

fn body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, JsonApiError> {
    payload
        .map(|Json(v)| v)
        .map_err(|e| JsonApiError::new(StatusCode::BAD_REQUEST, e.body_text(), None))
}

#[utoipa::path(
    post, path = "/api/usuarios/registro/", tag = "account",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Registered", body = UserWire),
        (status = 400, description = "Validation Error", body = wire::ErrorBody),
        (status = 409, description = "Username taken", body = wire::ErrorBody)
    )
)]
pub async fn register(
    State(state): State<ServerState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<UserWire>), JsonApiError> {
    let input = body(payload)?;
    let account = state.accounts.register(input.into()).await?;
    Ok((StatusCode::CREATED, Json(wire::user_to_wire(&account))))
}

#[utoipa::path(
    post, path = "/api/usuarios/login/", tag = "account",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged in; sets the session cookie", body = LoginResponse),
        (status = 400, description = "Invalid credentials", body = wire::ErrorBody)
    )
)]
pub async fn login(
    State(state): State<ServerState>,
    jar: CookieJar,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<(CookieJar, Json<LoginResponse>), JsonApiError> {
    let input = body(payload)?;
    let session = state.accounts.login(input.into()).await?;
    let mut cookie = Cookie::new(state.session.cookie_name.clone(), session.token);
    cookie.set_path("/");
    cookie.set_http_only(true);
    cookie.set_secure(state.session.secure);
    cookie.set_same_site(SameSite::Lax);
    let jar = jar.add(cookie);
    let out = LoginResponse { user: wire::user_to_wire(&session.account), message: "Login exitoso".into() };
    Ok((jar, Json(out)))
}

#[utoipa::path(
    post, path = "/api/usuarios/logout/", tag = "account",
    responses(
        (status = 200, description = "Session ended; clears the cookie", body = MessageResponse),
        (status = 401, description = "No session", body = wire::ErrorBody)
    )
)]
pub async fn logout(
    State(state): State<ServerState>,
    Extension(ctx): Extension<SessionContext>,
    jar: CookieJar,
) -> Result<(CookieJar, Json<MessageResponse>), JsonApiError> {
    state.accounts.logout(&ctx).await?;
    let mut removal = Cookie::new(state.session.cookie_name.clone(), "");
    removal.set_path("/");
    let jar = jar.remove(removal);
    info!(user_id = ctx.user_id, "logout");
    Ok((jar, Json(MessageResponse { message: "Logout exitoso".into() })))
}

#[utoipa::path(
    get, path = "/api/usuarios/perfil/", tag = "account",
    responses(
        (status = 200, description = "Own profile", body = UserWire),
        (status = 401, description = "No session", body = wire::ErrorBody)
    )
)]
pub async fn get_profile(
    State(state): State<ServerState>,
    Extension(ctx): Extension<SessionContext>,
) -> Result<Json<UserWire>, JsonApiError> {
    let account = state.accounts.get_profile(&ctx).await?;
    Ok(Json(wire::user_to_wire(&account)))
}

#[utoipa::path(
    put, path = "/api/usuarios/perfil/", tag = "account",
    request_body = ProfileUpdateRequest,
    responses(
        (status = 200, description = "Updated profile", body = UserWire),
        (status = 400, description = "Validation Error", body = wire::ErrorBody),
        (status = 401, description = "No session", body = wire::ErrorBody),
        (status = 409, description = "Username taken", body = wire::ErrorBody)
    )
)]
pub async fn update_profile(
    State(state): State<ServerState>,
    Extension(ctx): Extension<SessionContext>,
    payload: Result<Json<ProfileUpdateRequest>, JsonRejection>,
) -> Result<Json<UserWire>, JsonApiError> {
    let changes = body(payload)?;
    let account = state.accounts.update_profile(&ctx, changes.into()).await?;
    Ok(Json(wire::user_to_wire(&account)))
}
