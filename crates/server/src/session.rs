use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::CookieJar;
use tracing::debug;

use service::account::AccountError;

use crate::errors::JsonApiError;
use crate::state::ServerState;

/// Session token from `Authorization: Bearer <token>`, else from the session cookie.
pub fn session_token(headers: &HeaderMap, cookie_name: &str) -> Option<String> {
    let bearer = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty());
    if let Some(token) = bearer {
        return Some(token.to_string());
    }
    CookieJar::from_headers(headers)
        .get(cookie_name)
        .map(|c| c.value().to_string())
        .filter(|v| !v.is_empty())
}

/// Route layer for identity-bound endpoints: resolves the session and stores a
/// `SessionContext` in the request extensions.
pub async fn require_session(
    State(state): State<ServerState>,
    mut req: Request,
    next: Next,
) -> Result<Response, JsonApiError> {
    let Some(token) = session_token(req.headers(), &state.session.cookie_name) else {
        debug!(path = %req.uri().path(), "missing session token");
        return Err(AccountError::Unauthorized.into());
    };
    let ctx = state.accounts.authenticate(&token).await?;
    req.extensions_mut().insert(ctx);
    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{header::COOKIE, HeaderValue};

    #[test]
    fn bearer_wins_over_cookie() {
        let mut h = HeaderMap::new();
        h.insert(AUTHORIZATION, HeaderValue::from_static("Bearer abc"));
        h.insert(COOKIE, HeaderValue::from_static("sessionid=xyz"));
        assert_eq!(session_token(&h, "sessionid").as_deref(), Some("abc"));
    }

    #[test]
    fn falls_back_to_cookie() {
        let mut h = HeaderMap::new();
        h.insert(AUTHORIZATION, HeaderValue::from_static("Basic Zm9vOmJhcg=="));
        h.insert(COOKIE, HeaderValue::from_static("theme=dark; sessionid=xyz"));
        assert_eq!(session_token(&h, "sessionid").as_deref(), Some("xyz"));
    }

    #[test]
    fn nothing_to_find() {
        let mut h = HeaderMap::new();
        assert_eq!(session_token(&h, "sessionid"), None);
        h.insert(COOKIE, HeaderValue::from_static("sessionid="));
        assert_eq!(session_token(&h, "sessionid"), None);
    }
}
