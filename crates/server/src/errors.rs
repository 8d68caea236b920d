use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;
use tracing::error;

use service::account::AccountError;
use service::errors::ServiceError;

pub const NOT_FOUND_MESSAGE: &str = "No encontrado.";
const INTERNAL_MESSAGE: &str = "Error interno del servidor.";

/// JSON error body `{error, field?}`. `detail` is logged, never sent.
#[derive(Debug)]
pub struct JsonApiError {
    pub status: StatusCode,
    pub message: String,
    pub field: Option<&'static str>,
    pub detail: Option<String>,
}

impl JsonApiError {
    pub fn new(status: StatusCode, message: impl Into<String>, detail: Option<String>) -> Self {
        Self { status, message: message.into(), field: None, detail }
    }

    pub fn with_field(mut self, field: &'static str) -> Self {
        self.field = Some(field);
        self
    }

    pub fn not_found() -> Self { Self::new(StatusCode::NOT_FOUND, NOT_FOUND_MESSAGE, None) }

    pub fn internal(detail: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_MESSAGE, Some(detail.into()))
    }
}

impl IntoResponse for JsonApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            error!(status = %self.status, detail = ?self.detail, "request failed");
        }
        let mut body = serde_json::json!({ "error": self.message });
        if let Some(field) = self.field {
            body["field"] = serde_json::Value::from(field);
        }
        (self.status, Json(body)).into_response()
    }
}

impl From<ServiceError> for JsonApiError {
    fn from(e: ServiceError) -> Self {
        match e {
            ServiceError::NotFound(_) => JsonApiError::not_found(),
            ServiceError::Validation(msg) => JsonApiError::new(StatusCode::BAD_REQUEST, msg, None),
            other => JsonApiError::internal(other.to_string()),
        }
    }
}

impl From<AccountError> for JsonApiError {
    fn from(e: AccountError) -> Self {
        match e {
            AccountError::Validation { field, message } => {
                JsonApiError::new(StatusCode::BAD_REQUEST, message, None).with_field(field)
            }
            AccountError::Conflict => {
                JsonApiError::new(StatusCode::CONFLICT, AccountError::Conflict.to_string(), None).with_field("username")
            }
            AccountError::InvalidCredentials => {
                JsonApiError::new(StatusCode::BAD_REQUEST, AccountError::InvalidCredentials.to_string(), None)
            }
            AccountError::Unauthorized => {
                JsonApiError::new(StatusCode::UNAUTHORIZED, AccountError::Unauthorized.to_string(), None)
            }
            other => JsonApiError::internal(format!("{} (code {})", other, other.code())),
        }
    }
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("database unavailable: {0}")]
    Database(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn account_errors_map_to_statuses() {
        let e: JsonApiError = AccountError::validation("password_confirm", "Las contraseñas no coinciden").into();
        assert_eq!(e.status, StatusCode::BAD_REQUEST);
        assert_eq!(e.field, Some("password_confirm"));
        let e: JsonApiError = AccountError::Conflict.into();
        assert_eq!(e.status, StatusCode::CONFLICT);
        assert_eq!(e.field, Some("username"));
        let e: JsonApiError = AccountError::InvalidCredentials.into();
        assert_eq!(e.status, StatusCode::BAD_REQUEST);
        assert_eq!(e.message, "Credenciales inválidas");
        let e: JsonApiError = AccountError::Unauthorized.into();
        assert_eq!(e.status, StatusCode::UNAUTHORIZED);
        let e: JsonApiError = AccountError::Repository("pool timed out".into()).into();
        assert_eq!(e.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!e.message.contains("pool"));
    }

    #[test]
    fn not_found_hides_detail() {
        let e: JsonApiError = ServiceError::not_found("product").into();
        assert_eq!(e.status, StatusCode::NOT_FOUND);
        assert_eq!(e.message, NOT_FOUND_MESSAGE);
        assert!(e.detail.is_none());
    }
}
