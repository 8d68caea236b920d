use thiserror::Error;

use models::errors::ModelError;

/// Business errors for account workflows
#[derive(Debug, Error)]
pub enum AccountError {
    #[error("{message}")]
    Validation { field: &'static str, message: String },
    #[error("Ya existe un usuario con ese nombre.")]
    Conflict,
    #[error("Credenciales inválidas")]
    InvalidCredentials,
    #[error("Las credenciales de autenticación no se proveyeron.")]
    Unauthorized,
    #[error("hashing error: {0}")]
    HashError(String),
    #[error("repository error: {0}")]
    Repository(String),
}

impl AccountError {
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        Self::Validation { field, message: message.into() }
    }

    /// Stable numeric code for external mapping/logging
    pub fn code(&self) -> u16 {
        match self {
            AccountError::Validation { .. } => 1001,
            AccountError::Conflict => 1002,
            AccountError::InvalidCredentials => 1003,
            AccountError::Unauthorized => 1004,
            AccountError::HashError(_) => 1101,
            AccountError::Repository(_) => 1200,
        }
    }
}

impl From<ModelError> for AccountError {
    fn from(e: ModelError) -> Self {
        match e {
            ModelError::Validation(msg) => AccountError::validation("non_field_errors", msg),
            ModelError::Conflict(_) => AccountError::Conflict,
            ModelError::Db(msg) => AccountError::Repository(msg),
        }
    }
}
