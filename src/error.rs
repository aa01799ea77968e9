use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use serde::Serialize;

#[derive(Debug, thiserror::Error)]
pub enum LinkboardError {
    #[error("Database error: {0}")]
    Database(#[from] mongodb::error::Error),

    #[error("Password hashing error: {0}")]
    PasswordHash(#[from] bcrypt::BcryptError),

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Conflict(String),

    #[error("Maximum 5 custom tabs allowed")]
    TabQuotaExceeded,

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl LinkboardError {
    pub fn user_exists() -> Self {
        Self::Conflict("User exists".to_string())
    }

    pub fn tab_exists() -> Self {
        Self::Conflict("Tab already exists".to_string())
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

impl ResponseError for LinkboardError {
    fn status_code(&self) -> StatusCode {
        match self {
            LinkboardError::InvalidCredentials => StatusCode::BAD_REQUEST,
            LinkboardError::Validation(_) => StatusCode::BAD_REQUEST,
            LinkboardError::Conflict(_) => StatusCode::BAD_REQUEST,
            LinkboardError::TabQuotaExceeded => StatusCode::BAD_REQUEST,
            LinkboardError::Unauthorized => StatusCode::UNAUTHORIZED,
            LinkboardError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            LinkboardError::PasswordHash(_) => StatusCode::INTERNAL_SERVER_ERROR,
            LinkboardError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            LinkboardError::Serialization(_) => StatusCode::INTERNAL_SERVER_ERROR,
            LinkboardError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();

        // Internal causes stay in the server log; the caller gets a stable
        // generic message.
        if status.is_server_error() {
            log::error!("Request failed: {}", self);
            return HttpResponse::build(status).json(ErrorResponse {
                error: "Internal server error".to_string(),
            });
        }

        HttpResponse::build(status).json(ErrorResponse {
            error: self.to_string(),
        })
    }
}

pub type Result<T> = std::result::Result<T, LinkboardError>;
