use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("Authentication required")]
    Unauthorized,

    #[error("Login verification failed")]
    LoginRejected,

    #[error("Invalid payload: {0}")]
    InvalidPayload(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Upstream error: {0}")]
    Upstream(String),
}

pub type Result<T> = std::result::Result<T, GatewayError>;

impl ResponseError for GatewayError {
    fn status_code(&self) -> StatusCode {
        match self {
            GatewayError::Unauthorized | GatewayError::LoginRejected => StatusCode::UNAUTHORIZED,
            GatewayError::InvalidPayload(_) => StatusCode::BAD_REQUEST,
            GatewayError::Configuration(_) => StatusCode::INTERNAL_SERVER_ERROR,
            GatewayError::Upstream(_) => StatusCode::BAD_GATEWAY,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        HttpResponse::build(status).json(json!({
            "error": self.to_string(),
            "status": status.as_u16()
        }))
    }
}

impl From<auth_core::TokenError> for GatewayError {
    fn from(err: auth_core::TokenError) -> Self {
        match err {
            // A missing secret is a server fault, never "unauthenticated".
            auth_core::TokenError::MissingSecret => {
                GatewayError::Configuration("session secret is not configured".to_string())
            }
            _ => GatewayError::Unauthorized,
        }
    }
}
