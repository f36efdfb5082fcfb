use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("{0}")]
    MissingInput(String),

    #[error("Please enter a valid email")]
    InvalidEmail,

    #[error("Password must be at least 8 characters long")]
    WeakPassword,

    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    #[error("{0}")]
    InvalidInput(String),

    #[error("A doctor with email {0} already exists")]
    DuplicateEmail(String),

    #[error("{0}")]
    NotFound(String),

    #[error("Appointment already cancelled")]
    AlreadyCancelled,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("{0}")]
    Auth(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("External service error: {0}")]
    ExternalService(String),

    #[error("Internal Server Error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::MissingInput(_)
            | AppError::InvalidEmail
            | AppError::WeakPassword
            | AppError::InvalidAddress(_)
            | AppError::InvalidInput(_)
            | AppError::DuplicateEmail(_)
            | AppError::AlreadyCancelled => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::InvalidCredentials | AppError::Auth(_) => StatusCode::UNAUTHORIZED,
            AppError::Database(_) | AppError::ExternalService(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn is_infrastructure(&self) -> bool {
        matches!(
            self,
            AppError::Database(_) | AppError::ExternalService(_) | AppError::Internal(_)
        )
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = self.to_string();

        let body = if self.is_infrastructure() {
            tracing::error!("Error: {}: {}", status, message);
            // Underlying message is passed through to the caller.
            json!({
                "success": false,
                "message": "Internal server error",
                "error": message
            })
        } else {
            tracing::warn!("Rejected request: {}: {}", status, message);
            json!({
                "success": false,
                "message": message
            })
        };

        (status, Json(body)).into_response()
    }
}
