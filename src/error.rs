use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::domain::shared::error_dto::ErrorResponse;

/// Main application error type
///
/// Display strings are sent to clients verbatim, so each variant renders only its message.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A required form field was not supplied
    #[error("{0}")]
    MissingParameter(String),

    #[error("Invalid option")]
    InvalidOption,

    /// The request body could not be decoded
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    PayloadTooLarge(String),

    /// Translation, synthesis or recognition failed
    #[error("{0}")]
    RemoteCapability(String),

    #[error("{0}")]
    Internal(String),
}

impl AppError {
    pub fn missing_option() -> Self {
        Self::MissingParameter("Missing option parameter".to_string())
    }

    pub fn missing_text() -> Self {
        Self::MissingParameter("Missing text parameter".to_string())
    }

    pub fn missing_audio() -> Self {
        Self::MissingParameter("Missing audio file".to_string())
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::MissingParameter(_) | Self::InvalidOption | Self::BadRequest(_) => {
                StatusCode::BAD_REQUEST
            }
            Self::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            Self::RemoteCapability(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse {
            error: self.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(
                error = %self,
                status = %status.as_u16(),
                "Request failed"
            );
        } else {
            tracing::warn!(
                error = %self,
                status = %status.as_u16(),
                "Request rejected"
            );
        }

        (status, Json(self.to_response())).into_response()
    }
}

/// Custom result type for the application
pub type AppResult<T> = Result<T, AppError>;
