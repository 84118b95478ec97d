use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use store::StoreError;

pub type ServerResult<T> = Result<T, ServerError>;

/// Server error types
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Address index unavailable: {0}")]
    IndexUnavailable(#[from] StoreError),

    #[error("Not found")]
    NotFound,
}

/// API error response structure
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}

impl ServerError {
    fn status_code(&self) -> StatusCode {
        match self {
            ServerError::IndexUnavailable(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ServerError::NotFound => StatusCode::NOT_FOUND,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            ServerError::IndexUnavailable(_) => "INDEX_UNAVAILABLE",
            ServerError::NotFound => "NOT_FOUND",
        }
    }

    /// Body sent to the client for this error.
    pub fn to_body(&self) -> ErrorResponse {
        ErrorResponse {
            error: ErrorDetail {
                code: self.error_code().to_string(),
                message: self.to_string(),
            },
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = self.to_body();

        if status.is_server_error() {
            tracing::error!(code = %body.error.code, error = %body.error.message, "request failed");
        }

        (status, Json(body)).into_response()
    }
}
