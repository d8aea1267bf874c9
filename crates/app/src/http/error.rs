use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use tracing::error;

use services::EngineError;

/// JSON error body returned by every route.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: &'static str,
}

#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    code: &'static str,
    message: String,
}

impl ApiError {
    fn new(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            code,
            message: message.into(),
        }
    }

    /// An item id that does not parse is reported the same as an unknown one.
    pub fn item_not_found(raw: &str) -> Self {
        Self::new(
            StatusCode::NOT_FOUND,
            "ITEM_NOT_FOUND",
            format!("item not found: {raw}"),
        )
    }
}

impl From<EngineError> for ApiError {
    fn from(err: EngineError) -> Self {
        let (status, code) = match &err {
            EngineError::UnknownTopic(_) => (StatusCode::NOT_FOUND, "UNKNOWN_TOPIC"),
            EngineError::ItemNotFound(_) => (StatusCode::NOT_FOUND, "ITEM_NOT_FOUND"),
            EngineError::InvalidChoice { .. } => {
                (StatusCode::UNPROCESSABLE_ENTITY, "INVALID_CHOICE")
            }
            EngineError::InvalidSettings(_) => {
                (StatusCode::UNPROCESSABLE_ENTITY, "INVALID_SETTINGS")
            }
            EngineError::SessionEnded(_) => (StatusCode::CONFLICT, "SESSION_ENDED"),
            _ => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL"),
        };
        if status.is_server_error() {
            error!(error = %err, "request failed");
        }
        Self::new(status, code, err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(ErrorResponse {
                error: self.message,
                code: self.code,
            }),
        )
            .into_response()
    }
}
