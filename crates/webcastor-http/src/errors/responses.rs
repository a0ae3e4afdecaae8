//! HTTP error response formatting

use super::HttpError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

impl HttpError {
    /// Get the appropriate HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            HttpError::StartupFailed { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            HttpError::ConfigError { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            HttpError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            HttpError::ServiceUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
            HttpError::InternalError { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get error hint for user guidance
    pub fn error_hint(&self) -> Option<&'static str> {
        match &self {
            HttpError::BadRequest { .. } => Some("Check request format and parameters"),
            HttpError::ServiceUnavailable { .. } => {
                Some("The credential store is unreachable; retry later")
            }
            _ => None,
        }
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = json!({
            "error": {
                "code": self.error_code(),
                "message": self.to_string(),
                "hint": self.error_hint()
            }
        });

        (status, Json(body)).into_response()
    }
}
