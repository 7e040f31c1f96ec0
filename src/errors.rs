use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Internal server error: {0}")]
    InternalServerError(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Not found: {0}")]
    NotFound(String),

    /// A newer query for the same view started while this one was running.
    #[error("Superseded: query version {version} replaced by {latest}")]
    Superseded { version: u64, latest: u64 },

    #[error("Upstream error: {0}")]
    UpstreamError(String),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Superseded { .. } => StatusCode::CONFLICT,
            AppError::UpstreamError(_) => StatusCode::BAD_GATEWAY,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            AppError::InternalServerError(_) => "INTERNAL",
            AppError::BadRequest(_) => "BAD_REQUEST",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::Superseded { .. } => "SUPERSEDED",
            AppError::UpstreamError(_) => "UPSTREAM",
        }
    }
}

/// Helper for mapping any unknown error into internal error.
///
/// An `AppError` carried inside an `anyhow::Error` keeps its variant.
pub fn internal_error(err: anyhow::Error) -> AppError {
    match err.downcast::<AppError>() {
        Ok(app) => app,
        Err(other) => match other.downcast::<validator::ValidationErrors>() {
            Ok(v) => AppError::BadRequest(v.to_string()),
            Err(other) => AppError::InternalServerError(other.to_string()),
        },
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status_code();

        // String provided by thiserror → safe JSON message
        let body = Json(json!({
            "is_successful": false,
            "data": null,
            "error_code": self.code(),
            "error_msg": self.to_string(),
        }));

        (status, body).into_response()
    }
}
