use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use sketchboard_core::{Error as CoreError, RepositoryError, StorageError};
use thiserror::Error;
use tracing::{error, warn};

/// Failures while assembling the server from its configuration.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("Supabase configuration is missing")]
    MissingSupabaseConfig,
    #[error("Invalid bind address: {0}")]
    InvalidBindAddress(String),
    #[error("Invalid public base URL: {0}")]
    InvalidPublicUrl(String),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// A request failure, rendered as `{"error": "<message>"}`.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    PayloadTooLarge(String),
    #[error(transparent)]
    Core(#[from] CoreError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::Core(err) => match err {
                CoreError::Validation(_) => StatusCode::BAD_REQUEST,
                CoreError::NotFound(_) => StatusCode::NOT_FOUND,
                CoreError::Storage(
                    StorageError::UploadFailed { .. } | StorageError::DeleteFailed { .. },
                ) => StatusCode::BAD_GATEWAY,
                CoreError::Storage(StorageError::InvalidReference { .. })
                | CoreError::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            ApiError::PayloadTooLarge(rejection.body_text())
        } else {
            ApiError::BadRequest(rejection.body_text())
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = self.to_string();
        if status.is_server_error() {
            error!(status = %status, error = %message, "Request failed");
        } else {
            warn!(status = %status, error = %message, "Request rejected");
        }
        (status, Json(json!({ "error": message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sketchboard_core::{SketchId, ValidationError};

    #[test]
    fn maps_core_errors_to_status_codes() {
        let cases = [
            (
                CoreError::Validation(ValidationError {
                    violations: vec!["title should not be empty".into()],
                }),
                StatusCode::BAD_REQUEST,
            ),
            (CoreError::NotFound(SketchId(7)), StatusCode::NOT_FOUND),
            (
                StorageError::upload("full/a.png", "boom").into(),
                StatusCode::BAD_GATEWAY,
            ),
            (
                StorageError::delete("full/a.png", "boom").into(),
                StatusCode::BAD_GATEWAY,
            ),
            (
                StorageError::invalid_reference("https://x/y").into(),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                RepositoryError::database("disk full").into(),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, expected) in cases {
            assert_eq!(ApiError::from(err).status(), expected);
        }
    }
}
