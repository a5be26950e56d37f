//! Error types for the facsimile server

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::extract::ExtractError;
use crate::storage::StorageError;
use crate::typeset::TypesetError;

/// Application-wide result type
pub type Result<T> = std::result::Result<T, AppError>;

/// Application error type
///
/// Every pipeline stage failure is converted into one of these at the
/// controller boundary. Only `Validation` is user-correctable (400);
/// everything else surfaces as 500 with the underlying message in `details`.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Bad request: {0}")]
    Validation(String),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Extraction error: {0}")]
    Extraction(#[from] ExtractError),

    #[error("Typesetting error: {0}")]
    Typeset(#[from] TypesetError),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error response body
///
/// 400 responses carry only `error`; 500 responses additionally carry the
/// original failure message in `details`.
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl AppError {
    /// Short machine-readable classification for the `error` field.
    pub fn classification(&self) -> &'static str {
        match self {
            AppError::Validation(_) => "validation_error",
            AppError::Storage(_) => "storage_unavailable",
            AppError::Extraction(ExtractError::ProviderUnavailable(_)) => "provider_unavailable",
            AppError::Extraction(ExtractError::MalformedResponse(_)) => "malformed_response",
            AppError::Extraction(ExtractError::Rasterization(_)) => "rasterization_error",
            AppError::Typeset(_) => "serialization_failure",
            AppError::Internal(_) => "internal_error",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            AppError::Validation(msg) => (
                StatusCode::BAD_REQUEST,
                ErrorResponse {
                    error: msg.clone(),
                    details: None,
                },
            ),
            other => {
                tracing::error!(classification = other.classification(), "{}", other);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse {
                        error: other.classification().to_string(),
                        details: Some(other.to_string()),
                    },
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification_per_variant() {
        assert_eq!(
            AppError::Validation("missing file".into()).classification(),
            "validation_error"
        );
        assert_eq!(
            AppError::Extraction(ExtractError::ProviderUnavailable("429".into()))
                .classification(),
            "provider_unavailable"
        );
        assert_eq!(
            AppError::Extraction(ExtractError::MalformedResponse("no choices".into()))
                .classification(),
            "malformed_response"
        );
        assert_eq!(
            AppError::Storage(StorageError::ConnectionFailed("refused".into()))
                .classification(),
            "storage_unavailable"
        );
    }

    #[test]
    fn test_validation_maps_to_400() {
        let response = AppError::Validation("no file provided".into()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_stage_failures_map_to_500() {
        let response =
            AppError::Extraction(ExtractError::ProviderUnavailable("HTTP 429".into()))
                .into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
