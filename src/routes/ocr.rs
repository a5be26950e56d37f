//! OCR reconstruction route
//!
//! `POST /ocr` takes a multipart form with a single `file` field (PDF, at
//! most 10 MiB), runs the reconstruction pipeline, and returns the public
//! URL of the rebuilt document.

use axum::{
    extract::{DefaultBodyLimit, Multipart, State},
    routing::post,
    Json, Router,
};
use serde::Serialize;

use crate::document::Document;
use crate::error::{AppError, Result};
use crate::pipeline;
use crate::state::AppState;

/// Maximum accepted upload size: 10 MiB
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Only PDFs are accepted.
const ACCEPTED_CONTENT_TYPE: &str = "application/pdf";

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OcrResponseBody {
    pub success: bool,
    pub ocr_url: String,
    pub original_path: String,
    pub ocr_path: String,
    pub extracted_text_length: usize,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(process_document))
        // Leave headroom above the file cap for multipart framing
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES + 64 * 1024))
}

/// POST /ocr
async fn process_document(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<OcrResponseBody>> {
    let document = read_upload(multipart).await?;

    let report = pipeline::run(state.blob_store(), state.extractor(), document).await?;

    Ok(Json(OcrResponseBody {
        success: true,
        ocr_url: report.ocr_url,
        original_path: report.original.path,
        ocr_path: report.processed.path,
        extracted_text_length: report.extracted_text_length,
    }))
}

/// Pull the single `file` field out of the multipart body and validate it.
async fn read_upload(mut multipart: Multipart) -> Result<Document> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("invalid multipart body: {}", e)))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let original_name = field
            .file_name()
            .map(|s| s.to_string())
            .ok_or_else(|| AppError::Validation("file field has no filename".into()))?;

        let content_type = field
            .content_type()
            .map(|s| s.to_string())
            .unwrap_or_default();

        if content_type != ACCEPTED_CONTENT_TYPE {
            return Err(AppError::Validation(format!(
                "unsupported content type {:?}, expected {}",
                content_type, ACCEPTED_CONTENT_TYPE
            )));
        }

        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("failed to read file: {}", e)))?;

        if bytes.is_empty() {
            return Err(AppError::Validation("uploaded file is empty".into()));
        }

        if bytes.len() > MAX_UPLOAD_BYTES {
            return Err(AppError::Validation(format!(
                "file too large: {} bytes (max {})",
                bytes.len(),
                MAX_UPLOAD_BYTES
            )));
        }

        return Ok(Document::new(bytes.to_vec(), content_type, original_name));
    }

    Err(AppError::Validation("no file provided".into()))
}
