//! Document reconstruction pipeline
//!
//! Orchestrates ingest -> extract -> typeset -> persist -> publish. Stages
//! are strictly sequential and fail-fast: a failure at any stage returns
//! immediately, no stage retries, and no partial artifact is advertised to
//! the caller. The already-uploaded original is not rolled back.

use std::fmt;

use crate::document::Document;
use crate::error::{AppError, Result};
use crate::extract::ExtractionStrategy;
use crate::storage::{self, BlobStore, StoredObject};
use crate::typeset;

/// Pipeline stage, in order of execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Received,
    OriginalStored,
    Extracted,
    Rendered,
    ProcessedStored,
    Published,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Received => "received",
            Stage::OriginalStored => "original_stored",
            Stage::Extracted => "extracted",
            Stage::Rendered => "rendered",
            Stage::ProcessedStored => "processed_stored",
            Stage::Published => "published",
        };
        f.write_str(name)
    }
}

/// Successful pipeline output.
#[derive(Debug, Clone)]
pub struct PipelineReport {
    pub ocr_url: String,
    pub original: StoredObject,
    pub processed: StoredObject,
    pub extracted_text_length: usize,
}

/// Run the full reconstruction pipeline for one validated document.
pub async fn run(
    store: &dyn BlobStore,
    extractor: &dyn ExtractionStrategy,
    document: Document,
) -> Result<PipelineReport> {
    let uploaded_at = chrono::Utc::now().timestamp_millis();
    run_at(store, extractor, document, uploaded_at).await
}

/// Pipeline body with an injectable upload timestamp.
pub async fn run_at(
    store: &dyn BlobStore,
    extractor: &dyn ExtractionStrategy,
    document: Document,
    uploaded_at_millis: i64,
) -> Result<PipelineReport> {
    tracing::info!(
        stage = %Stage::Received,
        file = %document.original_name,
        size = document.size_bytes(),
        "Processing document"
    );

    // 1. Persist the original, unmodified
    let original_name = storage::timestamped_name(&document.original_name, uploaded_at_millis);
    let original_path = store
        .put(
            storage::ORIGINALS_NAMESPACE,
            &original_name,
            &document.bytes,
            &document.declared_content_type,
        )
        .await
        .map_err(|e| fail(Stage::OriginalStored, e))?;
    tracing::info!(stage = %Stage::OriginalStored, path = %original_path, "Original stored");

    // 2. Extract text via the active strategy
    let extraction = extractor
        .extract(&document)
        .await
        .map_err(|e| fail(Stage::Extracted, e))?;
    tracing::info!(
        stage = %Stage::Extracted,
        strategy = ?extractor.kind(),
        chars = extraction.text.chars().count(),
        pages = extraction.page_count,
        "Text extracted"
    );

    // 3. Typeset the extracted text into a new PDF
    let text = extraction.text;
    // Character count, not byte length; accented text must not inflate it
    let extracted_text_length = text.chars().count();
    let source_name = document.original_name.clone();
    let rendered = tokio::task::spawn_blocking(move || typeset::render(&text, &source_name))
        .await
        .map_err(|e| AppError::Internal(format!("typeset task failed: {}", e)))?
        .map_err(|e| fail(Stage::Rendered, e))?;
    tracing::info!(stage = %Stage::Rendered, bytes = rendered.len(), "Document rendered");

    // 4. Persist the reconstructed document
    let processed_key = storage::processed_key(&original_path);
    let processed_name = processed_key
        .rsplit('/')
        .next()
        .unwrap_or(&processed_key)
        .to_string();
    let processed_path = store
        .put(
            storage::PROCESSED_NAMESPACE,
            &processed_name,
            &rendered,
            "application/pdf",
        )
        .await
        .map_err(|e| fail(Stage::ProcessedStored, e))?;
    tracing::info!(stage = %Stage::ProcessedStored, path = %processed_path, "Processed stored");

    // 5. Publish
    let ocr_url = store.public_url(&processed_path);
    let original_url = store.public_url(&original_path);
    tracing::info!(stage = %Stage::Published, url = %ocr_url, "Pipeline complete");

    Ok(PipelineReport {
        ocr_url: ocr_url.clone(),
        original: StoredObject {
            path: original_path,
            public_url: original_url,
        },
        processed: StoredObject {
            path: processed_path,
            public_url: ocr_url,
        },
        extracted_text_length,
    })
}

/// Log the failing stage and convert the cause into the app error.
fn fail(stage: Stage, cause: impl Into<AppError>) -> AppError {
    let error = cause.into();
    tracing::error!(stage = %stage, "Pipeline failed: {}", error);
    error
}
