//! Dedicated OCR endpoint strategy
//!
//! Uploads the document to the provider's file storage, obtains a short-lived
//! signed URL for it, then calls the purpose-built OCR endpoint. This is the
//! only strategy that exposes true page boundaries: each page yields its own
//! markdown fragment, and fragments are joined with an explicit separator.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

use crate::config::ExtractionConfig;
use crate::document::Document;

use super::{ExtractError, ExtractionResult, ExtractionStrategy, StrategyKind, PAGE_SEPARATOR};

pub struct OcrEndpointStrategy {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
}

#[derive(Debug, Deserialize)]
struct FileUploadResponse {
    id: String,
}

#[derive(Debug, Deserialize)]
struct SignedUrlResponse {
    url: String,
}

#[derive(Debug, Deserialize)]
pub(super) struct OcrResponse {
    #[serde(default)]
    pub pages: Vec<OcrPage>,
}

#[derive(Debug, Deserialize)]
pub(super) struct OcrPage {
    #[serde(default)]
    pub markdown: String,
}

impl OcrEndpointStrategy {
    pub fn new(config: &ExtractionConfig, http: reqwest::Client) -> Self {
        Self {
            http,
            base_url: config.base_url.clone(),
            api_key: config.api_key.clone(),
            model: config.ocr_model.clone(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }

    /// Upload the document to the provider's file storage, purpose `ocr`.
    async fn upload_file(&self, document: &Document) -> Result<String, ExtractError> {
        let part = reqwest::multipart::Part::bytes(document.bytes.clone())
            .file_name(document.original_name.clone())
            .mime_str("application/pdf")
            .map_err(|e| ExtractError::ProviderUnavailable(format!("invalid mime: {}", e)))?;

        let form = reqwest::multipart::Form::new()
            .text("purpose", "ocr")
            .part("file", part);

        let response = self
            .http
            .post(self.url("/v1/files"))
            .bearer_auth(&self.api_key)
            .multipart(form)
            .send()
            .await
            .map_err(|e| ExtractError::ProviderUnavailable(format!("file upload failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ExtractError::ProviderUnavailable(format!(
                "file upload returned {}: {}",
                status, body
            )));
        }

        let uploaded: FileUploadResponse = response
            .json()
            .await
            .map_err(|e| ExtractError::MalformedResponse(format!("invalid upload response: {}", e)))?;

        Ok(uploaded.id)
    }

    /// Fetch a short-lived signed URL for a previously uploaded file.
    async fn signed_url(&self, file_id: &str) -> Result<String, ExtractError> {
        let response = self
            .http
            .get(self.url(&format!("/v1/files/{}/url", file_id)))
            .bearer_auth(&self.api_key)
            .send()
            .await
            .map_err(|e| {
                ExtractError::ProviderUnavailable(format!("signed URL request failed: {}", e))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ExtractError::ProviderUnavailable(format!(
                "signed URL request returned {}: {}",
                status, body
            )));
        }

        let signed: SignedUrlResponse = response.json().await.map_err(|e| {
            ExtractError::MalformedResponse(format!("invalid signed URL response: {}", e))
        })?;

        Ok(signed.url)
    }

    /// Run OCR against the signed document URL.
    async fn process(&self, document_url: &str) -> Result<OcrResponse, ExtractError> {
        let request = json!({
            "model": self.model,
            "document": {
                "type": "document_url",
                "document_url": document_url,
            },
            "include_image_base64": false,
        });

        let response = self
            .http
            .post(self.url("/v1/ocr"))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| ExtractError::ProviderUnavailable(format!("OCR request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ExtractError::ProviderUnavailable(format!(
                "OCR endpoint returned {}: {}",
                status, body
            )));
        }

        response
            .json()
            .await
            .map_err(|e| ExtractError::MalformedResponse(format!("invalid OCR response: {}", e)))
    }
}

#[async_trait]
impl ExtractionStrategy for OcrEndpointStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::OcrEndpoint
    }

    async fn extract(&self, document: &Document) -> Result<ExtractionResult, ExtractError> {
        let file_id = self.upload_file(document).await?;
        tracing::debug!(file_id = %file_id, "Uploaded document to provider storage");

        let document_url = self.signed_url(&file_id).await?;
        let response = self.process(&document_url).await?;

        result_from_pages(response)
    }
}

/// Combine per-page fragments into one result.
pub(super) fn result_from_pages(response: OcrResponse) -> Result<ExtractionResult, ExtractError> {
    if response.pages.is_empty() {
        return Err(ExtractError::MalformedResponse(
            "OCR response contains no pages".into(),
        ));
    }

    let fragments: Vec<String> = response.pages.into_iter().map(|p| p.markdown).collect();
    let text = fragments.join(PAGE_SEPARATOR);

    tracing::info!(
        pages = fragments.len(),
        chars = text.len(),
        "OCR endpoint extraction complete"
    );

    Ok(ExtractionResult {
        page_count: fragments.len(),
        source_pages: Some(fragments),
        text,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fragments_joined_with_separator() {
        let response: OcrResponse = serde_json::from_str(
            r#"{"pages":[{"index":0,"markdown":"page one"},{"index":1,"markdown":"page two"}]}"#,
        )
        .unwrap();

        let result = result_from_pages(response).unwrap();
        assert_eq!(result.text, "page one\n\n---\n\npage two");
        assert_eq!(result.page_count, 2);
        assert_eq!(
            result.source_pages,
            Some(vec!["page one".to_string(), "page two".to_string()])
        );
    }

    #[test]
    fn test_single_page_with_empty_markdown_is_success() {
        let response: OcrResponse =
            serde_json::from_str(r#"{"pages":[{"index":0,"markdown":""}]}"#).unwrap();

        let result = result_from_pages(response).unwrap();
        assert_eq!(result.text, "");
        assert_eq!(result.page_count, 1);
    }

    #[test]
    fn test_missing_pages_is_malformed() {
        let response: OcrResponse = serde_json::from_str(r#"{"pages":[]}"#).unwrap();
        assert!(matches!(
            result_from_pages(response),
            Err(ExtractError::MalformedResponse(_))
        ));

        let response: OcrResponse = serde_json::from_str(r#"{}"#).unwrap();
        assert!(matches!(
            result_from_pages(response),
            Err(ExtractError::MalformedResponse(_))
        ));
    }
}
