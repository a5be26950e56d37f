//! Inline-document strategy
//!
//! Encodes the whole PDF as a single `data:` URL and sends it to the
//! provider's multimodal chat endpoint in one request. Bounded by the
//! provider's single-request size/token limits.

use async_trait::async_trait;
use base64::Engine;

use crate::config::ExtractionConfig;
use crate::document::Document;

use super::chat::{self, ChatRequest, ContentPart};
use super::{ExtractError, ExtractionResult, ExtractionStrategy, StrategyKind};

pub struct InlineDocumentStrategy {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl InlineDocumentStrategy {
    pub fn new(config: &ExtractionConfig, http: reqwest::Client) -> Self {
        Self {
            http,
            base_url: config.base_url.clone(),
            api_key: config.api_key.clone(),
            model: config.chat_model.clone(),
        }
    }
}

#[async_trait]
impl ExtractionStrategy for InlineDocumentStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::InlineDocument
    }

    async fn extract(&self, document: &Document) -> Result<ExtractionResult, ExtractError> {
        let encoded = base64::engine::general_purpose::STANDARD.encode(&document.bytes);
        let data_url = format!("data:application/pdf;base64,{}", encoded);

        let request =
            ChatRequest::for_extraction(&self.model, vec![ContentPart::data_url(data_url)]);

        tracing::debug!(
            file = %document.original_name,
            size = document.size_bytes(),
            "Sending inlined document to chat endpoint"
        );

        let response = chat::post_chat(&self.http, &self.base_url, &self.api_key, &request).await?;
        let text = chat::first_choice_text(response)?;

        tracing::info!(chars = text.len(), "Inline extraction complete");

        Ok(ExtractionResult {
            text,
            page_count: 0,
            source_pages: None,
        })
    }
}
