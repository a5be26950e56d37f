//! OCR extraction strategies
//!
//! Three interchangeable strategies turn raw PDF bytes into extracted text
//! via an external vision provider. Exactly one is active per deployment,
//! selected by static configuration; the pipeline is strategy-agnostic.

mod chat;
mod endpoint;
mod inline;
mod raster;

use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::ExtractionConfig;
use crate::document::Document;

pub use endpoint::OcrEndpointStrategy;
pub use inline::InlineDocumentStrategy;
pub use raster::PageRasterStrategy;

/// Separator between per-page fragments when the provider exposes true page
/// boundaries.
pub const PAGE_SEPARATOR: &str = "\n\n---\n\n";

/// Which extraction strategy is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StrategyKind {
    /// Whole document inlined as an embedded-data reference in one chat request.
    #[serde(rename = "inline")]
    InlineDocument,
    /// Pages rasterized to images, batched into one multimodal chat request.
    #[serde(rename = "raster")]
    PageRaster,
    /// Provider's dedicated OCR endpoint via file upload + signed URL.
    #[serde(rename = "endpoint")]
    OcrEndpoint,
}

impl FromStr for StrategyKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "inline" => Ok(Self::InlineDocument),
            "raster" => Ok(Self::PageRaster),
            "endpoint" => Ok(Self::OcrEndpoint),
            other => Err(format!("unknown extraction strategy: {}", other)),
        }
    }
}

/// Result of one extraction run.
///
/// An empty `text` is a valid result, distinct from extraction failure.
#[derive(Debug, Clone)]
pub struct ExtractionResult {
    /// Combined extracted text, possibly empty.
    pub text: String,
    /// Number of source pages the provider reported, 0 when unknown.
    pub page_count: usize,
    /// Per-page fragments, only available from the dedicated OCR endpoint.
    pub source_pages: Option<Vec<String>>,
}

/// Extraction error types
#[derive(Error, Debug)]
pub enum ExtractError {
    /// Transport failure or non-success provider status. The message carries
    /// the status code and response body text when available.
    #[error("OCR provider unavailable: {0}")]
    ProviderUnavailable(String),

    /// The provider answered 2xx but the response lacks the expected
    /// choice/page structure.
    #[error("malformed provider response: {0}")]
    MalformedResponse(String),

    /// A page could not be rendered to an image (raster strategy only).
    #[error("page rasterization failed: {0}")]
    Rasterization(String),
}

/// Pluggable OCR extraction strategy.
#[async_trait]
pub trait ExtractionStrategy: Send + Sync {
    /// Which strategy this is.
    fn kind(&self) -> StrategyKind;

    /// Extract machine-readable text from the document.
    async fn extract(&self, document: &Document) -> Result<ExtractionResult, ExtractError>;
}

/// Build the configured strategy.
///
/// The reqwest client is shared, read-only process-wide state.
pub fn build_strategy(
    config: &ExtractionConfig,
    http: reqwest::Client,
) -> Arc<dyn ExtractionStrategy> {
    match config.strategy {
        StrategyKind::InlineDocument => Arc::new(InlineDocumentStrategy::new(config, http)),
        StrategyKind::PageRaster => Arc::new(PageRasterStrategy::new(config, http)),
        StrategyKind::OcrEndpoint => Arc::new(OcrEndpointStrategy::new(config, http)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strategy_kind_from_str() {
        assert_eq!(
            StrategyKind::from_str("inline").unwrap(),
            StrategyKind::InlineDocument
        );
        assert_eq!(
            StrategyKind::from_str("raster").unwrap(),
            StrategyKind::PageRaster
        );
        assert_eq!(
            StrategyKind::from_str("endpoint").unwrap(),
            StrategyKind::OcrEndpoint
        );
        assert!(StrategyKind::from_str("tesseract").is_err());
    }

    #[test]
    fn test_build_strategy_honors_config() {
        let mut config = crate::config::Config::default().extraction;
        config.strategy = StrategyKind::InlineDocument;
        let strategy = build_strategy(&config, reqwest::Client::new());
        assert_eq!(strategy.kind(), StrategyKind::InlineDocument);

        config.strategy = StrategyKind::PageRaster;
        let strategy = build_strategy(&config, reqwest::Client::new());
        assert_eq!(strategy.kind(), StrategyKind::PageRaster);
    }
}
