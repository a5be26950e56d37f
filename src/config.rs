//! Configuration management for the facsimile server
//!
//! All provider/storage client handles are process-scoped state initialized
//! once at startup; there is no runtime reconfiguration.

use std::env;
use std::str::FromStr;

use serde::Deserialize;

use crate::extract::StrategyKind;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub extraction: ExtractionConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    pub endpoint: String,
    pub bucket: String,
    pub access_key: String,
    pub secret_key: String,
    pub region: Option<String>,
    /// Base URL for public object links. Defaults to path-style
    /// `{endpoint}/{bucket}` when unset.
    pub public_base_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExtractionConfig {
    /// Which extraction strategy is active for this deployment.
    pub strategy: StrategyKind,
    pub api_key: String,
    pub base_url: String,
    /// Multimodal chat model (inline and raster strategies).
    pub chat_model: String,
    /// Dedicated OCR model (endpoint strategy).
    pub ocr_model: String,
    /// Render scale for page rasterization (raster strategy).
    pub raster_scale: f32,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 3001,
            },
            storage: StorageConfig {
                endpoint: "http://localhost:9000".to_string(),
                bucket: "factures".to_string(),
                access_key: "admin".to_string(),
                secret_key: "password123".to_string(),
                region: Some("us-east-1".to_string()),
                public_base_url: None,
            },
            extraction: ExtractionConfig {
                strategy: StrategyKind::OcrEndpoint,
                api_key: String::new(),
                base_url: "https://api.mistral.ai".to_string(),
                chat_model: "pixtral-12b-2409".to_string(),
                ocr_model: "mistral-ocr-latest".to_string(),
                raster_scale: 2.0,
            },
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, env::VarError> {
        let defaults = Config::default();

        Ok(Config {
            server: ServerConfig {
                host: env::var("SERVER_HOST").unwrap_or(defaults.server.host),
                port: env::var("SERVER_PORT")
                    .ok()
                    .and_then(|p| p.parse().ok())
                    .unwrap_or(defaults.server.port),
            },
            storage: StorageConfig {
                endpoint: env::var("S3_ENDPOINT")?,
                bucket: env::var("S3_BUCKET")?,
                access_key: env::var("S3_ACCESS_KEY")?,
                secret_key: env::var("S3_SECRET_KEY")?,
                region: env::var("S3_REGION").ok(),
                public_base_url: env::var("S3_PUBLIC_URL").ok(),
            },
            extraction: ExtractionConfig {
                strategy: env::var("OCR_STRATEGY")
                    .ok()
                    .and_then(|s| StrategyKind::from_str(&s).ok())
                    .unwrap_or(defaults.extraction.strategy),
                api_key: env::var("MISTRAL_API_KEY")?,
                base_url: env::var("MISTRAL_BASE_URL")
                    .unwrap_or(defaults.extraction.base_url),
                chat_model: env::var("MISTRAL_CHAT_MODEL")
                    .unwrap_or(defaults.extraction.chat_model),
                ocr_model: env::var("MISTRAL_OCR_MODEL")
                    .unwrap_or(defaults.extraction.ocr_model),
                raster_scale: env::var("OCR_RASTER_SCALE")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(defaults.extraction.raster_scale),
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_select_endpoint_strategy() {
        let config = Config::default();
        assert_eq!(config.extraction.strategy, StrategyKind::OcrEndpoint);
        assert_eq!(config.extraction.base_url, "https://api.mistral.ai");
        assert_eq!(config.extraction.raster_scale, 2.0);
    }
}
