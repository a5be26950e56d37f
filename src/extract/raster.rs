//! Page-raster strategy
//!
//! Rasterizes each page of the PDF to an independent PNG via MuPDF, then
//! embeds every page image as a separate attachment in one multimodal chat
//! request. Preferred when the provider cannot ingest the PDF container
//! directly but accepts images.

use std::io::Cursor;

use async_trait::async_trait;
use base64::Engine;
use image::DynamicImage;
use mupdf::{Colorspace, Matrix};

use crate::config::ExtractionConfig;
use crate::document::Document;

use super::chat::{self, ChatRequest, ContentPart};
use super::{ExtractError, ExtractionResult, ExtractionStrategy, StrategyKind};

pub struct PageRasterStrategy {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
    scale: f32,
}

impl PageRasterStrategy {
    pub fn new(config: &ExtractionConfig, http: reqwest::Client) -> Self {
        Self {
            http,
            base_url: config.base_url.clone(),
            api_key: config.api_key.clone(),
            model: config.chat_model.clone(),
            scale: config.raster_scale,
        }
    }
}

#[async_trait]
impl ExtractionStrategy for PageRasterStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::PageRaster
    }

    async fn extract(&self, document: &Document) -> Result<ExtractionResult, ExtractError> {
        let bytes = document.bytes.clone();
        let scale = self.scale;

        // MuPDF is blocking; all pages are rendered before any network call
        let page_images = tokio::task::spawn_blocking(move || rasterize_pages(&bytes, scale))
            .await
            .map_err(|e| ExtractError::Rasterization(format!("task join error: {}", e)))??;

        let page_count = page_images.len();
        tracing::debug!(
            file = %document.original_name,
            pages = page_count,
            scale,
            "Rasterized pages for extraction"
        );

        let attachments = page_images
            .into_iter()
            .map(|png| {
                let encoded = base64::engine::general_purpose::STANDARD.encode(png);
                ContentPart::data_url(format!("data:image/png;base64,{}", encoded))
            })
            .collect();

        let request = ChatRequest::for_extraction(&self.model, attachments);
        let response = chat::post_chat(&self.http, &self.base_url, &self.api_key, &request).await?;
        let text = chat::first_choice_text(response)?;

        tracing::info!(chars = text.len(), pages = page_count, "Raster extraction complete");

        Ok(ExtractionResult {
            text,
            page_count,
            source_pages: None,
        })
    }
}

/// Render every page of the PDF to a PNG at the given scale.
fn rasterize_pages(bytes: &[u8], scale: f32) -> Result<Vec<Vec<u8>>, ExtractError> {
    let doc = mupdf::Document::from_bytes(bytes, "application/pdf")
        .map_err(|e| ExtractError::Rasterization(format!("failed to open document: {}", e)))?;

    let page_count = doc
        .page_count()
        .map_err(|e| ExtractError::Rasterization(format!("failed to count pages: {}", e)))?;

    let matrix = Matrix::new_scale(scale, scale);
    let colorspace = Colorspace::device_rgb();

    let mut images = Vec::with_capacity(page_count as usize);
    for index in 0..page_count {
        let page = doc
            .load_page(index)
            .map_err(|e| ExtractError::Rasterization(format!("failed to load page {}: {}", index, e)))?;

        let pixmap = page
            .to_pixmap(&matrix, &colorspace, true, true)
            .map_err(|e| ExtractError::Rasterization(format!("failed to render page {}: {}", index, e)))?;

        images.push(encode_pixmap_png(&pixmap)?);
    }

    Ok(images)
}

/// Encode a MuPDF pixmap as PNG bytes.
fn encode_pixmap_png(pixmap: &mupdf::Pixmap) -> Result<Vec<u8>, ExtractError> {
    let width = pixmap.width() as u32;
    let height = pixmap.height() as u32;
    let samples = pixmap.samples();
    let n = pixmap.n() as usize;

    // Convert to RGBA buffer
    let mut rgba_buffer = Vec::with_capacity((width * height * 4) as usize);

    for y in 0..height as usize {
        for x in 0..width as usize {
            let offset = (y * width as usize + x) * n;
            let r = samples.get(offset).copied().unwrap_or(0);
            let g = samples.get(offset + 1).copied().unwrap_or(0);
            let b = samples.get(offset + 2).copied().unwrap_or(0);
            let a = if n >= 4 {
                samples.get(offset + 3).copied().unwrap_or(255)
            } else {
                255
            };
            rgba_buffer.extend_from_slice(&[r, g, b, a]);
        }
    }

    let img = image::RgbaImage::from_raw(width, height, rgba_buffer)
        .ok_or_else(|| ExtractError::Rasterization("failed to create image buffer".to_string()))?;

    let mut output = Vec::new();
    DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut output), image::ImageFormat::Png)
        .map_err(|e| ExtractError::Rasterization(e.to_string()))?;

    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rasterize_rejects_non_pdf_bytes() {
        let result = rasterize_pages(b"this is not a pdf", 2.0);
        assert!(matches!(result, Err(ExtractError::Rasterization(_))));
    }
}
