//! Deterministic text-to-PDF typesetting
//!
//! Lays out an arbitrary text string as fixed-size A4 pages with greedy
//! line-wrapping and automatic page breaks, then serializes the pages to a
//! PDF with an embedded standard font.

mod layout;
mod pdf;

use thiserror::Error;

pub use layout::{layout, Page, TypesetLine};
pub use pdf::serialize;

/// Typesetting error types
#[derive(Error, Debug)]
pub enum TypesetError {
    #[error("PDF serialization failed: {0}")]
    Serialization(String),
}

/// Header block prepended to every reconstructed document.
pub fn document_header(original_name: &str, processed_at: &str) -> String {
    format!(
        "Reconstructed document: {}\nDate: {}\nProcessed by: Mistral OCR\n\n{}\n\n",
        original_name,
        processed_at,
        "=".repeat(80)
    )
}

/// Typeset `text` (prefixed with the standard header) into PDF bytes.
///
/// Never fails on pathological input length; the only failure mode is the
/// byte-format encoder rejecting the page set.
pub fn render(text: &str, original_name: &str) -> Result<Vec<u8>, TypesetError> {
    let header = document_header(
        original_name,
        &chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC").to_string(),
    );
    let full_text = format!("{}{}", header, text);

    let pages = layout(&full_text);
    serialize(&pages, original_name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_produces_pdf_bytes() {
        let bytes = render("Hello world", "facture.pdf").unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn test_header_names_source_file() {
        let header = document_header("facture.pdf", "2026-01-01 00:00:00 UTC");
        assert!(header.contains("facture.pdf"));
        assert!(header.contains("2026-01-01"));
        assert!(header.contains(&"=".repeat(80)));
    }
}
