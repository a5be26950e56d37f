//! PDF serialization of typeset pages
//!
//! Translates the layout module's positioned lines into printpdf draw
//! operations, one op list per page, and saves the assembled document.
//! All text is set in the builtin Helvetica so no font file needs embedding.

use printpdf::{
    BuiltinFont, Mm, Op, PdfDocument, PdfPage, PdfSaveOptions, PdfWarnMsg, Point, Pt, TextItem,
};

use super::layout::{Page, FONT_SIZE_PT, MARGIN_PT};
use super::TypesetError;

/// A4 in printpdf's Mm units.
const PAGE_WIDTH_MM: f32 = 210.0;
const PAGE_HEIGHT_MM: f32 = 297.0;

/// Serialize typeset pages into PDF bytes.
pub fn serialize(pages: &[Page], title: &str) -> Result<Vec<u8>, TypesetError> {
    let mut doc = PdfDocument::new(title);

    let pdf_pages: Vec<PdfPage> = pages
        .iter()
        .map(|page| {
            let mut ops: Vec<Op> = Vec::new();

            for line in &page.lines {
                // Blank lines only advance the cursor; nothing to draw
                if line.content.is_empty() {
                    continue;
                }

                ops.push(Op::StartTextSection);
                ops.push(Op::SetTextCursor {
                    pos: Point {
                        x: Pt(MARGIN_PT),
                        y: Pt(line.y),
                    },
                });
                ops.push(Op::SetFontSizeBuiltinFont {
                    size: Pt(FONT_SIZE_PT),
                    font: BuiltinFont::Helvetica,
                });
                ops.push(Op::WriteTextBuiltinFont {
                    items: vec![TextItem::Text(line.content.clone())],
                    font: BuiltinFont::Helvetica,
                });
                ops.push(Op::EndTextSection);
            }

            PdfPage::new(Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), ops)
        })
        .collect();

    doc.with_pages(pdf_pages);

    let mut warnings: Vec<PdfWarnMsg> = Vec::new();
    let output = doc.save(&PdfSaveOptions::default(), &mut warnings);

    if !output.starts_with(b"%PDF") {
        return Err(TypesetError::Serialization(
            "encoder produced an invalid document".to_string(),
        ));
    }

    tracing::debug!(pages = pages.len(), bytes = output.len(), "Serialized PDF");
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::typeset::layout::{layout, TypesetLine};

    #[test]
    fn test_serialize_empty_page_set() {
        let pages = layout("");
        let bytes = serialize(&pages, "empty").unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn test_serialize_multi_page_document() {
        let text = (0..200).map(|i| format!("row {}", i)).collect::<Vec<_>>().join("\n");
        let pages = layout(&text);
        assert!(pages.len() > 1);

        let bytes = serialize(&pages, "multi").unwrap();
        assert!(bytes.starts_with(b"%PDF"));
        assert!(!bytes.is_empty());
    }

    #[test]
    fn test_blank_lines_emit_no_draw_ops() {
        let page = Page {
            lines: vec![TypesetLine {
                content: String::new(),
                y: 700.0,
            }],
        };
        // A page of blank lines serializes like an empty page
        let bytes = serialize(&[page], "blanks").unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }
}
