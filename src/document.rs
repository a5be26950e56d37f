//! Ingested document value type

/// An uploaded document as received from the multipart layer.
///
/// Created once at ingestion and read-only afterward; every later pipeline
/// stage works from this value or something derived from it.
#[derive(Debug, Clone)]
pub struct Document {
    /// Raw file bytes.
    pub bytes: Vec<u8>,
    /// Content type declared by the client (e.g. `application/pdf`).
    pub declared_content_type: String,
    /// Original filename as submitted, without any path components.
    pub original_name: String,
}

impl Document {
    pub fn new(
        bytes: Vec<u8>,
        declared_content_type: impl Into<String>,
        original_name: impl Into<String>,
    ) -> Self {
        // Strip any path the client smuggled into the filename
        let name = original_name.into();
        let name = name
            .rsplit(['/', '\\'])
            .next()
            .unwrap_or(&name)
            .to_string();

        Self {
            bytes,
            declared_content_type: declared_content_type.into(),
            original_name: name,
        }
    }

    pub fn size_bytes(&self) -> usize {
        self.bytes.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filename_is_stripped_of_path_components() {
        let doc = Document::new(vec![1, 2, 3], "application/pdf", "../../etc/facture.pdf");
        assert_eq!(doc.original_name, "facture.pdf");

        let doc = Document::new(vec![], "application/pdf", "C:\\scans\\facture.pdf");
        assert_eq!(doc.original_name, "facture.pdf");
    }

    #[test]
    fn test_size_bytes() {
        let doc = Document::new(vec![0u8; 42], "application/pdf", "a.pdf");
        assert_eq!(doc.size_bytes(), 42);
    }
}
