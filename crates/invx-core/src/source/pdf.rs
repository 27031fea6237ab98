//! Embedded text of text-based PDFs using lopdf and pdf-extract.

use std::fs;
use std::path::Path;

use lopdf::Document;
use tracing::debug;

use super::{OcrSource, Result};
use crate::error::SourceError;

/// Extracts the embedded text layer of a PDF.
///
/// Scanned PDFs have no text layer and yield [`SourceError::Empty`]; those
/// need the remote OCR service.
#[derive(Debug, Default, Clone, Copy)]
pub struct PdfTextSource;

impl PdfTextSource {
    pub fn new() -> Self {
        Self
    }

    /// Extract text from PDF bytes.
    pub fn extract_text(&self, data: &[u8]) -> Result<String> {
        let mut doc = Document::load_mem(data).map_err(|e| SourceError::Pdf(e.to_string()))?;

        // PDFs encrypted with an empty user password are common for invoices
        let raw = if doc.is_encrypted() {
            if doc.decrypt("").is_err() {
                return Err(SourceError::Encrypted);
            }
            debug!("Decrypted PDF with empty password");

            let mut decrypted = Vec::new();
            doc.save_to(&mut decrypted)
                .map_err(|e| SourceError::Pdf(format!("failed to save decrypted PDF: {}", e)))?;
            decrypted
        } else {
            data.to_vec()
        };

        let page_count = doc.get_pages().len();
        if page_count == 0 {
            return Err(SourceError::Pdf("PDF has no pages".to_string()));
        }

        let text = pdf_extract::extract_text_from_mem(&raw)
            .map_err(|e| SourceError::Pdf(e.to_string()))?;

        debug!("PDF: {} pages, {} chars of text", page_count, text.len());
        Ok(text)
    }
}

impl OcrSource for PdfTextSource {
    fn recognize(&self, path: &Path) -> Result<String> {
        let data = fs::read(path)?;
        let text = self.extract_text(&data)?;

        if text.trim().is_empty() {
            return Err(SourceError::Empty);
        }

        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_non_pdf() {
        let source = PdfTextSource::new();
        assert!(matches!(
            source.extract_text(b"definitely not a pdf"),
            Err(SourceError::Pdf(_))
        ));
    }
}
