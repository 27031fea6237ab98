//! Text dumps and saved OCR responses.

use std::fs;
use std::path::Path;

use tracing::debug;

use super::{DocumentKind, OcrResponse, OcrSource, Result};
use crate::error::SourceError;

/// Reads `.txt` files verbatim and the `ocr_text` field of `.json` responses.
#[derive(Debug, Default, Clone, Copy)]
pub struct TextFileSource;

impl TextFileSource {
    pub fn new() -> Self {
        Self
    }

    /// Pull the OCR text out of a service response body.
    pub fn parse_response(body: &str) -> Result<String> {
        let response: OcrResponse = serde_json::from_str(body)
            .map_err(|e| SourceError::InvalidResponse(e.to_string()))?;
        Ok(response.ocr_text)
    }
}

impl OcrSource for TextFileSource {
    fn recognize(&self, path: &Path) -> Result<String> {
        let content = fs::read_to_string(path)?;

        let text = match DocumentKind::from_path(path) {
            Some(DocumentKind::OcrResponse) => Self::parse_response(&content)?,
            Some(DocumentKind::Text) => content,
            _ => return Err(SourceError::Unsupported(path.display().to_string())),
        };

        if text.trim().is_empty() {
            return Err(SourceError::Empty);
        }

        debug!("read {} chars of OCR text from {}", text.len(), path.display());
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reads_text_dump() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("invoice.txt");
        fs::write(&path, "switch\tInvoice\n").unwrap();

        assert_eq!(TextFileSource::new().recognize(&path).unwrap(), "switch\tInvoice\n");
    }

    #[test]
    fn test_reads_response_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("invoice.json");
        fs::write(&path, r#"{"id": 7, "ocr_text": "Invoice\nDescription"}"#).unwrap();

        assert_eq!(
            TextFileSource::new().recognize(&path).unwrap(),
            "Invoice\nDescription"
        );
    }

    #[test]
    fn test_empty_text_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("blank.json");
        fs::write(&path, r#"{"ocr_text": "  "}"#).unwrap();

        assert!(matches!(
            TextFileSource::new().recognize(&path),
            Err(SourceError::Empty)
        ));
    }

    #[test]
    fn test_malformed_response() {
        assert!(matches!(
            TextFileSource::parse_response("not json"),
            Err(SourceError::InvalidResponse(_))
        ));
    }
}
