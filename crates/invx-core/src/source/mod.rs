//! OCR text sources: where a document's raw text comes from.
//!
//! The parser only ever sees a string. Sources turn a document on disk into
//! that string: plain-text dumps and saved OCR service responses are read
//! directly, text-based PDFs have their embedded text extracted. Images need
//! a remote OCR service, which lives outside the core.

#[cfg(feature = "pdf")]
mod pdf;
mod text;

#[cfg(feature = "pdf")]
pub use pdf::PdfTextSource;
pub use text::TextFileSource;

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::SourceError;

/// Result type for source operations.
pub type Result<T> = std::result::Result<T, SourceError>;

/// File extensions accepted as documents.
pub const DOCUMENT_EXTENSIONS: &[&str] = &["txt", "json", "pdf", "jpg", "jpeg", "png"];

/// Trait for OCR text sources.
pub trait OcrSource {
    /// Produce the raw OCR text of a document.
    fn recognize(&self, path: &Path) -> Result<String>;
}

/// Kind of document, by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    /// Plain OCR text dump.
    Text,
    /// Saved OCR service JSON response.
    OcrResponse,
    /// PDF document.
    Pdf,
    /// Raster image.
    Image,
}

impl DocumentKind {
    /// Classify a path by its (case-insensitive) extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_lowercase();
        match ext.as_str() {
            "txt" => Some(Self::Text),
            "json" => Some(Self::OcrResponse),
            "pdf" => Some(Self::Pdf),
            "jpg" | "jpeg" | "png" => Some(Self::Image),
            _ => None,
        }
    }
}

/// The part of an OCR service response the pipeline uses.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OcrResponse {
    /// Layout-flattened recognized text.
    #[serde(default)]
    pub ocr_text: String,
}

/// Local source: text dumps, saved responses, and text-based PDFs.
#[derive(Debug, Default)]
pub struct LocalSource {
    text: TextFileSource,
    #[cfg(feature = "pdf")]
    pdf: PdfTextSource,
}

impl LocalSource {
    pub fn new() -> Self {
        Self::default()
    }
}

impl OcrSource for LocalSource {
    fn recognize(&self, path: &Path) -> Result<String> {
        match DocumentKind::from_path(path) {
            Some(DocumentKind::Text | DocumentKind::OcrResponse) => self.text.recognize(path),
            #[cfg(feature = "pdf")]
            Some(DocumentKind::Pdf) => self.pdf.recognize(path),
            _ => Err(SourceError::Unsupported(path.display().to_string())),
        }
    }
}
