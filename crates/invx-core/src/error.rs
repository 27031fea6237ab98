//! Error types for the invx-core library.

use thiserror::Error;

/// Main error type for the invx library.
#[derive(Error, Debug)]
pub enum InvxError {
    /// OCR text source error.
    #[error("source error: {0}")]
    Source(#[from] SourceError),

    /// Invoice extraction error.
    #[error("extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors raised while obtaining OCR text for a document.
#[derive(Error, Debug)]
pub enum SourceError {
    /// The document type is not handled by this source.
    #[error("unsupported document type: {0}")]
    Unsupported(String),

    /// A saved OCR response could not be decoded.
    #[error("invalid OCR response: {0}")]
    InvalidResponse(String),

    /// Failed to open/parse the PDF file.
    #[error("failed to parse PDF: {0}")]
    Pdf(String),

    /// The PDF is encrypted and cannot be processed.
    #[error("PDF is encrypted")]
    Encrypted,

    /// The source produced no text at all.
    #[error("no text recognized")]
    Empty,

    /// I/O error while reading the document.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors related to invoice field extraction.
#[derive(Error, Debug)]
pub enum ExtractionError {
    /// Required field is missing.
    #[error("missing required field: {0}")]
    MissingField(String),

    /// A configured pattern failed to compile.
    #[error("invalid pattern for {field}: {reason}")]
    Pattern { field: String, reason: String },
}

/// Result type for the invx library.
pub type Result<T> = std::result::Result<T, InvxError>;
