//! Core library for carrier invoice extraction from OCR text.
//!
//! This crate provides:
//! - Line-items table reconstruction (region detection, line coalescing,
//!   row tokenization) for OCR text that lost its column layout
//! - Header field extraction (vendor, bill-to, invoice number, date, total)
//! - The invoice record model and pipeline configuration
//! - Local OCR text sources (text dumps, saved OCR responses, PDF text)

pub mod error;
pub mod invoice;
pub mod models;
pub mod source;
pub mod table;

pub use error::{ExtractionError, InvxError, Result, SourceError};
pub use invoice::{ExtractionResult, FormatGate, InvoiceParser, TemplateInvoiceParser};
pub use models::config::{InvxConfig, TokenizerKind};
pub use models::record::{InvoiceRecord, LineItem, RowFields};
pub use source::{DocumentKind, LocalSource, OcrResponse, OcrSource, TextFileSource};
#[cfg(feature = "pdf")]
pub use source::PdfTextSource;
pub use table::{ChunkTokenizer, LineCoalescer, NumberScanTokenizer, RowTokenizer};
