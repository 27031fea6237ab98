//! Invoice field extraction module.

mod gate;
mod parser;
pub mod rules;

pub use gate::FormatGate;
pub use parser::{
    assemble_record, ExtractionResult, HeaderFields, InvoiceParser, TemplateInvoiceParser,
};

use crate::error::ExtractionError;

/// Result type for extraction operations.
pub type Result<T> = std::result::Result<T, ExtractionError>;
