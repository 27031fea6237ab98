//! Template parser for carrier invoices: header rules plus table reconstruction.

use std::path::Path;
use std::time::Instant;

use rust_decimal::Decimal;
use tracing::{debug, info, warn};

use crate::error::ExtractionError;
use crate::models::config::InvxConfig;
use crate::models::record::{InvoiceRecord, LineItem, RowFields};
use crate::source::OcrSource;
use crate::table::{extract_table_lines, tokenizer_for, ChunkTokenizer, LineCoalescer, RowTokenizer};

use super::gate::FormatGate;
use super::rules::{
    extract_bill_to, extract_vendor_address, parse_invoice_date, DateExtractor, FieldExtractor,
    InvoiceNumberExtractor, TotalExtractor, VendorNameExtractor,
};
use super::Result;

/// Result of invoice extraction.
#[derive(Debug, Clone)]
pub struct ExtractionResult {
    /// Extracted invoice record.
    pub record: InvoiceRecord,
    /// Invoice total, also available when the table has no rows.
    pub total: Decimal,
    /// Extraction warnings (fields not found, ambiguous matches).
    pub warnings: Vec<String>,
    /// Processing time in milliseconds.
    pub processing_time_ms: u64,
}

/// Trait for invoice parsing.
pub trait InvoiceParser {
    /// Parse invoice from OCR text.
    ///
    /// Returns `Ok(None)` when the document does not use the supported
    /// template, and an error when a required field is missing.
    fn parse(&self, text: &str) -> Result<Option<ExtractionResult>>;

    /// Read a document through `source` and parse its text.
    fn parse_file(
        &self,
        source: &dyn OcrSource,
        path: &Path,
    ) -> crate::Result<Option<ExtractionResult>> {
        let text = source.recognize(path)?;
        Ok(self.parse(&text)?)
    }
}

/// Header fields found outside the line-items table.
#[derive(Debug, Clone, PartialEq)]
pub struct HeaderFields {
    pub vendor_name: String,
    pub vendor_address: Option<String>,
    pub bill_to_name: Option<String>,
    pub invoice_number: Option<String>,
    pub date: Option<String>,
    pub total: Decimal,
}

/// Parser for the single supported carrier invoice layout.
pub struct TemplateInvoiceParser {
    gate: FormatGate,
    vendor_token: String,
    coalescer: LineCoalescer,
    tokenizer: Box<dyn RowTokenizer>,
    check_date: bool,
}

impl TemplateInvoiceParser {
    /// Create a parser with the default template settings.
    pub fn new() -> Self {
        let template = crate::models::config::TemplateConfig::default();
        Self {
            gate: FormatGate::new(
                std::iter::once(template.vendor_token.clone()).chain(template.gate_tokens),
            ),
            vendor_token: template.vendor_token,
            coalescer: LineCoalescer::new(template.row_keywords),
            tokenizer: Box::new(ChunkTokenizer::default()),
            check_date: true,
        }
    }

    /// Create a parser from configuration.
    pub fn from_config(config: &InvxConfig) -> std::result::Result<Self, ExtractionError> {
        let template = &config.template;
        Ok(Self {
            gate: FormatGate::new(
                std::iter::once(template.vendor_token.clone())
                    .chain(template.gate_tokens.iter().cloned()),
            ),
            vendor_token: template.vendor_token.clone(),
            coalescer: LineCoalescer::new(template.row_keywords.iter().cloned()),
            tokenizer: tokenizer_for(config.extraction.tokenizer, &template.column_gap)?,
            check_date: config.extraction.check_date,
        })
    }

    /// Set the row tokenization strategy.
    pub fn with_tokenizer(mut self, tokenizer: Box<dyn RowTokenizer>) -> Self {
        self.tokenizer = tokenizer;
        self
    }

    /// Whether the text uses the supported template.
    pub fn accepts(&self, text: &str) -> bool {
        self.gate.accepts(text)
    }

    /// Extract header fields. Vendor name and total are required.
    pub fn extract_header(&self, text: &str, warnings: &mut Vec<String>) -> Result<HeaderFields> {
        let vendor_name = first_of(&VendorNameExtractor::new(), text, "vendor name", warnings)
            .ok_or_else(|| ExtractionError::MissingField("vendor name".to_string()))?;

        let total = first_of(&TotalExtractor::new(), text, "total amount", warnings)
            .ok_or_else(|| ExtractionError::MissingField("total amount".to_string()))?;

        let vendor_address = extract_vendor_address(text, &self.vendor_token);
        if vendor_address.is_none() {
            warnings.push("Could not extract vendor address".to_string());
        }

        let bill_to_name = extract_bill_to(text);
        if bill_to_name.is_none() {
            warnings.push("Could not extract bill-to name".to_string());
        }

        let invoice_number = InvoiceNumberExtractor::new().extract(text).map(|m| m.value);
        if invoice_number.is_none() {
            warnings.push("Could not extract invoice number".to_string());
        }

        let date = DateExtractor::new().extract(text).map(|m| m.value);
        match &date {
            None => warnings.push("Could not extract invoice date".to_string()),
            Some(d) if self.check_date && parse_invoice_date(d).is_none() => {
                warnings.push(format!("Invoice date {} is not a valid MM/DD/YY date", d));
            }
            Some(_) => {}
        }

        Ok(HeaderFields {
            vendor_name,
            vendor_address,
            bill_to_name,
            invoice_number,
            date,
            total,
        })
    }

    /// Reconstruct and tokenize the line-items table.
    ///
    /// Tokenizer repairs are added to `warnings`, prefixed with the row number.
    pub fn extract_rows(&self, text: &str, warnings: &mut Vec<String>) -> Vec<RowFields> {
        let table_lines = extract_table_lines(text);
        debug!("table regions yielded {} lines", table_lines.len());

        let rows = self.coalescer.coalesce(&table_lines);

        rows.iter()
            .enumerate()
            .map(|(i, row)| {
                let mut notes = Vec::new();
                let fields = self.tokenizer.tokenize(row, &mut notes);
                warnings.extend(notes.into_iter().map(|n| format!("Row {}: {}", i + 1, n)));
                fields
            })
            .collect()
    }
}

impl Default for TemplateInvoiceParser {
    fn default() -> Self {
        Self::new()
    }
}

impl InvoiceParser for TemplateInvoiceParser {
    fn parse(&self, text: &str) -> Result<Option<ExtractionResult>> {
        let start = Instant::now();

        if !self.accepts(text) {
            info!(
                "document does not match template (missing {:?})",
                self.gate.missing(text)
            );
            return Ok(None);
        }

        info!("Parsing invoice from {} characters of text", text.len());

        let mut warnings = Vec::new();
        let header = self.extract_header(text, &mut warnings)?;

        let total = header.total;
        let rows = self.extract_rows(text, &mut warnings);
        if rows.is_empty() {
            warnings.push("Could not extract line items".to_string());
        }

        debug!(
            "tokenized {} rows with the {} strategy",
            rows.len(),
            self.tokenizer.name()
        );

        let record = assemble_record(header, rows);

        for warning in &warnings {
            debug!("{}", warning);
        }

        Ok(Some(ExtractionResult {
            record,
            total,
            warnings,
            processing_time_ms: start.elapsed().as_millis() as u64,
        }))
    }
}

/// Combine header fields and tokenized rows into the final record.
///
/// Rows are numbered from 1 in order, and each one carries the invoice total:
/// the template prints no per-row total.
pub fn assemble_record(header: HeaderFields, rows: Vec<RowFields>) -> InvoiceRecord {
    let line_items = rows
        .into_iter()
        .enumerate()
        .map(|(i, row)| LineItem {
            sku: i + 1,
            description: row.description,
            quantity: row.quantity,
            tax_rate: row.rate,
            price: row.amount,
            total: header.total,
        })
        .collect();

    InvoiceRecord {
        vendor_name: header.vendor_name,
        vendor_address: header.vendor_address,
        bill_to_name: header.bill_to_name,
        invoice_number: header.invoice_number,
        date: header.date,
        line_items,
    }
}

/// First match in document order, with a warning when later matches disagree.
fn first_of<E, T>(extractor: &E, text: &str, field: &str, warnings: &mut Vec<String>) -> Option<T>
where
    E: FieldExtractor<Output = super::rules::ExtractionMatch<T>>,
    T: PartialEq + std::fmt::Display,
{
    let mut matches = extractor.extract_all(text).into_iter();
    let first = matches.next()?;

    let conflicting = matches.filter(|m| m.value != first.value).count();
    if conflicting > 0 {
        warn!("{} conflicting {} matches, using {}", conflicting, field, first.value);
        warnings.push(format!(
            "Found {} conflicting {} values, using the first ({})",
            conflicting, field, first.value
        ));
    }

    Some(first.value)
}
