//! Regex patterns for the carrier invoice template.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Line-items table boundaries
    pub static ref TABLE_HEADER: Regex = Regex::new(
        r"(?i)Description\s+Quantity\s+Rate\s+Amount"
    ).unwrap();

    pub static ref TABLE_FOOTER: Regex = Regex::new(
        r"(?i)(invoice\s+no|total\s+usd|remit|balance|questions|make\s+payments|page\s+\d+\s+of\s+\d+)"
    ).unwrap();

    // Vendor identity
    pub static ref VENDOR_NAME: Regex = Regex::new(
        r"Please make payments to:\s*([A-Za-z\s,]+Ltd\.)"
    ).unwrap();

    pub static ref VENDOR_ADDRESS: Regex = Regex::new(
        r"[A-Za-z\s,]+[A-Z]{2}\s+\d{5}-\d{4}\s+PO\s+Box\s+\d+"
    ).unwrap();

    // Invoice number follows the label and the two header dates
    pub static ref INVOICE_NUMBER: Regex = Regex::new(
        r"Invoice No\.\s*(?:\d{2}/\d{2}/\d{2}\s+){2}(\d+)"
    ).unwrap();

    pub static ref DATE_MDY: Regex = Regex::new(
        r"\b(\d{2}/\d{2}/\d{2})\b"
    ).unwrap();

    pub static ref TOTAL_USD: Regex = Regex::new(
        r"Total USD\s*\$([\d,]+\.\d{2})"
    ).unwrap();

    // Row cell patterns (currency style: 1,234.56)
    pub static ref LEADING_NUMBER: Regex = Regex::new(
        r"^(\d{1,3}(?:,\d{3})*(?:\.\d{2})?)\s+(.*[A-Za-z].*)$"
    ).unwrap();

    pub static ref TRAILING_NUMBER: Regex = Regex::new(
        r"^(.*[^\d.,\s\-])?\s*(\d{1,3}(?:,\d{3})*(?:\.\d{2})?)$"
    ).unwrap();

    pub static ref WHOLE_NUMBER: Regex = Regex::new(
        r"^-?\$?\d[\d,]*(?:\.\d+)?%?$"
    ).unwrap();

    // Loose number token used by the number-scan tokenizer
    pub static ref NUMBER_TOKEN: Regex = Regex::new(
        r"-?\d{1,3}(?:,\d{3})*(?:\.\d+)?"
    ).unwrap();
}

/// Label preceding the line that holds the invoice dates and number.
pub const INVOICE_NO_LABEL: &str = "Invoice No.";
