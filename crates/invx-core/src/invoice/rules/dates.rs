//! Invoice date extraction.
//!
//! The template prints dates as `MM/DD/YY`. The first such token in the
//! document is the invoice date; it is kept exactly as printed.

use chrono::NaiveDate;

use super::patterns::DATE_MDY;
use super::{ExtractionMatch, FieldExtractor};

/// Date field extractor.
pub struct DateExtractor;

impl DateExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for DateExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for DateExtractor {
    type Output = ExtractionMatch<String>;

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        DATE_MDY
            .find_iter(text)
            .map(|m| ExtractionMatch::new(m.as_str().to_string(), m.as_str()).with_position(m.start(), m.end()))
            .collect()
    }
}

/// Interpret a printed `MM/DD/YY` date (chrono's `%y` century pivot).
pub fn parse_invoice_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s, "%m/%d/%y").ok()
}
