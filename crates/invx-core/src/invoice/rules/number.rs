//! Invoice number extraction.

use super::patterns::INVOICE_NUMBER;
use super::{ExtractionMatch, FieldExtractor};

/// Extracts the numeric invoice number printed after the `Invoice No.`
/// label and the two header dates.
pub struct InvoiceNumberExtractor;

impl InvoiceNumberExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for InvoiceNumberExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for InvoiceNumberExtractor {
    type Output = ExtractionMatch<String>;

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        INVOICE_NUMBER
            .captures_iter(text)
            .filter_map(|caps| {
                let full_match = caps.get(0)?;
                Some(
                    ExtractionMatch::new(caps[1].to_string(), full_match.as_str())
                        .with_position(full_match.start(), full_match.end()),
                )
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_invoice_number() {
        let extractor = InvoiceNumberExtractor::new();
        let text = "Date Due Date Invoice No.\n03/01/24 03/31/24 418822\nAcme";
        assert_eq!(extractor.extract(text).unwrap().value, "418822");

        let text = "Invoice No. 03/01/24\t03/31/24\t418822\nAcme";
        assert_eq!(extractor.extract(text).unwrap().value, "418822");
    }

    #[test]
    fn test_requires_both_dates() {
        let extractor = InvoiceNumberExtractor::new();
        assert!(extractor.extract("Invoice No. 03/01/24 418822").is_none());
    }
}
