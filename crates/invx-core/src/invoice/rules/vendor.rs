//! Vendor and bill-to party extraction.

use super::patterns::{INVOICE_NO_LABEL, VENDOR_ADDRESS, VENDOR_NAME};
use super::{ExtractionMatch, FieldExtractor};

/// Extracts the vendor legal name from the remittance instructions.
pub struct VendorNameExtractor;

impl VendorNameExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for VendorNameExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for VendorNameExtractor {
    type Output = ExtractionMatch<String>;

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        VENDOR_NAME
            .captures_iter(text)
            .filter_map(|caps| {
                let name = caps.get(1)?;
                Some(
                    ExtractionMatch::new(name.as_str().trim().to_string(), name.as_str())
                        .with_position(name.start(), name.end()),
                )
            })
            .collect()
    }
}

/// Extract the remittance address (city, state, ZIP+4, PO box).
///
/// The address pattern tends to swallow the neighbouring `Invoice` title and
/// the vendor token, so both are removed before whitespace is normalized.
pub fn extract_vendor_address(text: &str, vendor_token: &str) -> Option<String> {
    let m = VENDOR_ADDRESS.find(text)?;

    let mut address = m.as_str().replace("Invoice", "");
    if !vendor_token.is_empty() {
        address = address.replace(vendor_token, "");
    }

    let address = address.split_whitespace().collect::<Vec<_>>().join(" ");
    if address.is_empty() {
        None
    } else {
        Some(address)
    }
}

/// Extract the bill-to name: the first non-blank line at least two lines
/// below the `Invoice No.` label (the line in between holds the dates).
pub fn extract_bill_to(text: &str) -> Option<String> {
    let lines: Vec<&str> = text.lines().collect();
    let label = lines.iter().position(|l| l.contains(INVOICE_NO_LABEL))?;

    lines
        .iter()
        .skip(label + 2)
        .map(|l| l.trim())
        .find(|l| !l.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_vendor_name() {
        let extractor = VendorNameExtractor::new();
        let text = "Questions?\nPlease make payments to:\nSwitch, Ltd.\nPO Box 1";

        assert_eq!(extractor.extract(text).unwrap().value, "Switch, Ltd.");
        assert!(extractor.extract("Please make payments to: ACME Inc.").is_none());
    }

    #[test]
    fn test_vendor_address_strips_leaked_tokens() {
        let text = "Invoice\nswitch\nLas Vegas, NV 89193-4592\nPO Box 400850\nDate";

        assert_eq!(
            extract_vendor_address(text, "switch"),
            Some("Las Vegas, NV 89193-4592 PO Box 400850".to_string())
        );
    }

    #[test]
    fn test_vendor_address_absent() {
        assert_eq!(extract_vendor_address("Las Vegas, NV 89193", "switch"), None);
    }

    #[test]
    fn test_bill_to_skips_date_line() {
        let text = "Date\tDue Date\tInvoice No.\n03/01/24\t03/31/24\t418822\n\n  Acme Networks LLC  \nAttn: AP";

        assert_eq!(extract_bill_to(text), Some("Acme Networks LLC".to_string()));
    }

    #[test]
    fn test_bill_to_absent() {
        assert_eq!(extract_bill_to("Invoice No.\n03/01/24"), None);
        assert_eq!(extract_bill_to("no label"), None);
    }
}
