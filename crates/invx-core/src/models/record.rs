//! Invoice record produced for one OCR document.
//!
//! Keys serialize exactly as downstream reviewers expect them
//! (`"vendor name"`, `"line item"`, ...). Optional header fields serialize
//! as `null` rather than being omitted.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::invoice::rules::parse_usd_amount;

/// A complete extracted invoice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvoiceRecord {
    /// Vendor legal name (required).
    #[serde(rename = "vendor name")]
    pub vendor_name: String,

    /// Vendor remittance address.
    #[serde(rename = "vendor address")]
    pub vendor_address: Option<String>,

    /// Name of the billed party.
    #[serde(rename = "bill to name")]
    pub bill_to_name: Option<String>,

    /// Invoice number as printed.
    #[serde(rename = "invoice number")]
    pub invoice_number: Option<String>,

    /// Invoice date as printed (MM/DD/YY).
    pub date: Option<String>,

    /// Table rows, in document order.
    #[serde(rename = "line item")]
    pub line_items: Vec<LineItem>,
}

/// One row of the line-items table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    /// 1-based position in the table.
    pub sku: usize,

    /// Row description.
    pub description: String,

    /// Quantity column, as printed.
    pub quantity: String,

    /// Rate column, as printed.
    pub tax_rate: String,

    /// Amount column, as printed.
    pub price: String,

    /// Invoice-level total. The template has no per-row total, so every
    /// row carries the same value.
    #[serde(with = "rust_decimal::serde::float")]
    pub total: Decimal,
}

/// Fixed-arity fields of one tokenized table row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RowFields {
    pub description: String,
    pub quantity: String,
    pub rate: String,
    pub amount: String,
}

impl RowFields {
    /// Build from a description and up to three data fields; missing data
    /// fields become empty strings.
    pub fn from_parts(description: impl Into<String>, data: &[String]) -> Self {
        let field = |i: usize| data.get(i).cloned().unwrap_or_default();
        Self {
            description: description.into(),
            quantity: field(0),
            rate: field(1),
            amount: field(2),
        }
    }
}

impl InvoiceRecord {
    /// The invoice total, taken from the first line item.
    pub fn total(&self) -> Option<Decimal> {
        self.line_items.first().map(|item| item.total)
    }

    /// Check the record for things a reviewer should look at.
    pub fn validate(&self) -> Vec<String> {
        let mut issues = Vec::new();

        if self.invoice_number.is_none() {
            issues.push("Missing invoice number".to_string());
        }

        if self.date.is_none() {
            issues.push("Missing invoice date".to_string());
        }

        if self.bill_to_name.is_none() {
            issues.push("Missing bill-to name".to_string());
        }

        if self.vendor_address.is_none() {
            issues.push("Missing vendor address".to_string());
        }

        if self.line_items.is_empty() {
            issues.push("No line items".to_string());
        }

        for item in &self.line_items {
            if item.description.is_empty() {
                issues.push(format!("Line item {} has no description", item.sku));
            }
        }

        // Row amounts should add up to the invoice total when every row has one
        if let Some(total) = self.total() {
            let amounts: Vec<Decimal> = self
                .line_items
                .iter()
                .filter_map(|item| parse_usd_amount(&item.price))
                .collect();

            if amounts.len() == self.line_items.len() {
                let sum: Decimal = amounts.iter().sum();
                if (sum - total).abs() > Decimal::new(1, 2) {
                    issues.push(format!(
                        "Line item amounts ({}) differ from invoice total ({})",
                        sum, total
                    ));
                }
            }
        }

        issues
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn item(sku: usize, price: &str, total: &str) -> LineItem {
        LineItem {
            sku,
            description: "Carrier Access Fee".to_string(),
            quantity: "1".to_string(),
            tax_rate: "10.00".to_string(),
            price: price.to_string(),
            total: Decimal::from_str(total).unwrap(),
        }
    }

    fn record(items: Vec<LineItem>) -> InvoiceRecord {
        InvoiceRecord {
            vendor_name: "Switch, Ltd.".to_string(),
            vendor_address: None,
            bill_to_name: Some("Acme Corp".to_string()),
            invoice_number: Some("12345".to_string()),
            date: Some("01/15/24".to_string()),
            line_items: items,
        }
    }

    #[test]
    fn test_serialized_keys() {
        let json = serde_json::to_value(record(vec![item(1, "10.00", "10.00")])).unwrap();

        assert_eq!(json["vendor name"], "Switch, Ltd.");
        assert!(json["vendor address"].is_null());
        assert_eq!(json["line item"][0]["sku"], 1);
        assert_eq!(json["line item"][0]["tax_rate"], "10.00");
        assert_eq!(json["line item"][0]["total"], 10.0);
    }

    #[test]
    fn test_row_fields_padding() {
        let fields = RowFields::from_parts("Item", &["1".to_string()]);
        assert_eq!(fields.description, "Item");
        assert_eq!(fields.quantity, "1");
        assert_eq!(fields.rate, "");
        assert_eq!(fields.amount, "");
    }

    #[test]
    fn test_validate_amount_mismatch() {
        let rec = record(vec![item(1, "10.00", "25.00"), item(2, "5.00", "25.00")]);
        let issues = rec.validate();

        assert!(issues.iter().any(|i| i.contains("differ from invoice total")));
        assert!(issues.iter().any(|i| i.contains("vendor address")));
    }

    #[test]
    fn test_validate_matching_amounts() {
        let rec = record(vec![item(1, "1,000.00", "1500.00"), item(2, "500.00", "1500.00")]);
        let issues = rec.validate();

        assert!(!issues.iter().any(|i| i.contains("differ")));
    }
}
