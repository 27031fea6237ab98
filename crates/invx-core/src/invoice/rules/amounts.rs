//! Invoice total extraction.

use rust_decimal::Decimal;
use std::str::FromStr;

use super::patterns::TOTAL_USD;
use super::{ExtractionMatch, FieldExtractor};

/// Extracts the `Total USD $` amount.
pub struct TotalExtractor;

impl TotalExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for TotalExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for TotalExtractor {
    type Output = ExtractionMatch<Decimal>;

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        let mut results = Vec::new();

        for caps in TOTAL_USD.captures_iter(text) {
            let Some(full_match) = caps.get(0) else {
                continue;
            };
            if let Some(amount) = parse_usd_amount(&caps[1]) {
                results.push(
                    ExtractionMatch::new(amount, full_match.as_str())
                        .with_position(full_match.start(), full_match.end()),
                );
            }
        }

        results
    }
}

/// Parse a US-formatted amount (e.g., "1,234.56", "$10.00").
///
/// Returns `None` for anything that is not a plain number once the
/// currency sign and thousands separators are removed.
pub fn parse_usd_amount(s: &str) -> Option<Decimal> {
    let cleaned: String = s
        .trim()
        .trim_start_matches('$')
        .chars()
        .filter(|c| *c != ',')
        .collect();

    if cleaned.is_empty() {
        return None;
    }

    Decimal::from_str(&cleaned).ok()
}
