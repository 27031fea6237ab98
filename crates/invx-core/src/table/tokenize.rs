//! Splitting a coalesced table row into description, quantity, rate and amount.
//!
//! OCR column alignment is unreliable, so two strategies are provided:
//!
//! - [`ChunkTokenizer`] splits on column gaps and repairs values that OCR
//!   glued onto the wrong cell.
//! - [`NumberScanTokenizer`] ignores columns, pulls number tokens out of the
//!   row and treats the remaining text as the description.
//!
//! Both always produce exactly four fields.

use regex::Regex;
use tracing::trace;

use crate::error::ExtractionError;
use crate::invoice::rules::patterns::{LEADING_NUMBER, NUMBER_TOKEN, TRAILING_NUMBER, WHOLE_NUMBER};
use crate::models::config::TokenizerKind;
use crate::models::record::RowFields;

/// Default column gap: a run of tabs or of two or more spaces.
pub const DEFAULT_COLUMN_GAP: &str = r"\t+| {2,}";

/// Strategy for splitting a row into fields.
pub trait RowTokenizer: Send + Sync {
    /// Short strategy name, for logs.
    fn name(&self) -> &'static str;

    /// Split a coalesced row into fixed-arity fields, recording every
    /// repair made along the way in `notes`.
    fn tokenize(&self, row: &str, notes: &mut Vec<String>) -> RowFields;
}

/// Build the configured tokenizer.
pub fn tokenizer_for(
    kind: TokenizerKind,
    column_gap: &str,
) -> Result<Box<dyn RowTokenizer>, ExtractionError> {
    Ok(match kind {
        TokenizerKind::Chunks => Box::new(ChunkTokenizer::new(column_gap)?),
        TokenizerKind::NumberScan => Box::new(NumberScanTokenizer),
    })
}

/// Column-chunk tokenizer.
///
/// Per chunk, in order:
/// 1. a chunk after the first that starts with a number followed by text is
///    a floating value: the text joins the description and the number is
///    emitted as the last field of the row;
/// 2. a chunk that is a bare number is emitted as is;
/// 3. a chunk ending in a number is split into its text and the number;
/// 4. anything else is emitted verbatim.
#[derive(Debug, Clone)]
pub struct ChunkTokenizer {
    column_gap: Regex,
}

impl ChunkTokenizer {
    pub fn new(column_gap: &str) -> Result<Self, ExtractionError> {
        let column_gap = Regex::new(column_gap).map_err(|e| ExtractionError::Pattern {
            field: "column_gap".to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self { column_gap })
    }

    fn split_chunks<'a>(&self, row: &'a str) -> Vec<&'a str> {
        self.column_gap
            .split(row)
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .collect()
    }
}

impl Default for ChunkTokenizer {
    fn default() -> Self {
        Self {
            column_gap: Regex::new(DEFAULT_COLUMN_GAP).unwrap(),
        }
    }
}

impl RowTokenizer for ChunkTokenizer {
    fn name(&self) -> &'static str {
        "chunks"
    }

    fn tokenize(&self, row: &str, notes: &mut Vec<String>) -> RowFields {
        let chunks = self.split_chunks(row);
        let mut fields: Vec<String> = Vec::with_capacity(chunks.len() + 1);
        let mut floating: Option<String> = None;

        for (i, chunk) in chunks.iter().enumerate() {
            if i > 0 {
                if let Some(caps) = LEADING_NUMBER.captures(chunk) {
                    trace!("floating value {} in {:?}", &caps[1], chunk);
                    if let Some(description) = fields.first_mut() {
                        description.push(' ');
                        description.push_str(caps[2].trim());
                    }
                    floating = Some(caps[1].to_string());
                    continue;
                }
            }

            if WHOLE_NUMBER.is_match(chunk) {
                fields.push(chunk.to_string());
                continue;
            }

            match TRAILING_NUMBER.captures(chunk) {
                Some(caps) => {
                    if let Some(text) = caps.get(1).map(|m| m.as_str().trim()) {
                        if !text.is_empty() {
                            fields.push(text.to_string());
                        }
                    }
                    fields.push(caps[2].to_string());
                }
                None => fields.push(chunk.to_string()),
            }
        }

        if let Some(value) = floating {
            notes.push(format!("floating value {} moved to the last column", value));
            fields.push(value);
        }

        to_row_fields(fields, notes)
    }
}

/// Fold a variable number of fields into four.
///
/// Surplus leading fields belong to the description; the last three are the
/// data columns.
fn to_row_fields(mut fields: Vec<String>, notes: &mut Vec<String>) -> RowFields {
    if fields.len() > 4 {
        let data = fields.split_off(fields.len() - 3);
        notes.push(format!(
            "{} extra fields folded into the description",
            fields.len() - 1
        ));
        return RowFields::from_parts(fields.join(" "), &data);
    }

    let mut fields = fields.into_iter();
    let description = fields.next().unwrap_or_default();
    let data: Vec<String> = fields.collect();
    RowFields::from_parts(description, &data)
}

/// Title-and-numbers tokenizer.
///
/// Number tokens are removed from the row and the first three, in order,
/// become the data fields. The text before the first number is the title.
/// When the text between the first two numbers contains letters it is part
/// of the title too, and only unsigned numbers are kept. Text after the last
/// number is appended to the title.
#[derive(Debug, Clone, Copy, Default)]
pub struct NumberScanTokenizer;

impl RowTokenizer for NumberScanTokenizer {
    fn name(&self) -> &'static str {
        "number_scan"
    }

    fn tokenize(&self, row: &str, notes: &mut Vec<String>) -> RowFields {
        let matches: Vec<regex::Match<'_>> = NUMBER_TOKEN.find_iter(row).collect();
        let Some(first) = matches.first() else {
            return RowFields::from_parts(collapse_whitespace(row), &[]);
        };

        let mut title = vec![row[..first.start()].trim()];

        // Text between the first number and the next one (or the end)
        let second_part_end = matches.get(1).map_or(row.len(), |m| m.start());
        let second_part = row[first.end()..second_part_end].trim();
        let second_has_text = second_part.chars().any(char::is_alphabetic);

        let kept: Vec<(usize, &regex::Match<'_>)> = if second_has_text {
            title.push(second_part);
            matches
                .iter()
                .enumerate()
                .filter(|(_, m)| m.as_str().starts_with(|c: char| c.is_ascii_digit()))
                .collect()
        } else {
            matches.iter().enumerate().collect()
        };

        if let Some((index, last)) = kept.last() {
            let trailing = row[last.end()..].trim();
            let already_in_title = second_has_text && *index == 0;
            if !trailing.is_empty() && !already_in_title {
                title.push(trailing);
            }
        }

        if kept.len() > 3 {
            notes.push(format!("{} extra numbers dropped", kept.len() - 3));
        }

        let data: Vec<String> = kept
            .iter()
            .take(3)
            .map(|(_, m)| m.as_str().to_string())
            .collect();

        RowFields::from_parts(collapse_whitespace(&title.join(" ")), &data)
    }
}

fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn fields(d: &str, q: &str, r: &str, a: &str) -> RowFields {
        RowFields {
            description: d.to_string(),
            quantity: q.to_string(),
            rate: r.to_string(),
            amount: a.to_string(),
        }
    }

    #[test]
    fn test_chunks_plain_row() {
        let tokenizer = ChunkTokenizer::default();
        assert_eq!(
            tokenizer.tokenize("Carrier Access Fee\t25.00\t1.5\t37.50", &mut Vec::new()),
            fields("Carrier Access Fee", "25.00", "1.5", "37.50")
        );
    }

    #[test]
    fn test_chunks_space_aligned_row() {
        let tokenizer = ChunkTokenizer::default();
        assert_eq!(
            tokenizer.tokenize("Installation Fee   1   10.00   10.00", &mut Vec::new()),
            fields("Installation Fee", "1", "10.00", "10.00")
        );
    }

    #[test]
    fn test_chunks_glued_trailing_number() {
        let tokenizer = ChunkTokenizer::default();
        assert_eq!(
            tokenizer.tokenize("Carrier Access Fee 25.00\t1\t25.00", &mut Vec::new()),
            fields("Carrier Access Fee", "25.00", "1", "25.00")
        );
    }

    #[test]
    fn test_chunks_floating_value() {
        let tokenizer = ChunkTokenizer::default();
        assert_eq!(
            tokenizer.tokenize("Installation Fee\t1\t500.00 site survey\t500.00", &mut Vec::new()),
            fields("Installation Fee site survey", "1", "500.00", "500.00")
        );
    }

    #[test]
    fn test_chunks_wrapped_continuation_becomes_floating() {
        let tokenizer = ChunkTokenizer::default();
        assert_eq!(
            tokenizer.tokenize("Transport Circuit\t2\t5.00\t10.00 Las Vegas to Reno", &mut Vec::new()),
            fields("Transport Circuit Las Vegas to Reno", "2", "5.00", "10.00")
        );
    }

    #[test]
    fn test_chunks_surplus_fields_join_description() {
        let tokenizer = ChunkTokenizer::default();
        assert_eq!(
            tokenizer.tokenize("Transport\tCircuit A\t2\t5.00\t10.00", &mut Vec::new()),
            fields("Transport Circuit A", "2", "5.00", "10.00")
        );
    }

    #[test]
    fn test_chunks_repairs_are_noted() {
        let tokenizer = ChunkTokenizer::default();
        let mut notes = Vec::new();

        tokenizer.tokenize("Carrier Access Fee\t1\t25.00\t25.00", &mut notes);
        assert!(notes.is_empty());

        tokenizer.tokenize("Transport Circuit\t2\t5.00\t10.00 Las Vegas to Reno", &mut notes);
        tokenizer.tokenize("Transport\tCircuit A\t2\t5.00\t10.00", &mut notes);
        assert_eq!(
            notes,
            vec![
                "floating value 10.00 moved to the last column".to_string(),
                "1 extra fields folded into the description".to_string(),
            ]
        );
    }

    #[test]
    fn test_number_scan_notes_dropped_numbers() {
        let mut notes = Vec::new();
        let row = NumberScanTokenizer.tokenize("Item 1 2.00 2.00 4.00", &mut notes);

        assert_eq!(row, fields("Item", "1", "2.00", "2.00"));
        assert_eq!(notes, vec!["1 extra numbers dropped".to_string()]);
    }

    #[test]
    fn test_chunks_short_row_is_padded() {
        let tokenizer = ChunkTokenizer::default();
        assert_eq!(tokenizer.tokenize("Special Handling", &mut Vec::new()), fields("Special Handling", "", "", ""));
        assert_eq!(tokenizer.tokenize("", &mut Vec::new()), fields("", "", "", ""));
    }

    #[test]
    fn test_chunks_keeps_ocr_noise() {
        let tokenizer = ChunkTokenizer::default();
        assert_eq!(
            tokenizer.tokenize("Item Cross Connect\t1\t1O.OO\t10.00", &mut Vec::new()),
            fields("Item Cross Connect", "1", "1O.OO", "10.00")
        );
    }

    #[test]
    fn test_invalid_column_gap() {
        assert!(ChunkTokenizer::new("(").is_err());
    }

    #[test]
    fn test_number_scan_plain_row() {
        assert_eq!(
            NumberScanTokenizer.tokenize("Carrier Access Fee\t25.00\t1.5\t37.50", &mut Vec::new()),
            fields("Carrier Access Fee", "25.00", "1.5", "37.50")
        );
    }

    #[test]
    fn test_number_scan_trailing_qualifier() {
        assert_eq!(
            NumberScanTokenizer.tokenize("Item 5 to be confirmed", &mut Vec::new()),
            fields("Item to be confirmed", "5", "", "")
        );
    }

    #[test]
    fn test_number_scan_text_after_first_number() {
        assert_eq!(
            NumberScanTokenizer.tokenize("Special Construction 2 units -3.00 12.00 net", &mut Vec::new()),
            fields("Special Construction units net", "2", "12.00", "")
        );
    }

    #[test]
    fn test_number_scan_no_numbers() {
        assert_eq!(
            NumberScanTokenizer.tokenize("Installation\tpending", &mut Vec::new()),
            fields("Installation pending", "", "", "")
        );
    }

    #[test]
    fn test_tokenizer_for() {
        let chunks = tokenizer_for(TokenizerKind::Chunks, DEFAULT_COLUMN_GAP).unwrap();
        let scan = tokenizer_for(TokenizerKind::NumberScan, DEFAULT_COLUMN_GAP).unwrap();

        assert_eq!(chunks.name(), "chunks");
        assert_eq!(scan.name(), "number_scan");
    }
}
