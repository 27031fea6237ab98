//! Line-items table region extraction.

use tracing::trace;

use crate::invoice::rules::patterns::{TABLE_FOOTER, TABLE_HEADER};

use super::segment::segment_lines;

/// Extract the rows of every line-items table in the document.
///
/// A header line (`Description Quantity Rate Amount`) starts capturing and is
/// dropped. A blank line or a footer line (totals, remittance text, page
/// markers) stops capturing and is dropped as well. A header that appears
/// again on a later page resumes capturing, so paginated tables come out as
/// one sequence.
pub fn extract_table_lines(text: &str) -> Vec<String> {
    extract_from_lines(&segment_lines(text))
}

/// Same as [`extract_table_lines`], over already segmented lines.
pub fn extract_from_lines<S: AsRef<str>>(lines: &[S]) -> Vec<String> {
    let mut table_lines = Vec::new();
    let mut capturing = false;

    for (index, line) in lines.iter().enumerate() {
        let line = line.as_ref().trim();

        if TABLE_HEADER.is_match(line) {
            trace!("table header at line {}", index);
            capturing = true;
            continue;
        }

        if !capturing {
            continue;
        }

        if line.is_empty() || TABLE_FOOTER.is_match(line) {
            trace!("table region closed at line {}", index);
            capturing = false;
            continue;
        }

        table_lines.push(line.to_string());
    }

    table_lines
}
