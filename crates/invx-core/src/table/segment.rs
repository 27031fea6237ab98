//! Line segmentation of raw OCR text.

/// Split OCR text into trimmed lines, preserving order and blank lines.
///
/// Blank lines are kept because they terminate a table region.
pub fn segment_lines(text: &str) -> Vec<&str> {
    text.lines().map(str::trim).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_segment_lines() {
        let text = "  Invoice \r\n\n\tCarrier Fee\t10.00\t\n";
        assert_eq!(segment_lines(text), vec!["Invoice", "", "Carrier Fee\t10.00"]);
    }
}
