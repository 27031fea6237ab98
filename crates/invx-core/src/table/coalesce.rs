//! Reattaching OCR line-wrap fragments to the row they belong to.

use tracing::debug;

/// Upper bound on merge passes.
pub const MAX_COALESCE_PASSES: usize = 8;

/// Merges table lines into one logical line per row.
///
/// A row starts at a line beginning with one of the row keywords. Any other
/// line is a continuation and is appended to the row above it, separated by
/// a single space. Lines before the first keyword form a standalone leading
/// row so nothing is dropped.
#[derive(Debug, Clone)]
pub struct LineCoalescer {
    keywords: Vec<String>,
}

impl LineCoalescer {
    pub fn new<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            keywords: keywords.into_iter().map(Into::into).collect(),
        }
    }

    /// Whether `line` opens a new row.
    pub fn starts_row(&self, line: &str) -> bool {
        let line = line.trim_start();
        self.keywords
            .iter()
            .any(|k| !k.is_empty() && line.starts_with(k.as_str()))
    }

    /// Coalesce until every row after the first starts with a keyword.
    ///
    /// Each extra pass must shrink the row count, and the number of passes is
    /// capped at [`MAX_COALESCE_PASSES`], so this always terminates.
    pub fn coalesce<S: AsRef<str>>(&self, lines: &[S]) -> Vec<String> {
        let mut rows = self.merge_pass(lines);
        let mut passes = 1;

        while passes < MAX_COALESCE_PASSES && !self.is_coalesced(&rows) {
            let next = self.merge_pass(&rows);
            passes += 1;

            if next.len() >= rows.len() {
                debug!("coalescing made no progress after {} passes", passes);
                rows = next;
                break;
            }
            rows = next;
        }

        debug!("coalesced {} lines into {} rows", lines.len(), rows.len());
        rows
    }

    /// Every row except possibly the first starts with a keyword.
    pub fn is_coalesced<S: AsRef<str>>(&self, rows: &[S]) -> bool {
        rows.iter().skip(1).all(|r| self.starts_row(r.as_ref()))
    }

    fn merge_pass<S: AsRef<str>>(&self, lines: &[S]) -> Vec<String> {
        let mut rows = Vec::new();
        let mut current = String::new();

        for line in lines {
            let line = line.as_ref().trim();

            if self.starts_row(line) {
                if !current.is_empty() {
                    rows.push(std::mem::take(&mut current));
                }
                current.push_str(line);
            } else if !line.is_empty() {
                if !current.is_empty() {
                    current.push(' ');
                }
                current.push_str(line);
            }
        }

        if !current.is_empty() {
            rows.push(current);
        }

        rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_continuations_are_reattached() {
        let coalescer = LineCoalescer::new(["Installation", "Carrier"]);
        let rows = coalescer.coalesce(&["Installation Fee", "continued text", "Carrier Charge 5.00"]);

        assert_eq!(
            rows,
            vec![
                "Installation Fee continued text".to_string(),
                "Carrier Charge 5.00".to_string(),
            ]
        );
    }

    #[test]
    fn test_leading_fragment_kept() {
        let coalescer = LineCoalescer::new(["Item"]);
        let rows = coalescer.coalesce(&["stray header", "more", "Item 1", "wrap", "Item 2"]);

        assert_eq!(rows, vec!["stray header more", "Item 1 wrap", "Item 2"]);
        assert!(coalescer.is_coalesced(&rows));
    }

    #[test]
    fn test_no_keyword_anywhere_terminates() {
        let coalescer = LineCoalescer::new(["Carrier"]);
        let rows = coalescer.coalesce(&["a", "b", "c"]);

        assert_eq!(rows, vec!["a b c"]);
    }

    #[test]
    fn test_every_row_after_first_has_keyword() {
        let coalescer = LineCoalescer::new(["Installation", "Carrier", "Transport", "Special", "Item"]);
        let lines = [
            "x",
            "Transport 10G",
            "wave",
            "circuit 2",
            "Special Construction",
            "Item 7",
            "   tail",
        ];
        let rows = coalescer.coalesce(&lines);

        for row in rows.iter().skip(1) {
            assert!(coalescer.starts_row(row), "row without keyword: {row}");
        }
        assert_eq!(rows[1], "Transport 10G wave circuit 2");
    }

    #[test]
    fn test_empty_input() {
        let coalescer = LineCoalescer::new(["Item"]);
        assert!(coalescer.coalesce::<&str>(&[]).is_empty());
    }
}
