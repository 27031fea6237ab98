//! Format gate: cheap check that a document uses the supported template.

/// Accepts a document only when every required token occurs in its text.
#[derive(Debug, Clone)]
pub struct FormatGate {
    tokens: Vec<String>,
}

impl FormatGate {
    pub fn new<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            tokens: tokens.into_iter().map(Into::into).collect(),
        }
    }

    /// Whether the text contains all required tokens (case-sensitive).
    pub fn accepts(&self, text: &str) -> bool {
        self.tokens.iter().all(|t| text.contains(t.as_str()))
    }

    /// Required tokens that are absent from the text.
    pub fn missing<'a>(&'a self, text: &str) -> Vec<&'a str> {
        self.tokens
            .iter()
            .filter(|t| !text.contains(t.as_str()))
            .map(String::as_str)
            .collect()
    }
}

impl Default for FormatGate {
    fn default() -> Self {
        Self::new(["switch", "Invoice", "Description"])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_template() {
        let gate = FormatGate::default();
        assert!(gate.accepts("switch\nInvoice\nDescription Quantity Rate Amount"));
    }

    #[test]
    fn test_any_missing_token_rejects() {
        let gate = FormatGate::default();

        assert!(!gate.accepts("Invoice Description"));
        assert!(!gate.accepts("switch Description"));
        assert!(!gate.accepts("switch Invoice"));
        assert!(!gate.accepts("SWITCH Invoice Description"));
        assert_eq!(gate.missing("switch invoice Description"), vec!["Invoice"]);
    }
}
