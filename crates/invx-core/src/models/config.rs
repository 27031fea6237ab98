//! Configuration structures for the extraction pipeline.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::InvxError;
use crate::table::DEFAULT_COLUMN_GAP;

/// Main configuration for the invx pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct InvxConfig {
    /// Invoice template markers.
    pub template: TemplateConfig,

    /// Extraction behaviour.
    pub extraction: ExtractionConfig,

    /// Remote OCR service settings.
    pub ocr: OcrConfig,

    /// Output settings.
    pub output: OutputConfig,
}

/// Markers describing the one supported invoice layout.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplateConfig {
    /// Vendor-identifying token. Required by the format gate and stripped
    /// from the vendor address.
    pub vendor_token: String,

    /// Further substrings that must all be present for a document to be parsed.
    pub gate_tokens: Vec<String>,

    /// Prefixes that start a new table row.
    pub row_keywords: Vec<String>,

    /// Regex matching a gap between two table columns.
    pub column_gap: String,
}

impl Default for TemplateConfig {
    fn default() -> Self {
        Self {
            vendor_token: "switch".to_string(),
            gate_tokens: vec![
                "Invoice".to_string(),
                "Description".to_string(),
            ],
            row_keywords: vec![
                "Installation".to_string(),
                "Carrier".to_string(),
                "Transport".to_string(),
                "Special".to_string(),
                "Item".to_string(),
            ],
            column_gap: DEFAULT_COLUMN_GAP.to_string(),
        }
    }
}

/// Row tokenization strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenizerKind {
    /// Column-chunk based tokenizer with floating value repair.
    #[default]
    Chunks,
    /// Title plus first numbers scan.
    NumberScan,
}

/// Invoice extraction configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Strategy used to split rows into fields.
    pub tokenizer: TokenizerKind,

    /// Warn when the invoice date is not a valid calendar date.
    pub check_date: bool,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            tokenizer: TokenizerKind::Chunks,
            check_date: true,
        }
    }
}

/// Remote OCR service configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OcrConfig {
    /// Document processing endpoint.
    pub endpoint: String,

    /// Client identifier sent with every request.
    pub client_id: Option<String>,

    /// Account user name.
    pub username: Option<String>,

    /// API key.
    pub api_key: Option<String>,

    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://api.veryfi.com/api/v8/partner/documents".to_string(),
            client_id: None,
            username: None,
            api_key: None,
            timeout_secs: 120,
        }
    }
}

impl OcrConfig {
    /// Whether enough credentials are set to call the remote service.
    pub fn has_credentials(&self) -> bool {
        self.client_id.is_some() && self.username.is_some() && self.api_key.is_some()
    }
}

/// Output configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Pretty-print JSON records.
    pub pretty: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self { pretty: true }
    }
}

impl InvxConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self, InvxError> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| InvxError::Config(format!("{}: {}", path.display(), e)))
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &Path) -> Result<(), InvxError> {
        let content =
            serde_json::to_string_pretty(self).map_err(|e| InvxError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: InvxConfig =
            serde_json::from_str(r#"{"extraction": {"tokenizer": "number_scan"}}"#).unwrap();

        assert_eq!(config.extraction.tokenizer, TokenizerKind::NumberScan);
        assert!(config.extraction.check_date);
        assert_eq!(config.template.row_keywords.len(), 5);
        assert!(!config.ocr.has_credentials());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let mut config = InvxConfig::default();
        config.template.row_keywords = vec!["Port".to_string()];
        config.save(&path).unwrap();

        let loaded = InvxConfig::from_file(&path).unwrap();
        assert_eq!(loaded.template.row_keywords, vec!["Port".to_string()]);
    }
}
