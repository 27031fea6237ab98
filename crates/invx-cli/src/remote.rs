//! Client for the remote document OCR service.

use std::path::Path;
use std::time::Duration;

use anyhow::Context;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::Serialize;
use tracing::{debug, info};

use invx_core::models::config::OcrConfig;
use invx_core::OcrResponse;

#[derive(Serialize)]
struct DocumentRequest<'a> {
    file_name: &'a str,
    file_data: String,
}

/// Uploads documents to the OCR service and returns their recognized text.
pub struct RemoteOcrClient {
    http: reqwest::Client,
    endpoint: String,
    client_id: String,
    authorization: String,
}

impl RemoteOcrClient {
    /// Build a client from configuration. All three credentials are required.
    pub fn from_config(config: &OcrConfig) -> anyhow::Result<Self> {
        let (Some(client_id), Some(username), Some(api_key)) =
            (&config.client_id, &config.username, &config.api_key)
        else {
            anyhow::bail!(
                "Remote OCR needs ocr.client_id, ocr.username and ocr.api_key in the config file"
            );
        };

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            endpoint: config.endpoint.clone(),
            client_id: client_id.clone(),
            authorization: format!("apikey {}:{}", username, api_key),
        })
    }

    /// Build a client only if credentials are configured.
    pub fn from_config_opt(config: &OcrConfig) -> anyhow::Result<Option<Self>> {
        if config.has_credentials() {
            Self::from_config(config).map(Some)
        } else {
            Ok(None)
        }
    }

    /// Upload one document and return its OCR text.
    pub async fn recognize(&self, path: &Path) -> anyhow::Result<String> {
        let data = tokio::fs::read(path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))?;

        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("document");

        info!("Uploading {} ({} bytes) for OCR", file_name, data.len());

        let request = DocumentRequest {
            file_name,
            file_data: STANDARD.encode(&data),
        };

        let response: OcrResponse = self
            .http
            .post(&self.endpoint)
            .header("CLIENT-ID", &self.client_id)
            .header("AUTHORIZATION", &self.authorization)
            .header("Accept", "application/json")
            .json(&request)
            .send()
            .await
            .context("OCR request failed")?
            .error_for_status()
            .context("OCR service returned an error")?
            .json()
            .await
            .context("OCR response was not valid JSON")?;

        debug!("OCR returned {} chars for {}", response.ocr_text.len(), file_name);

        if response.ocr_text.trim().is_empty() {
            anyhow::bail!("OCR service recognized no text in {}", path.display());
        }

        Ok(response.ocr_text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_requires_credentials() {
        let config = OcrConfig::default();

        assert!(RemoteOcrClient::from_config(&config).is_err());
        assert!(RemoteOcrClient::from_config_opt(&config).unwrap().is_none());
    }

    #[test]
    fn test_authorization_header() {
        let config = OcrConfig {
            client_id: Some("cid".to_string()),
            username: Some("ap.user".to_string()),
            api_key: Some("k3y".to_string()),
            ..OcrConfig::default()
        };

        let client = RemoteOcrClient::from_config(&config).unwrap();
        assert_eq!(client.authorization, "apikey ap.user:k3y");
        assert_eq!(client.client_id, "cid");
    }
}
