//! CLI subcommands and the document loading they share.

pub mod batch;
pub mod config;
pub mod output;
pub mod process;

use std::path::Path;

use tracing::{debug, warn};

use invx_core::{
    DocumentKind, ExtractionResult, InvoiceParser, InvxConfig, InvxError, LocalSource, SourceError,
    TemplateInvoiceParser,
};

use crate::remote::RemoteOcrClient;

/// Load the configuration from `--config`, the default location, or defaults.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<InvxConfig> {
    if let Some(path) = config_path {
        return Ok(InvxConfig::from_file(Path::new(path))?);
    }

    let default_path = config::default_config_path();
    if default_path.exists() {
        debug!("Using config file {}", default_path.display());
        Ok(InvxConfig::from_file(&default_path)?)
    } else {
        Ok(InvxConfig::default())
    }
}

/// Obtain a document's OCR text and parse it.
///
/// Text dumps and saved responses are read locally. PDFs use their embedded
/// text unless `force_remote` is set, and fall back to the remote service
/// when they have none. Images always go to the remote service.
pub async fn extract_document(
    path: &Path,
    parser: &TemplateInvoiceParser,
    remote: Option<&RemoteOcrClient>,
    force_remote: bool,
) -> anyhow::Result<Option<ExtractionResult>> {
    let kind = DocumentKind::from_path(path)
        .ok_or_else(|| anyhow::anyhow!("Unsupported file format: {}", path.display()))?;
    let local = LocalSource::new();

    let text = match (kind, remote) {
        (DocumentKind::Text | DocumentKind::OcrResponse, _) | (DocumentKind::Pdf, None) => {
            return Ok(parser.parse_file(&local, path)?);
        }
        (DocumentKind::Pdf, Some(client)) if force_remote => client.recognize(path).await?,
        (DocumentKind::Pdf, Some(client)) => match parser.parse_file(&local, path) {
            Err(InvxError::Source(SourceError::Empty)) => {
                warn!("{} has no text layer, sending to remote OCR", path.display());
                client.recognize(path).await?
            }
            other => return Ok(other?),
        },
        (DocumentKind::Image, Some(client)) => client.recognize(path).await?,
        (DocumentKind::Image, None) => anyhow::bail!(
            "{} is an image; configure remote OCR credentials to process it",
            path.display()
        ),
    };

    Ok(parser.parse(&text)?)
}
