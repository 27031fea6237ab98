//! Batch processing command for folders of invoice documents.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::Context;
use clap::Args;
use console::style;
use futures_util::stream::{self, StreamExt};
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, error, warn};

use invx_core::source::DOCUMENT_EXTENSIONS;
use invx_core::{ExtractionResult, TemplateInvoiceParser};

use super::output::{format_record, plan_output_paths, OutputFormat};
use super::{extract_document, load_config};
use crate::remote::RemoteOcrClient;

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Input directory or glob pattern
    #[arg(required = true)]
    input: String,

    /// Output directory
    #[arg(short, long, default_value = ".")]
    output_dir: PathBuf,

    /// Output format for each file
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Also generate a summary CSV
    #[arg(long)]
    summary: bool,

    /// Number of documents processed concurrently
    #[arg(short = 'j', long, default_value = "4")]
    jobs: usize,

    /// Stop at the first failed document
    #[arg(long)]
    fail_fast: bool,

    /// Send PDFs to the remote OCR service even if they carry text
    #[arg(long)]
    remote: bool,
}

/// What happened to one document.
enum Outcome {
    Extracted(Box<ExtractionResult>),
    /// Not the supported template.
    Skipped,
    Failed(String),
}

/// Result of processing a single file.
struct ProcessResult {
    path: PathBuf,
    output: PathBuf,
    outcome: Outcome,
    processing_time_ms: u64,
}

pub async fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;

    let files = discover_documents(&args.input)?;
    if files.is_empty() {
        anyhow::bail!("No documents found for: {}", args.input);
    }

    eprintln!(
        "{} Found {} files to process",
        style("ℹ").blue(),
        files.len()
    );

    fs::create_dir_all(&args.output_dir)?;
    let summary_path = args.output_dir.join("summary.csv");
    let reserved = if args.summary {
        vec![summary_path.clone()]
    } else {
        Vec::new()
    };
    let outputs = plan_output_paths(&args.output_dir, &files, &reserved, args.format);

    let remote = RemoteOcrClient::from_config_opt(&config.ocr)?;
    if args.remote && remote.is_none() {
        anyhow::bail!("--remote needs ocr.client_id, ocr.username and ocr.api_key in the config file");
    }
    let parser = TemplateInvoiceParser::from_config(&config)?;

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files")?
            .progress_chars("=>-"),
    );

    let mut pending = stream::iter(files.into_iter().zip(outputs))
        .map(|(path, output)| {
            let parser = &parser;
            let remote = remote.as_ref();
            let force_remote = args.remote;
            async move {
                let file_start = Instant::now();
                let outcome = match process_single_file(&path, parser, remote, force_remote).await {
                    Ok(Some(result)) => Outcome::Extracted(Box::new(result)),
                    Ok(None) => Outcome::Skipped,
                    Err(e) => Outcome::Failed(format!("{:#}", e)),
                };
                ProcessResult {
                    path,
                    output,
                    outcome,
                    processing_time_ms: file_start.elapsed().as_millis() as u64,
                }
            }
        })
        .buffer_unordered(args.jobs.max(1));

    let mut results = Vec::new();
    while let Some(mut result) = pending.next().await {
        pb.inc(1);

        // A record that cannot be written fails only its own document
        let write_error = match &result.outcome {
            Outcome::Extracted(extracted) => {
                write_output(&result.output, extracted, args.format, config.output.pretty).err()
            }
            _ => None,
        };
        if let Some(e) = write_error {
            result.outcome = Outcome::Failed(format!("{:#}", e));
        }

        match &result.outcome {
            Outcome::Extracted(_) => {
                debug!("Wrote output to {}", result.output.display());
            }
            Outcome::Skipped => {
                debug!("{} does not match the template", result.path.display());
            }
            Outcome::Failed(message) if args.fail_fast => {
                pb.abandon();
                error!("Failed to process {}: {}", result.path.display(), message);
                anyhow::bail!("Processing failed for {}: {}", result.path.display(), message);
            }
            Outcome::Failed(message) => {
                warn!("Failed to process {}: {}", result.path.display(), message);
            }
        }

        results.push(result);
    }

    pb.finish_and_clear();
    results.sort_by(|a, b| a.path.cmp(&b.path));

    if args.summary {
        write_summary(&summary_path, &results)?;
        eprintln!(
            "{} Summary written to {}",
            style("✓").green(),
            summary_path.display()
        );
    }

    print_summary(&results, start);

    Ok(())
}

/// Documents named by a directory or glob pattern, sorted by path.
fn discover_documents(input: &str) -> anyhow::Result<Vec<PathBuf>> {
    let input_path = Path::new(input);

    let candidates: Vec<PathBuf> = if input_path.is_dir() {
        fs::read_dir(input_path)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|p| p.is_file())
            .collect()
    } else {
        glob(input)?.filter_map(|r| r.ok()).collect()
    };

    let mut files: Vec<PathBuf> = candidates
        .into_iter()
        .filter(|p| {
            p.extension()
                .and_then(|e| e.to_str())
                .map(|ext| DOCUMENT_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
                .unwrap_or(false)
        })
        .collect();

    files.sort();
    Ok(files)
}

async fn process_single_file(
    path: &Path,
    parser: &TemplateInvoiceParser,
    remote: Option<&RemoteOcrClient>,
    force_remote: bool,
) -> anyhow::Result<Option<ExtractionResult>> {
    let Some(result) = extract_document(path, parser, remote, force_remote).await? else {
        return Ok(None);
    };

    for warning in &result.warnings {
        debug!("{}: {}", path.display(), warning);
    }

    Ok(Some(result))
}

fn write_output(
    path: &Path,
    result: &ExtractionResult,
    format: OutputFormat,
    pretty: bool,
) -> anyhow::Result<()> {
    let content = format_record(result, format, pretty)?;
    fs::write(path, content)
        .with_context(|| format!("Failed to write {}", path.display()))
}

fn write_summary(path: &Path, results: &[ProcessResult]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    wtr.write_record([
        "filename",
        "status",
        "vendor_name",
        "invoice_number",
        "date",
        "total",
        "line_items",
        "processing_time_ms",
        "error",
    ])?;

    for result in results {
        let filename = result
            .path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("");
        let time_ms = result.processing_time_ms.to_string();

        match &result.outcome {
            Outcome::Extracted(extracted) => {
                let record = &extracted.record;
                let total = extracted.total.to_string();
                let items = record.line_items.len().to_string();
                wtr.write_record([
                    filename,
                    "success",
                    record.vendor_name.as_str(),
                    record.invoice_number.as_deref().unwrap_or_default(),
                    record.date.as_deref().unwrap_or_default(),
                    total.as_str(),
                    items.as_str(),
                    time_ms.as_str(),
                    "",
                ])?;
            }
            Outcome::Skipped => {
                wtr.write_record([filename, "skipped", "", "", "", "", "", time_ms.as_str(), ""])?;
            }
            Outcome::Failed(message) => {
                wtr.write_record([
                    filename,
                    "error",
                    "",
                    "",
                    "",
                    "",
                    "",
                    time_ms.as_str(),
                    message.as_str(),
                ])?;
            }
        }
    }

    wtr.flush()?;
    Ok(())
}

fn print_summary(results: &[ProcessResult], start: Instant) {
    let count = |pred: fn(&Outcome) -> bool| results.iter().filter(|r| pred(&r.outcome)).count();
    let extracted = count(|o| matches!(o, Outcome::Extracted(_)));
    let skipped = count(|o| matches!(o, Outcome::Skipped));
    let failed: Vec<_> = results
        .iter()
        .filter_map(|r| match &r.outcome {
            Outcome::Failed(message) => Some((&r.path, message)),
            _ => None,
        })
        .collect();

    eprintln!();
    eprintln!(
        "{} Processed {} files in {:?}",
        style("✓").green(),
        results.len(),
        start.elapsed()
    );
    eprintln!(
        "   {} extracted, {} not applicable, {} failed",
        style(extracted).green(),
        style(skipped).yellow(),
        style(failed.len()).red()
    );

    if !failed.is_empty() {
        eprintln!();
        eprintln!("{}", style("Failed files:").red());
        for (path, message) in failed {
            eprintln!("  - {}: {}", path.display(), message);
        }
    }
}
