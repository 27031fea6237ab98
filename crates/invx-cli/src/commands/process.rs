//! Process command - extract a record from a single invoice document.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info};

use invx_core::TemplateInvoiceParser;

use super::output::{format_record, OutputFormat};
use super::{extract_document, load_config};
use crate::remote::RemoteOcrClient;

/// Arguments for the process command.
#[derive(Args)]
pub struct ProcessArgs {
    /// Input document (OCR text, saved OCR response, PDF or image)
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Send PDFs to the remote OCR service even if they carry text
    #[arg(long)]
    remote: bool,

    /// Validate extracted data
    #[arg(long)]
    validate: bool,

    /// Print extraction warnings
    #[arg(long)]
    show_warnings: bool,
}

pub async fn run(args: ProcessArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    let remote = RemoteOcrClient::from_config_opt(&config.ocr)?;
    if args.remote && remote.is_none() {
        anyhow::bail!("--remote needs ocr.client_id, ocr.username and ocr.api_key in the config file");
    }

    info!("Processing file: {}", args.input.display());

    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
    pb.set_message("Extracting invoice data...");

    let parser = TemplateInvoiceParser::from_config(&config)?;
    let parsed = extract_document(&args.input, &parser, remote.as_ref(), args.remote).await;
    pb.finish_and_clear();

    let Some(result) = parsed? else {
        eprintln!(
            "{} {} does not match the supported invoice template, nothing extracted",
            style("ℹ").blue(),
            args.input.display()
        );
        return Ok(());
    };

    let record = &result.record;

    if args.validate {
        let issues = record.validate();
        if !issues.is_empty() {
            eprintln!("{}", style("Validation issues:").yellow());
            for issue in &issues {
                eprintln!("  - {}", issue);
            }
        }
    }

    if args.show_warnings && !result.warnings.is_empty() {
        eprintln!("{}", style("Warnings:").yellow());
        for warning in &result.warnings {
            eprintln!("  - {}", warning);
        }
    }

    let output = format_record(&result, args.format, config.output.pretty)?;

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        eprintln!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }

    debug!(
        "Extraction took {}ms, total {:?}",
        result.processing_time_ms,
        start.elapsed()
    );

    Ok(())
}
