//! Output formats for extracted invoice records.

use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

use invx_core::{ExtractionResult, InvoiceRecord};

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON record
    Json,
    /// CSV, one row per line item
    Csv,
    /// Plain text summary
    Text,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
            OutputFormat::Text => "txt",
        }
    }
}

/// Render an extraction result in the requested format.
///
/// JSON and CSV carry the record only; the text summary also shows the
/// invoice total, which the record has no place for when the table is empty.
pub fn format_record(
    result: &ExtractionResult,
    format: OutputFormat,
    pretty: bool,
) -> anyhow::Result<String> {
    let record = &result.record;
    Ok(match format {
        OutputFormat::Json if pretty => serde_json::to_string_pretty(record)?,
        OutputFormat::Json => serde_json::to_string(record)?,
        OutputFormat::Csv => format_record_csv(record)?,
        OutputFormat::Text => format_record_text(result),
    })
}

/// Output file for each input, all inside `dir`.
///
/// Names are `<stem>.<ext>`. Inputs sharing a stem keep their extension
/// (`a.txt.json`, `a.pdf.json`). A name that would land on one of the inputs
/// or on another output, or on one of the `reserved` paths, gets the input's
/// file name, then a numeric suffix. Paths are compared canonicalized, so
/// `./docs` and `docs` are the same.
pub fn plan_output_paths(
    dir: &Path,
    inputs: &[PathBuf],
    reserved: &[PathBuf],
    format: OutputFormat,
) -> Vec<PathBuf> {
    let ext = format.extension();
    let canonical_dir = canonical(dir);

    let mut taken: HashSet<PathBuf> = inputs
        .iter()
        .chain(reserved)
        .map(|p| canonical(p))
        .collect();
    let mut stem_counts: HashMap<&str, usize> = HashMap::new();
    for input in inputs {
        *stem_counts.entry(file_stem(input)).or_default() += 1;
    }

    inputs
        .iter()
        .map(|input| {
            let stem = file_stem(input);
            let file_name = input
                .file_name()
                .and_then(|s| s.to_str())
                .unwrap_or(stem);

            let mut candidates = Vec::new();
            if stem_counts.get(stem).copied().unwrap_or(0) == 1 {
                candidates.push(format!("{}.{}", stem, ext));
            }
            candidates.push(format!("{}.{}", file_name, ext));

            let name = candidates
                .into_iter()
                .chain((2..).map(|n| format!("{}-{}.{}", file_name, n, ext)))
                .find(|name| !taken.contains(&canonical_dir.join(name)))
                .unwrap_or_default();

            taken.insert(canonical_dir.join(&name));
            dir.join(name)
        })
        .collect()
}

fn file_stem(path: &Path) -> &str {
    path.file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("invoice")
}

/// Canonical form of a path whose file may not exist yet.
fn canonical(path: &Path) -> PathBuf {
    if let Ok(resolved) = fs::canonicalize(path) {
        return resolved;
    }

    match (path.parent(), path.file_name()) {
        (Some(parent), Some(name)) if !parent.as_os_str().is_empty() => {
            canonical(parent).join(name)
        }
        _ => std::env::current_dir()
            .map(|cwd| cwd.join(path))
            .unwrap_or_else(|_| path.to_path_buf()),
    }
}

fn format_record_csv(record: &InvoiceRecord) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record([
        "vendor_name",
        "invoice_number",
        "date",
        "bill_to_name",
        "sku",
        "description",
        "quantity",
        "tax_rate",
        "price",
        "total",
    ])?;

    for item in &record.line_items {
        let sku = item.sku.to_string();
        let total = item.total.to_string();
        wtr.write_record([
            record.vendor_name.as_str(),
            record.invoice_number.as_deref().unwrap_or_default(),
            record.date.as_deref().unwrap_or_default(),
            record.bill_to_name.as_deref().unwrap_or_default(),
            sku.as_str(),
            item.description.as_str(),
            item.quantity.as_str(),
            item.tax_rate.as_str(),
            item.price.as_str(),
            total.as_str(),
        ])?;
    }

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

fn format_record_text(result: &ExtractionResult) -> String {
    let record = &result.record;
    let mut output = String::new();
    let missing = "(not found)";

    output.push_str(&format!(
        "Invoice: {}\n",
        record.invoice_number.as_deref().unwrap_or(missing)
    ));
    output.push_str(&format!("Date: {}\n", record.date.as_deref().unwrap_or(missing)));
    output.push('\n');

    output.push_str("Vendor:\n");
    output.push_str(&format!("  {}\n", record.vendor_name));
    if let Some(address) = &record.vendor_address {
        output.push_str(&format!("  {}\n", address));
    }
    output.push('\n');

    output.push_str(&format!(
        "Bill to: {}\n\n",
        record.bill_to_name.as_deref().unwrap_or(missing)
    ));

    output.push_str("Line items:\n");
    for item in &record.line_items {
        output.push_str(&format!(
            "  {:>3}. {} | qty {} | rate {} | amount {}\n",
            item.sku, item.description, item.quantity, item.tax_rate, item.price
        ));
    }

    output.push_str(&format!("\nTotal: USD {}\n", result.total));

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use invx_core::LineItem;

    fn result(items: Vec<LineItem>) -> ExtractionResult {
        ExtractionResult {
            record: InvoiceRecord {
                vendor_name: "Switch, Ltd.".to_string(),
                vendor_address: None,
                bill_to_name: Some("Acme, Inc.".to_string()),
                invoice_number: Some("418822".to_string()),
                date: Some("03/01/24".to_string()),
                line_items: items,
            },
            total: "50.00".parse().unwrap(),
            warnings: Vec::new(),
            processing_time_ms: 0,
        }
    }

    fn carrier_fee() -> LineItem {
        LineItem {
            sku: 1,
            description: "Carrier Access Fee".to_string(),
            quantity: "2".to_string(),
            tax_rate: "25.00".to_string(),
            price: "50.00".to_string(),
            total: "50.00".parse().unwrap(),
        }
    }

    fn names(paths: &[PathBuf]) -> Vec<String> {
        paths
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap().to_string())
            .collect()
    }

    #[test]
    fn test_csv_row_per_item() {
        let csv = format_record(&result(vec![carrier_fee()]), OutputFormat::Csv, false).unwrap();
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines.len(), 2);
        assert!(lines[1].contains("\"Acme, Inc.\""));
        assert!(lines[1].ends_with(",50.00"));
    }

    #[test]
    fn test_text_summary() {
        let text = format_record(&result(vec![carrier_fee()]), OutputFormat::Text, false).unwrap();

        assert!(text.contains("Invoice: 418822"));
        assert!(text.contains("Total: USD 50.00"));
    }

    #[test]
    fn test_text_summary_total_without_rows() {
        let text = format_record(&result(Vec::new()), OutputFormat::Text, false).unwrap();

        assert!(text.contains("Total: USD 50.00"));
    }

    #[test]
    fn test_output_paths_distinct_stems() {
        let dir = tempfile::tempdir().unwrap();
        let inputs = vec![dir.path().join("in/a.pdf"), dir.path().join("in/b.txt")];

        let outputs = plan_output_paths(&dir.path().join("out"), &inputs, &[], OutputFormat::Json);
        assert_eq!(names(&outputs), vec!["a.json", "b.json"]);
    }

    #[test]
    fn test_output_paths_shared_stem_and_sibling_input() {
        let dir = tempfile::tempdir().unwrap();
        let docs = dir.path().join("docs");
        fs::create_dir_all(&docs).unwrap();

        let inputs: Vec<PathBuf> = ["a.json", "a.pdf", "a.txt"]
            .iter()
            .map(|name| {
                let path = docs.join(name);
                fs::write(&path, "x").unwrap();
                path
            })
            .collect();

        // Same directory spelled differently
        let spelled = docs.join(".").join("..").join("docs");
        let outputs = plan_output_paths(&spelled, &inputs, &[], OutputFormat::Json);

        assert_eq!(names(&outputs), vec!["a.json.json", "a.pdf.json", "a.txt.json"]);
        for output in &outputs {
            assert!(!inputs.iter().any(|i| canonical(i) == canonical(output)));
        }
    }

    #[test]
    fn test_output_path_never_overwrites_input() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("a.json");
        fs::write(&input, "{}").unwrap();

        let outputs = plan_output_paths(dir.path(), &[input.clone()], &[], OutputFormat::Json);
        assert_eq!(names(&outputs), vec!["a.json.json"]);
    }

    #[test]
    fn test_output_paths_same_file_name_in_two_folders() {
        let dir = tempfile::tempdir().unwrap();
        let inputs = vec![dir.path().join("x/a.txt"), dir.path().join("y/a.txt")];

        let outputs = plan_output_paths(&dir.path().join("out"), &inputs, &[], OutputFormat::Csv);
        assert_eq!(names(&outputs), vec!["a.txt.csv", "a.txt-2.csv"]);
    }

    #[test]
    fn test_output_paths_avoid_reserved() {
        let dir = tempfile::tempdir().unwrap();
        let inputs = vec![dir.path().join("summary.txt")];
        let reserved = vec![dir.path().join("out/summary.csv")];

        let outputs = plan_output_paths(&dir.path().join("out"), &inputs, &reserved, OutputFormat::Csv);
        assert_eq!(names(&outputs), vec!["summary.txt.csv"]);
    }
}
