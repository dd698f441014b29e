//! Batch processing command for multiple invoice files.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use chrono::Local;
use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, warn};

use invline_core::invoice::{DocumentResult, Pipeline};

use super::output::{
    OutputFormat, format_combined_csv, format_header_csv, format_packing, format_result,
};
use super::{is_supported, load_config, parse_vendor};

const WRITE_FAILED: &str = "output not written";

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Glob pattern for input files
    #[arg(required = true)]
    input: String,

    /// Output directory
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Output format for each file
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Also generate a summary CSV
    #[arg(long)]
    summary: bool,

    /// Supplier key applied to every file; detected per file when omitted
    #[arg(long, alias = "supplier")]
    vendor: Option<String>,
}

pub async fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let config = load_config(config_path)?;
    let supplier = parse_vendor(args.vendor.as_deref())?;
    let timestamp_format = config.output.timestamp_format.clone();

    let files: Vec<PathBuf> = glob(&args.input)?
        .filter_map(|r| r.ok())
        .filter(|p| is_supported(p))
        .collect();

    if files.is_empty() {
        anyhow::bail!("No matching files found for pattern: {}", args.input);
    }

    println!(
        "{} Found {} files to process",
        style("ℹ").blue(),
        files.len()
    );

    if let Some(ref output_dir) = args.output_dir {
        fs::create_dir_all(output_dir)?;
    }

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files")
            .unwrap()
            .progress_chars("=>-"),
    );

    let pipeline = Pipeline::new(config).with_supplier(supplier);
    let mut results = Vec::with_capacity(files.len());

    for path in &files {
        let mut result = pipeline.process_document(path);

        if let Some(output_dir) = &args.output_dir {
            if result.backend.is_some() {
                let written =
                    write_outputs(output_dir, path, &result, args.format, &timestamp_format);
                if let Err(e) = written {
                    warn!("Failed to write outputs for {}: {:#}", path.display(), e);
                    result.warnings.push(format!("{}: {:#}", WRITE_FAILED, e));
                }
            }
        }

        results.push(result);
        pb.inc(1);
    }

    pb.finish_with_message("Complete");

    if let Some(output_dir) = &args.output_dir {
        let combined_path = output_dir.join("all_items.csv");
        fs::write(&combined_path, format_combined_csv(&results)?)?;
        println!(
            "{} Combined items written to {}",
            style("✓").green(),
            combined_path.display()
        );
    }

    if args.summary {
        let summary_path = args
            .output_dir
            .as_ref()
            .map(|d| d.join("summary.csv"))
            .unwrap_or_else(|| PathBuf::from("summary.csv"));

        write_summary(&summary_path, &results)?;
        println!(
            "{} Summary written to {}",
            style("✓").green(),
            summary_path.display()
        );
    }

    let failed: Vec<_> = results.iter().filter(|r| status(r) == "error").collect();
    let empty = results.iter().filter(|r| status(r) == "empty").count();

    println!();
    println!(
        "{} Processed {} files in {:?}",
        style("✓").green(),
        results.len(),
        start.elapsed()
    );
    println!(
        "   {} with items, {} without items, {} failed",
        style(results.len() - failed.len() - empty).green(),
        style(empty).yellow(),
        style(failed.len()).red()
    );

    if !failed.is_empty() {
        println!();
        println!("{}", style("Failed files:").red());
        for result in &failed {
            println!(
                "  - {}: {}",
                result.name,
                result.warnings.last().map(String::as_str).unwrap_or("unknown error")
            );
        }
    }

    Ok(())
}

fn status(result: &DocumentResult) -> &'static str {
    let write_failed = result.warnings.iter().any(|w| w.starts_with(WRITE_FAILED));
    if result.backend.is_none() || write_failed {
        "error"
    } else if result.items.is_empty() {
        "empty"
    } else {
        "success"
    }
}

fn write_outputs(
    output_dir: &Path,
    input: &Path,
    result: &DocumentResult,
    format: OutputFormat,
    timestamp_format: &str,
) -> anyhow::Result<()> {
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("invoice");
    let processed_at = Local::now().naive_local();

    let output_path = output_dir.join(format!("{}.{}", stem, format.extension()));
    fs::write(
        &output_path,
        format_result(result, format, processed_at, timestamp_format)?,
    )?;
    debug!("Wrote output to {}", output_path.display());

    // JSON already carries header and packing rows.
    if let OutputFormat::Csv = format {
        let header = result.header_record(processed_at, timestamp_format);
        fs::write(
            output_dir.join(format!("{}_header.csv", stem)),
            format_header_csv(&header)?,
        )?;

        if !result.packing.is_empty() {
            fs::write(
                output_dir.join(format!("{}_packing.csv", stem)),
                format_packing(&result.packing, format)?,
            )?;
        }
    }

    Ok(())
}

fn write_summary(path: &Path, results: &[DocumentResult]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    wtr.write_record([
        "filename",
        "status",
        "supplier",
        "invoice_number",
        "invoice_date",
        "currency",
        "items",
        "total_amount",
        "backend",
        "warnings",
    ])?;

    for result in results {
        wtr.write_record([
            result.name.as_str(),
            status(result),
            result.supplier.key(),
            result.header.invoice_number.as_deref().unwrap_or(""),
            &result
                .header
                .invoice_date
                .map(|d| d.format("%d.%m.%Y").to_string())
                .unwrap_or_default(),
            result.header.currency.as_deref().unwrap_or(""),
            &result.items.len().to_string(),
            &result.total_amount().map(|t| t.to_string()).unwrap_or_default(),
            result.backend.as_deref().unwrap_or(""),
            &result.warnings.join("; "),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}
