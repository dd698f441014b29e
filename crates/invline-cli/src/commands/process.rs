//! Process command - extract line items from a single invoice file.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use chrono::Local;
use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info};

use invline_core::invoice::Pipeline;

use super::output::{OutputFormat, format_packing, format_result};
use super::{is_supported, load_config, parse_vendor};

/// Arguments for the process command.
#[derive(Args)]
pub struct ProcessArgs {
    /// Input file (PDF or extracted text)
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Supplier key (bosch, conti, diesel, ngk, valeo); detected when omitted
    #[arg(long, alias = "supplier")]
    vendor: Option<String>,

    /// Output the Valeo packing list instead of invoice items
    #[arg(long)]
    packing: bool,

    /// Print the extracted text and exit
    #[arg(long)]
    raw: bool,
}

pub async fn run(args: ProcessArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let mut config = load_config(config_path)?;
    let supplier = parse_vendor(args.vendor.as_deref())?;

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }
    if !is_supported(&args.input) {
        anyhow::bail!(
            "Unsupported file format: {} (expected .pdf or .txt)",
            args.input.display()
        );
    }

    info!("Processing file: {}", args.input.display());

    if args.packing {
        config.output.include_packing = true;
    }
    let timestamp_format = config.output.timestamp_format.clone();

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {msg}")
            .unwrap(),
    );
    pb.set_message("Extracting line items...");

    let pipeline = Pipeline::new(config).with_supplier(supplier);
    let result = pipeline.process_path(&args.input)?;

    pb.finish_and_clear();

    if result.backend.is_none() {
        anyhow::bail!("No text could be extracted from {}", args.input.display());
    }

    let output = if args.raw {
        result.raw_text.clone()
    } else if args.packing {
        format_packing(&result.packing, args.format)?
    } else {
        format_result(&result, args.format, Local::now().naive_local(), &timestamp_format)?
    };

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        println!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }

    for warning in &result.warnings {
        eprintln!("{} {}", style("⚠").yellow(), warning);
    }

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}
