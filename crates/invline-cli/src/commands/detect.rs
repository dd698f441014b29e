//! Detect command - show which supplier a document routes to.

use std::path::PathBuf;

use clap::Args;
use console::style;

use invline_core::invoice::Pipeline;

use super::{is_supported, load_config};

/// Arguments for the detect command.
#[derive(Args)]
pub struct DetectArgs {
    /// Input file (PDF or extracted text)
    #[arg(required = true)]
    input: PathBuf,
}

pub async fn run(args: DetectArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }
    if !is_supported(&args.input) {
        anyhow::bail!(
            "Unsupported file format: {} (expected .pdf or .txt)",
            args.input.display()
        );
    }

    let result = Pipeline::new(config).process_path(&args.input)?;
    let Some(backend) = result.backend.as_deref() else {
        anyhow::bail!("No text could be extracted from {}", args.input.display());
    };

    println!("{}\t{}", result.supplier.key(), result.supplier.display_name());
    eprintln!(
        "{} text from {}, {} items parsed",
        style("ℹ").blue(),
        backend,
        result.items.len()
    );

    Ok(())
}
