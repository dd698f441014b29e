//! Subcommand implementations.

pub mod batch;
pub mod config;
pub mod detect;
pub mod output;
pub mod process;

use std::path::Path;

use invline_core::models::config::InvlineConfig;
use invline_core::models::invoice::Supplier;
use tracing::debug;

/// Load configuration from an explicit path, else the default location, else defaults.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<InvlineConfig> {
    if let Some(path) = config_path {
        return Ok(InvlineConfig::from_file(Path::new(path))?);
    }

    let default_path = config::default_config_path();
    if default_path.exists() {
        debug!("Using configuration from {}", default_path.display());
        Ok(InvlineConfig::from_file(&default_path)?)
    } else {
        Ok(InvlineConfig::default())
    }
}

/// Parse an optional `--vendor` key.
pub fn parse_vendor(vendor: Option<&str>) -> anyhow::Result<Option<Supplier>> {
    vendor
        .map(|key| key.parse::<Supplier>())
        .transpose()
        .map_err(|e| anyhow::anyhow!("{} (expected one of: bosch, conti, diesel, ngk, valeo)", e))
}

/// Accepted input file extensions.
pub fn is_supported(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| matches!(e.to_lowercase().as_str(), "pdf" | "txt"))
}
