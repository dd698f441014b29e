//! Configuration structures for the extraction pipeline.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::ConfigError;
use crate::models::invoice::Supplier;

/// Main configuration for invline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct InvlineConfig {
    /// Line-item extraction configuration.
    pub extraction: ExtractionConfig,

    /// PDF text extraction configuration.
    pub pdf: PdfConfig,

    /// Export configuration.
    pub output: OutputConfig,
}

/// Extraction configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Supplier used when no keyword matches.
    pub default_supplier: Supplier,

    /// Drop exact duplicate Valeo invoice and packing rows.
    pub valeo_dedupe: bool,

    /// Emit a synthetic `SURCHARGE` item for Valeo surcharge blocks.
    pub valeo_surcharge: bool,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            default_supplier: Supplier::DieselTechnic,
            valeo_dedupe: false,
            valeo_surcharge: true,
        }
    }
}

/// Text extraction backends, tried in configured order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextBackend {
    /// `pdf-extract` content stream text.
    PdfExtract,
    /// `lopdf` per-page text.
    Lopdf,
}

/// PDF text extraction configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PdfConfig {
    /// Backends to try, in order.
    pub backends: Vec<TextBackend>,

    /// Run every backend and keep the text yielding the most items.
    /// When false the first non-empty text wins.
    pub pick_best_backend: bool,

    /// Texts shorter than this (after trimming) count as empty.
    pub min_text_length: usize,
}

impl Default for PdfConfig {
    fn default() -> Self {
        Self {
            backends: vec![TextBackend::PdfExtract, TextBackend::Lopdf],
            pick_best_backend: true,
            min_text_length: 1,
        }
    }
}

/// Export configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Write the Valeo packing list next to the invoice items.
    pub include_packing: bool,

    /// chrono format string for the header processing timestamp.
    pub timestamp_format: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            include_packing: true,
            timestamp_format: "%Y-%m-%d %H:%M:%S".to_string(),
        }
    }
}

impl InvlineConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults() {
        let config = InvlineConfig::default();
        assert_eq!(config.extraction.default_supplier, Supplier::DieselTechnic);
        assert_eq!(
            config.pdf.backends,
            vec![TextBackend::PdfExtract, TextBackend::Lopdf]
        );
        assert!(config.pdf.pick_best_backend);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: InvlineConfig =
            serde_json::from_str(r#"{"extraction": {"valeo_dedupe": true}}"#).unwrap();
        assert!(config.extraction.valeo_dedupe);
        assert!(config.extraction.valeo_surcharge);
        assert_eq!(config.extraction.default_supplier, Supplier::DieselTechnic);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let mut config = InvlineConfig::default();
        config.extraction.default_supplier = Supplier::Valeo;
        config.pdf.backends = vec![TextBackend::Lopdf];
        config.save(&path).unwrap();

        let loaded = InvlineConfig::from_file(&path).unwrap();
        assert_eq!(loaded.extraction.default_supplier, Supplier::Valeo);
        assert_eq!(loaded.pdf.backends, vec![TextBackend::Lopdf]);
    }

    #[test]
    fn test_missing_file() {
        let err = InvlineConfig::from_file(Path::new("/nonexistent/invline.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
