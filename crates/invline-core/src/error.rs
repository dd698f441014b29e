//! Error types for the invline-core library.
//!
//! Extraction itself never fails: missing fields are `None` and incomplete
//! lines are dropped. These errors only cover the I/O edges (reading files,
//! loading PDFs, loading configuration).

use thiserror::Error;

/// Main error type for the invline library.
#[derive(Error, Debug)]
pub enum InvlineError {
    /// Unknown supplier key given as an override.
    #[error("unknown supplier: {0}")]
    UnknownSupplier(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors related to PDF loading.
#[derive(Error, Debug)]
pub enum PdfError {
    /// Failed to open/parse the PDF file.
    #[error("failed to parse PDF: {0}")]
    Parse(String),

    /// Failed to extract text from PDF.
    #[error("failed to extract text: {0}")]
    TextExtraction(String),

    /// The PDF is encrypted and cannot be processed.
    #[error("PDF is encrypted")]
    Encrypted,

    /// The PDF is empty or has no pages.
    #[error("PDF has no pages")]
    NoPages,
}

/// Errors related to configuration files.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The file could not be read or written.
    #[error("failed to access {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid configuration JSON.
    #[error("invalid configuration: {0}")]
    Format(#[from] serde_json::Error),
}

/// Result type for the invline library.
pub type Result<T> = std::result::Result<T, InvlineError>;
