//! Core library for supplier invoice line-item extraction.
//!
//! This crate provides:
//! - Per-supplier text extractors (Bosch, ContiTech/Continental, Diesel Technic, NGK/Niterra, Valeo)
//! - Vendor routing by keyword sniffing or explicit choice
//! - European number parsing and a shared pattern library
//! - ERP record normalization
//! - PDF text providers with best-backend selection

pub mod error;
pub mod invoice;
pub mod models;
pub mod pdf;

pub use error::{ConfigError, InvlineError, PdfError, Result};
pub use invoice::rules::parse_eu_number;
pub use invoice::{
    BoschExtractor, Candidate, ContinentalExtractor, DieselTechnicExtractor, DocumentResult,
    ErpRecord, HeaderRecord, NgkExtractor, Pipeline, SupplierExtractor, ValeoExtractor,
    detect_supplier, extractor_for, route, select_best, to_erp_record,
};
pub use models::config::{InvlineConfig, TextBackend};
pub use models::invoice::{Extraction, InvoiceHeader, LineItem, PackingRow, Supplier};
pub use pdf::{PlainTextBackend, TextProvider, extract_guarded};
#[cfg(feature = "pdf")]
pub use pdf::{LopdfBackend, PdfExtractBackend};
