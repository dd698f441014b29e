//! Supplier invoice line-item extraction.

pub mod normalize;
pub mod pipeline;
pub mod router;
pub mod rules;
pub mod suppliers;

pub use normalize::{ErpRecord, HeaderRecord, to_erp_record};
pub use pipeline::{Candidate, DocumentResult, Pipeline, select_best};
pub use router::{detect_supplier, extractor_for, route};
pub use suppliers::{
    BoschExtractor, ContinentalExtractor, DieselTechnicExtractor, NgkExtractor, ValeoExtractor,
};

use crate::models::invoice::{Extraction, PackingRow, Supplier};

/// Trait for per-supplier text extractors.
///
/// Extractors are stateless apart from their options and never fail: fields
/// that cannot be recovered stay `None`, lines that cannot be completed are
/// dropped.
pub trait SupplierExtractor {
    /// Supplier this extractor handles.
    fn supplier(&self) -> Supplier;

    /// Extract the header and line items from plain document text.
    fn parse(&self, text: &str) -> Extraction;

    /// Same as [`parse`](Self::parse), treating a missing text as empty.
    fn parse_optional(&self, text: Option<&str>) -> Extraction {
        match text {
            Some(text) => self.parse(text),
            None => Extraction::empty(self.supplier()),
        }
    }

    /// Packing-list rows. Only Valeo documents carry one.
    fn parse_packing(&self, _text: &str) -> Vec<PackingRow> {
        Vec::new()
    }
}
