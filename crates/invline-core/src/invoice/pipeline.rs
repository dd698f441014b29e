//! Per-document processing: text providers, vendor routing, extraction.

use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{debug, info, warn};

use super::SupplierExtractor;
use super::normalize::{ErpRecord, HeaderRecord, to_erp_record};
use super::router::{detect_supplier_or, extractor_for, extractor_with_config};
use crate::error::Result;
use crate::models::config::InvlineConfig;
use crate::models::invoice::{Extraction, InvoiceHeader, LineItem, PackingRow, Supplier};
use crate::pdf::{
    PlainTextBackend, TextProvider, extract_guarded, extract_with_fallback, providers_for,
};

pub const NO_ITEMS_WARNING: &str = "no line items parsed; inspect raw text";
pub const NO_TEXT_WARNING: &str = "no text could be extracted";

/// One backend's text and what the extractor made of it.
#[derive(Debug, Clone)]
pub struct Candidate {
    pub backend: String,
    pub text: String,
    pub extraction: Extraction,
}

/// Pick the candidate text yielding the most items, using default extractor options.
pub fn select_best(candidates: Vec<(String, String)>, supplier: Supplier) -> Option<Candidate> {
    select_best_with(candidates, extractor_for(supplier).as_ref())
}

/// Pick the candidate text yielding the most items.
///
/// Empty texts are skipped; on a tie the earlier candidate is kept.
pub fn select_best_with(
    candidates: Vec<(String, String)>,
    extractor: &dyn SupplierExtractor,
) -> Option<Candidate> {
    let mut best: Option<Candidate> = None;

    for (backend, text) in candidates {
        if text.trim().is_empty() {
            continue;
        }

        let extraction = extractor.parse(&text);
        debug!("{}: {} items", backend, extraction.items.len());

        let better = best
            .as_ref()
            .is_none_or(|b| extraction.items.len() > b.extraction.items.len());
        if better {
            best = Some(Candidate {
                backend,
                text,
                extraction,
            });
        }
    }

    best
}

/// Everything produced for one input document.
#[derive(Debug, Clone, Serialize)]
pub struct DocumentResult {
    /// File name or caller-supplied label.
    pub name: String,
    pub supplier: Supplier,
    pub header: InvoiceHeader,
    pub items: Vec<LineItem>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub packing: Vec<PackingRow>,
    #[serde(skip)]
    pub raw_text: String,
    /// Text backend whose output was used.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backend: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

impl DocumentResult {
    /// An empty result carrying a single warning.
    pub fn failed(name: impl Into<String>, supplier: Supplier, warning: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            supplier,
            header: InvoiceHeader::new(supplier),
            items: Vec::new(),
            packing: Vec::new(),
            raw_text: String::new(),
            backend: None,
            warnings: vec![warning.into()],
        }
    }

    /// Items as ERP records, in document order.
    pub fn records(&self) -> Vec<ErpRecord> {
        self.items.iter().map(to_erp_record).collect()
    }

    /// Sum of all line amounts, `None` on overflow.
    pub fn total_amount(&self) -> Option<Decimal> {
        self.items
            .iter()
            .try_fold(Decimal::ZERO, |acc, i| acc.checked_add(i.amount))
    }

    pub fn header_record(&self, processed_at: NaiveDateTime, timestamp_format: &str) -> HeaderRecord {
        HeaderRecord::new(&self.header, processed_at, timestamp_format)
    }
}

/// Runs documents through text extraction, routing and parsing.
pub struct Pipeline {
    config: InvlineConfig,
    supplier: Option<Supplier>,
}

impl Pipeline {
    pub fn new(config: InvlineConfig) -> Self {
        Self {
            config,
            supplier: None,
        }
    }

    /// Force a supplier instead of detecting it.
    pub fn with_supplier(mut self, supplier: Option<Supplier>) -> Self {
        self.supplier = supplier;
        self
    }

    fn route(&self, text: &str) -> Supplier {
        self.supplier
            .unwrap_or_else(|| detect_supplier_or(text, self.config.extraction.default_supplier))
    }

    fn fallback_supplier(&self) -> Supplier {
        self.supplier.unwrap_or(self.config.extraction.default_supplier)
    }

    /// Process text that has already been extracted.
    pub fn process_text(&self, name: &str, text: &str) -> DocumentResult {
        self.process_candidates(name, vec![(PlainTextBackend.name().to_string(), text.to_string())])
    }

    /// Process raw document bytes with the given providers.
    ///
    /// With `pick_best_backend` every provider runs and the text yielding
    /// the most items wins; otherwise the first non-empty text is used.
    pub fn process_bytes(
        &self,
        name: &str,
        data: &[u8],
        providers: &[Box<dyn TextProvider>],
    ) -> DocumentResult {
        let candidates = if self.config.pdf.pick_best_backend {
            providers
                .iter()
                .map(|p| (p.name().to_string(), extract_guarded(p.as_ref(), data)))
                .collect()
        } else {
            extract_with_fallback(providers, data)
                .map(|(backend, text)| vec![(backend.to_string(), text)])
                .unwrap_or_default()
        };

        self.process_candidates(name, candidates)
    }

    /// Read and process a file. `.txt` files are taken as extracted text,
    /// anything else goes through the configured PDF backends.
    pub fn process_path(&self, path: &Path) -> Result<DocumentResult> {
        let data = std::fs::read(path)?;
        let name = display_name(path);

        let is_text = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("txt"));

        let providers: Vec<Box<dyn TextProvider>> = if is_text {
            vec![Box::new(PlainTextBackend)]
        } else {
            providers_for(&self.config.pdf.backends)
        };

        Ok(self.process_bytes(&name, &data, &providers))
    }

    /// Process many files. A failing document yields an empty result with a
    /// warning and does not stop the batch.
    pub fn process_batch(&self, paths: &[PathBuf]) -> Vec<DocumentResult> {
        paths.iter().map(|path| self.process_document(path)).collect()
    }

    /// [`process_path`](Self::process_path) with errors folded into the result.
    pub fn process_document(&self, path: &Path) -> DocumentResult {
        self.process_path(path).unwrap_or_else(|e| {
            warn!("Failed to process {}: {}", path.display(), e);
            DocumentResult::failed(display_name(path), self.fallback_supplier(), e.to_string())
        })
    }

    fn process_candidates(&self, name: &str, candidates: Vec<(String, String)>) -> DocumentResult {
        let min_len = self.config.pdf.min_text_length.max(1);
        let candidates: Vec<(String, String)> = candidates
            .into_iter()
            .filter(|(backend, text)| {
                let usable = text.trim().chars().count() >= min_len;
                if !usable {
                    debug!("Discarding short text from {}", backend);
                }
                usable
            })
            .collect();

        let Some((_, first_text)) = candidates.first() else {
            warn!("{}: {}", name, NO_TEXT_WARNING);
            return DocumentResult::failed(name, self.fallback_supplier(), NO_TEXT_WARNING);
        };

        let supplier = self.route(first_text);
        let extractor = extractor_with_config(supplier, &self.config.extraction);

        let Some(best) = select_best_with(candidates, extractor.as_ref()) else {
            return DocumentResult::failed(name, supplier, NO_TEXT_WARNING);
        };

        let packing = if self.config.output.include_packing {
            extractor.parse_packing(&best.text)
        } else {
            Vec::new()
        };

        let mut warnings = Vec::new();
        if best.extraction.items.is_empty() {
            warn!("{}: {}", name, NO_ITEMS_WARNING);
            warnings.push(NO_ITEMS_WARNING.to_string());
        }

        info!(
            "{}: {} via {}, {} items",
            name,
            supplier.key(),
            best.backend,
            best.extraction.items.len()
        );

        DocumentResult {
            name: name.to_string(),
            supplier,
            header: best.extraction.header,
            items: best.extraction.items,
            packing,
            raw_text: best.text,
            backend: Some(best.backend),
            warnings,
        }
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
