//! Best-effort header extraction.

use regex::Regex;
use tracing::trace;

use super::tokens::{grab, parse_dmy};
use crate::models::invoice::{InvoiceHeader, Supplier};

/// Per-supplier header patterns. Each search is independent; a miss leaves the field unset.
pub struct HeaderRules {
    pub invoice_number: &'static Regex,
    pub invoice_date: &'static Regex,
    pub currency: Option<&'static Regex>,
    /// Used when the document has text but no currency match.
    pub default_currency: Option<&'static str>,
}

impl HeaderRules {
    /// Run all header searches over the whole document.
    pub fn extract(&self, supplier: Supplier, text: &str) -> InvoiceHeader {
        let mut header = InvoiceHeader::new(supplier);
        if text.trim().is_empty() {
            return header;
        }

        header.invoice_number = grab(self.invoice_number, text, 0);
        header.invoice_date = grab(self.invoice_date, text, 0).and_then(|d| parse_dmy(&d));
        header.currency = self
            .currency
            .and_then(|re| grab(re, text, 0))
            .map(|c| c.to_uppercase())
            .or_else(|| self.default_currency.map(str::to_string));

        trace!(
            "{} header: number={:?} date={:?} currency={:?}",
            supplier.key(),
            header.invoice_number,
            header.invoice_date,
            header.currency
        );

        header
    }
}
