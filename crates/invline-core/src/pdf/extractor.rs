//! PDF text extraction using lopdf and pdf-extract.

use std::panic::{self, AssertUnwindSafe};

use lopdf::Document;
use tracing::{debug, warn};

use super::{TextProvider, panic_message};
use crate::error::PdfError;

/// Result type for PDF operations.
pub type Result<T> = std::result::Result<T, PdfError>;

/// A loaded document plus the bytes pdf-extract should read.
///
/// Documents protected with an empty user password are decrypted and
/// re-serialized so that pdf-extract sees plain content.
pub struct LoadedPdf {
    pub document: Document,
    pub raw_data: Vec<u8>,
}

impl LoadedPdf {
    pub fn load(data: &[u8]) -> Result<Self> {
        let mut document = Document::load_mem(data).map_err(|e| PdfError::Parse(e.to_string()))?;

        let raw_data = if document.is_encrypted() {
            if document.decrypt("").is_err() {
                return Err(PdfError::Encrypted);
            }
            debug!("Decrypted PDF with empty password");

            let mut decrypted = Vec::new();
            document
                .save_to(&mut decrypted)
                .map_err(|e| PdfError::Parse(format!("Failed to save decrypted PDF: {}", e)))?;
            decrypted
        } else {
            data.to_vec()
        };

        let page_count = document.get_pages().len();
        if page_count == 0 {
            return Err(PdfError::NoPages);
        }

        debug!("Loaded PDF with {} pages", page_count);
        Ok(Self { document, raw_data })
    }

    /// Whole-document text in reading order, via pdf-extract.
    ///
    /// pdf-extract panics on some malformed fonts; that is reported as a
    /// [`PdfError::TextExtraction`].
    pub fn extract_text(&self) -> Result<String> {
        panic::catch_unwind(AssertUnwindSafe(|| {
            pdf_extract::extract_text_from_mem(&self.raw_data)
        }))
        .map_err(|payload| PdfError::TextExtraction(panic_message(payload.as_ref()).to_string()))?
        .map_err(|e| PdfError::TextExtraction(e.to_string()))
    }

    /// Page-by-page text via lopdf, pages separated by a blank line.
    pub fn extract_page_texts(&self) -> Result<String> {
        let mut full_text = String::new();

        for page_num in self.document.get_pages().keys() {
            let page_text = self
                .document
                .extract_text(&[*page_num])
                .map_err(|e| PdfError::TextExtraction(e.to_string()))?;

            if page_text.trim().is_empty() {
                continue;
            }
            if !full_text.is_empty() {
                full_text.push_str("\n\n");
            }
            full_text.push_str(page_text.trim_end());
        }

        Ok(full_text)
    }
}

/// Text provider backed by pdf-extract.
#[derive(Debug, Clone, Copy, Default)]
pub struct PdfExtractBackend;

impl TextProvider for PdfExtractBackend {
    fn name(&self) -> &'static str {
        "pdf-extract"
    }

    fn extract(&self, data: &[u8]) -> String {
        match LoadedPdf::load(data).and_then(|pdf| pdf.extract_text()) {
            Ok(text) => text,
            Err(e) => {
                warn!("{} failed: {}", self.name(), e);
                String::new()
            }
        }
    }
}

/// Text provider backed by lopdf's content-stream text operators.
#[derive(Debug, Clone, Copy, Default)]
pub struct LopdfBackend;

impl TextProvider for LopdfBackend {
    fn name(&self) -> &'static str {
        "lopdf"
    }

    fn extract(&self, data: &[u8]) -> String {
        match LoadedPdf::load(data).and_then(|pdf| pdf.extract_page_texts()) {
            Ok(text) => text,
            Err(e) => {
                warn!("{} failed: {}", self.name(), e);
                String::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_rejects_garbage() {
        assert!(matches!(LoadedPdf::load(b"not a pdf"), Err(PdfError::Parse(_))));
    }

    #[test]
    fn test_backends_never_fail() {
        assert_eq!(PdfExtractBackend.extract(b"not a pdf"), "");
        assert_eq!(LopdfBackend.extract(&[]), "");
    }
}
