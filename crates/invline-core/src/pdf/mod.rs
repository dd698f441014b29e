//! Document text providers.
//!
//! Turning a PDF into text is delegated to interchangeable backends. A
//! backend never fails: an unreadable document yields an empty string and
//! the caller moves on to the next backend.

#[cfg(feature = "pdf")]
mod extractor;

#[cfg(feature = "pdf")]
pub use extractor::{LoadedPdf, LopdfBackend, PdfExtractBackend};

use std::panic::{self, AssertUnwindSafe};

use tracing::{debug, warn};

use crate::models::config::TextBackend;

/// Something that turns document bytes into plain text.
pub trait TextProvider {
    /// Backend name used in logs and results.
    fn name(&self) -> &'static str;

    /// Extract text. Returns an empty string on failure.
    fn extract(&self, data: &[u8]) -> String;
}

/// Passthrough for documents that are already text.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainTextBackend;

impl TextProvider for PlainTextBackend {
    fn name(&self) -> &'static str {
        "text"
    }

    fn extract(&self, data: &[u8]) -> String {
        String::from_utf8_lossy(data).into_owned()
    }
}

/// Run a provider, turning a panic inside the backend into empty text.
pub fn extract_guarded(provider: &dyn TextProvider, data: &[u8]) -> String {
    match panic::catch_unwind(AssertUnwindSafe(|| provider.extract(data))) {
        Ok(text) => text,
        Err(payload) => {
            warn!("{} panicked: {}", provider.name(), panic_message(payload.as_ref()));
            String::new()
        }
    }
}

pub(crate) fn panic_message(payload: &(dyn std::any::Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("unknown panic")
}

/// Instantiate the configured PDF backends, in order.
pub fn providers_for(backends: &[TextBackend]) -> Vec<Box<dyn TextProvider>> {
    backends.iter().filter_map(|b| provider_for(*b)).collect()
}

#[cfg(feature = "pdf")]
fn provider_for(backend: TextBackend) -> Option<Box<dyn TextProvider>> {
    Some(match backend {
        TextBackend::PdfExtract => Box::new(PdfExtractBackend),
        TextBackend::Lopdf => Box::new(LopdfBackend),
    })
}

#[cfg(not(feature = "pdf"))]
fn provider_for(backend: TextBackend) -> Option<Box<dyn TextProvider>> {
    warn!("PDF support not compiled in, skipping {:?}", backend);
    None
}

/// Text from the first provider that yields any.
///
/// Returns the provider name alongside the text.
pub fn extract_with_fallback(
    providers: &[Box<dyn TextProvider>],
    data: &[u8],
) -> Option<(&'static str, String)> {
    for provider in providers {
        let text = extract_guarded(provider.as_ref(), data);
        if !text.trim().is_empty() {
            debug!("Text extracted with {} ({} chars)", provider.name(), text.len());
            return Some((provider.name(), text));
        }
        warn!("{} produced no text", provider.name());
    }
    None
}
