//! PDF processing module.

mod extractor;

pub use extractor::PdfDocument;

use std::path::Path;

use crate::error::PdfError;

/// Result type for PDF operations.
pub type Result<T> = std::result::Result<T, PdfError>;

/// Ordered pages with per-page text.
pub trait PageSource {
    /// Number of pages.
    fn page_count(&self) -> usize;

    /// Extract text from the page at `index` (0-based).
    fn page_text(&self, index: usize) -> Result<String>;
}

/// Writes a subset of pages as a new document.
pub trait PageSink {
    /// Write the pages at `pages` (0-based, ascending) to `path`.
    fn write_pages(&self, pages: &[usize], path: &Path) -> Result<()>;
}
