//! PDF page text extraction and page-subset writing using lopdf and pdf-extract.

use lopdf::Document;
use std::collections::HashSet;
use std::panic::{self, AssertUnwindSafe};
use std::path::Path;
use tracing::{debug, trace};

use super::{PageSink, PageSource, Result};
use crate::error::PdfError;
use crate::models::config::{PdfConfig, TextBackend};

/// A loaded PDF whose pages can be read and regrouped.
pub struct PdfDocument {
    document: Document,
    /// lopdf page numbers (1-based) in page order.
    page_numbers: Vec<u32>,
    /// Per-page text from pdf-extract, when that backend is selected.
    extracted: Option<std::result::Result<Vec<String>, String>>,
    compress: bool,
}

impl PdfDocument {
    /// Load a PDF file.
    pub fn open(path: &Path, config: &PdfConfig) -> Result<Self> {
        let data = std::fs::read(path)
            .map_err(|e| PdfError::Parse(format!("{}: {}", path.display(), e)))?;
        Self::from_bytes(&data, config)
    }

    /// Load a PDF from bytes.
    pub fn from_bytes(data: &[u8], config: &PdfConfig) -> Result<Self> {
        let mut doc = Document::load_mem(data).map_err(|e| PdfError::Parse(e.to_string()))?;

        // Handle PDFs with empty password encryption
        let raw_data = if doc.is_encrypted() {
            if doc.decrypt("").is_err() {
                return Err(PdfError::Encrypted);
            }
            debug!("Decrypted PDF with empty password");

            let mut decrypted_data = Vec::new();
            doc.save_to(&mut decrypted_data)
                .map_err(|e| PdfError::Parse(format!("Failed to save decrypted PDF: {}", e)))?;
            decrypted_data
        } else {
            data.to_vec()
        };

        let page_numbers: Vec<u32> = doc.get_pages().keys().copied().collect();
        if page_numbers.is_empty() {
            return Err(PdfError::NoPages);
        }

        let extracted = match config.text_backend {
            TextBackend::Lopdf => None,
            TextBackend::PdfExtract => Some(extract_all_pages(&raw_data)),
        };

        debug!("Loaded PDF with {} pages", page_numbers.len());
        Ok(Self {
            document: doc,
            page_numbers,
            extracted,
            compress: config.compress_output,
        })
    }

    fn page_number(&self, index: usize) -> Result<u32> {
        self.page_numbers
            .get(index)
            .copied()
            .ok_or(PdfError::InvalidPage(index))
    }
}

impl PageSource for PdfDocument {
    fn page_count(&self) -> usize {
        self.page_numbers.len()
    }

    fn page_text(&self, index: usize) -> Result<String> {
        match &self.extracted {
            None => {
                let page = self.page_number(index)?;
                self.document
                    .extract_text(&[page])
                    .map_err(|e| PdfError::TextExtraction {
                        page: index,
                        reason: e.to_string(),
                    })
            }
            Some(Ok(pages)) => pages.get(index).cloned().ok_or(PdfError::InvalidPage(index)),
            Some(Err(reason)) => Err(PdfError::TextExtraction {
                page: index,
                reason: reason.clone(),
            }),
        }
    }
}

impl PageSink for PdfDocument {
    fn write_pages(&self, pages: &[usize], path: &Path) -> Result<()> {
        let keep = pages
            .iter()
            .map(|&index| self.page_number(index))
            .collect::<Result<HashSet<u32>>>()?;
        let remove: Vec<u32> = self
            .page_numbers
            .iter()
            .copied()
            .filter(|n| !keep.contains(n))
            .collect();

        let mut doc = self.document.clone();
        doc.delete_pages(&remove);
        doc.prune_objects();
        if self.compress {
            doc.compress();
        }

        trace!("Writing {} pages to {}", keep.len(), path.display());
        doc.save(path).map_err(|e| PdfError::Write {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        Ok(())
    }
}

/// Run pdf-extract over the whole document, one string per page.
///
/// pdf-extract panics on some malformed input, so the call is isolated.
fn extract_all_pages(data: &[u8]) -> std::result::Result<Vec<String>, String> {
    let result = panic::catch_unwind(AssertUnwindSafe(|| {
        pdf_extract::extract_text_from_mem_by_pages(data)
    }));
    match result {
        Ok(Ok(pages)) => Ok(pages),
        Ok(Err(e)) => Err(e.to_string()),
        Err(_) => Err("pdf-extract panicked (malformed document)".to_string()),
    }
}
