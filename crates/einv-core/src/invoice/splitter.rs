//! Page-accumulation state machine that splits a consolidated PDF into invoices.

use std::collections::HashSet;
use std::path::Path;

use tracing::{debug, error, info, warn};

use super::dates::normalize_date;
use super::marker::InvoicePatterns;
use crate::models::report::{OutputDocument, SplitReport};
use crate::pdf::{PageSink, PageSource};

/// Splits a page sequence into one document per invoice.
///
/// Every marker page after the first starts a new document. Pages before
/// the first marker are written under the fallback name.
#[derive(Debug, Clone, Default)]
pub struct InvoiceSplitter {
    patterns: InvoicePatterns,
}

/// Pages collected for the invoice currently being assembled.
struct Accumulator {
    name: String,
    pages: Vec<usize>,
}

impl InvoiceSplitter {
    /// Create a splitter with the given patterns.
    pub fn new(patterns: InvoicePatterns) -> Self {
        Self { patterns }
    }

    /// Split `doc` into `output_dir/<document number>.pdf` files.
    ///
    /// `source_stem` is the rename target when page 0 carries no marker.
    /// The source itself is not renamed here. `output_dir` must exist.
    pub fn split<D>(&self, doc: &D, source: &Path, source_stem: &str, output_dir: &Path) -> SplitReport
    where
        D: PageSource + PageSink,
    {
        let mut report = SplitReport::new(source, source_stem);
        report.page_count = doc.page_count();

        let mut acc = Accumulator {
            name: self.patterns.fallback_name().to_string(),
            pages: Vec::new(),
        };
        let mut written = HashSet::new();

        for index in 0..report.page_count {
            let text = match doc.page_text(index) {
                Ok(text) => text,
                Err(e) => {
                    warn!("Error extracting text from page {} of {}: {}", index, source.display(), e);
                    report.errors.push(e.into());
                    String::new()
                }
            };

            let marker = match self.patterns.scan(index, &text) {
                Ok(marker) => marker,
                Err(e) => {
                    error!("Stopping split of {}: {}", source.display(), e);
                    report.aborted = Some(e);
                    return report;
                }
            };

            if let Some(marker) = marker {
                if index == 0 {
                    match normalize_date(&marker.ack_date) {
                        Ok(target) => {
                            report.rename_target = target;
                            report.fallback_rename = false;
                        }
                        Err(e) => {
                            warn!("Keeping original name for {}: {}", source.display(), e);
                            report.errors.push(e.into());
                        }
                    }
                } else if !acc.pages.is_empty() {
                    self.flush(doc, &mut acc, output_dir, &mut written, &mut report);
                }
                debug!("Page {} starts document {}", index, marker.document_number);
                acc.name = marker.document_number.clone();
                report.markers.push(marker);
            }

            acc.pages.push(index);
        }

        if !acc.pages.is_empty() {
            self.flush(doc, &mut acc, output_dir, &mut written, &mut report);
        }

        if report.fallback_rename && report.page_count > 0 {
            warn!(
                "No marker on first page of {}, keeping name {}",
                source.display(),
                report.rename_target
            );
        }

        report
    }

    /// Write the accumulated pages and start a new, empty accumulator.
    ///
    /// A failed write drops those pages; splitting continues.
    fn flush<D: PageSink>(
        &self,
        doc: &D,
        acc: &mut Accumulator,
        output_dir: &Path,
        written: &mut HashSet<String>,
        report: &mut SplitReport,
    ) {
        let pages = std::mem::take(&mut acc.pages);
        let path = output_dir.join(format!("{}.pdf", acc.name));

        if !written.insert(acc.name.clone()) {
            warn!("Document number {} repeats in {}, overwriting {}", acc.name, report.source.display(), path.display());
        }

        match doc.write_pages(&pages, &path) {
            Ok(()) => {
                info!("Wrote {} ({} pages)", path.display(), pages.len());
                report.outputs.push(OutputDocument {
                    name: acc.name.clone(),
                    path,
                    pages,
                });
            }
            Err(e) => {
                error!("Error writing file {}.pdf: {}", acc.name, e);
                report.errors.push(e.into());
            }
        }
    }
}
