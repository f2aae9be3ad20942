//! Reports produced by the splitter and the archive pipeline.

use serde::Serialize;
use std::path::PathBuf;

use crate::error::{ArchiveError, EinvError, MarkerError};
use crate::invoice::InvoiceMarker;

/// One written invoice document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutputDocument {
    /// Sanitized document number (file stem).
    pub name: String,
    /// Written file.
    pub path: PathBuf,
    /// Source page indices (0-based) in the order written.
    pub pages: Vec<usize>,
}

/// Result of splitting one consolidated PDF.
#[derive(Debug)]
pub struct SplitReport {
    /// Consolidated PDF that was split.
    pub source: PathBuf,
    /// New stem for the source: the normalized ack date of page 0, or the original stem.
    pub rename_target: String,
    /// Page 0 had no marker, so `rename_target` is the original stem.
    pub fallback_rename: bool,
    /// Where the source ended up after renaming, if it was renamed.
    pub renamed_to: Option<PathBuf>,
    /// Number of pages in the source.
    pub page_count: usize,
    /// Marker pages seen, in page order.
    pub markers: Vec<InvoiceMarker>,
    /// Documents written, in flush order.
    pub outputs: Vec<OutputDocument>,
    /// Recoverable failures: unreadable pages, failed flushes, failed rename.
    pub errors: Vec<EinvError>,
    /// Set when a marker page lacked a required field; splitting stopped there.
    pub aborted: Option<MarkerError>,
}

impl SplitReport {
    /// Create an empty report for `source` whose rename target defaults to `stem`.
    pub fn new(source: impl Into<PathBuf>, stem: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            rename_target: stem.into(),
            fallback_rename: true,
            renamed_to: None,
            page_count: 0,
            markers: Vec::new(),
            outputs: Vec::new(),
            errors: Vec::new(),
            aborted: None,
        }
    }

    /// Whether every page was visited.
    pub fn is_complete(&self) -> bool {
        self.aborted.is_none()
    }

    /// Total pages across written documents.
    pub fn pages_written(&self) -> usize {
        self.outputs.iter().map(|o| o.pages.len()).sum()
    }

    /// Human-readable failure lines.
    pub fn failures(&self) -> Vec<String> {
        let mut lines: Vec<String> = self.errors.iter().map(|e| e.to_string()).collect();
        if let Some(aborted) = &self.aborted {
            lines.push(format!("aborted: {}", aborted));
        }
        lines
    }
}

/// Result of extracting one archive.
#[derive(Debug)]
pub struct ArchiveReport {
    /// Archive file.
    pub archive: PathBuf,
    /// Extracted and renamed PDF, or why extraction failed.
    pub result: Result<PathBuf, ArchiveError>,
}

/// Outcome of a failed source document that could not be opened.
#[derive(Debug)]
pub struct SourceFailure {
    /// Consolidated PDF.
    pub source: PathBuf,
    /// Why it could not be processed.
    pub error: EinvError,
}

/// Summary of a whole run.
#[derive(Debug, Default)]
pub struct RunSummary {
    /// One entry per archive found.
    pub archives: Vec<ArchiveReport>,
    /// One entry per source document that was opened.
    pub splits: Vec<SplitReport>,
    /// Source documents that could not be opened.
    pub unreadable: Vec<SourceFailure>,
}

impl RunSummary {
    /// Archives extracted successfully.
    pub fn archives_extracted(&self) -> usize {
        self.archives.iter().filter(|a| a.result.is_ok()).count()
    }

    /// Output documents written.
    pub fn documents_written(&self) -> usize {
        self.splits.iter().map(|s| s.outputs.len()).sum()
    }

    /// Every skipped or failed unit, one line each.
    pub fn failures(&self) -> Vec<String> {
        let mut lines = Vec::new();
        for archive in &self.archives {
            if let Err(e) = &archive.result {
                lines.push(e.to_string());
            }
        }
        for failure in &self.unreadable {
            lines.push(format!("{}: {}", failure.source.display(), failure.error));
        }
        for split in &self.splits {
            for line in split.failures() {
                lines.push(format!("{}: {}", split.source.display(), line));
            }
        }
        lines
    }
}
