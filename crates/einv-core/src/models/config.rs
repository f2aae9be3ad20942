//! Configuration structures for the splitting pipeline.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::invoice::patterns::{
    ACK_DATE_PATTERN, DEFAULT_FALLBACK_NAME, DOCUMENT_DATE_PATTERN, DOCUMENT_NUMBER_PATTERN,
    INVOICE_MARKER,
};

/// Main configuration for the einv pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EinvConfig {
    /// Working folders.
    pub folders: FolderConfig,

    /// Archive extraction configuration.
    pub archive: ArchiveConfig,

    /// Invoice marker extraction configuration.
    pub extraction: ExtractionConfig,

    /// PDF processing configuration.
    pub pdf: PdfConfig,
}

/// Folder layout: archives in, staging for extracted sources, output for split invoices.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FolderConfig {
    /// Folder scanned for ZIP archives.
    pub archives: PathBuf,

    /// Folder receiving the extracted consolidated PDFs.
    pub staging: PathBuf,

    /// Folder receiving one PDF per invoice.
    pub output: PathBuf,
}

impl Default for FolderConfig {
    fn default() -> Self {
        Self {
            archives: PathBuf::from("archives"),
            staging: PathBuf::from("einvoices"),
            output: PathBuf::from("output"),
        }
    }
}

/// Archive extraction configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ArchiveConfig {
    /// Name of the PDF member inside every archive.
    pub member_name: String,

    /// File extension of archives (without the dot).
    pub extension: String,
}

impl Default for ArchiveConfig {
    fn default() -> Self {
        Self {
            member_name: "einv1.pdf".to_string(),
            extension: "zip".to_string(),
        }
    }
}

/// Marker and field patterns.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Text whose presence marks the first page of an invoice.
    pub marker: String,

    /// Regex with one capture group for the document number.
    pub document_number_pattern: String,

    /// Regex with one capture group for the document date.
    pub document_date_pattern: String,

    /// Regex with one capture group for the acknowledgement date.
    pub ack_date_pattern: String,

    /// Output name used until the first marker page is seen.
    pub fallback_name: String,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            marker: INVOICE_MARKER.to_string(),
            document_number_pattern: DOCUMENT_NUMBER_PATTERN.to_string(),
            document_date_pattern: DOCUMENT_DATE_PATTERN.to_string(),
            ack_date_pattern: ACK_DATE_PATTERN.to_string(),
            fallback_name: DEFAULT_FALLBACK_NAME.to_string(),
        }
    }
}

/// Which library pulls text out of pages.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TextBackend {
    /// Per-page extraction through lopdf.
    #[default]
    Lopdf,
    /// Whole-document extraction through pdf-extract, split by page.
    PdfExtract,
}

/// PDF processing configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PdfConfig {
    /// Text extraction backend.
    pub text_backend: TextBackend,

    /// Compress streams in written output documents.
    pub compress_output: bool,
}

impl Default for PdfConfig {
    fn default() -> Self {
        Self {
            text_backend: TextBackend::Lopdf,
            compress_output: true,
        }
    }
}

impl EinvConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })?;
        std::fs::write(path, content)
    }
}
