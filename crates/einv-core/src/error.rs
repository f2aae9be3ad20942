//! Error types for the einv-core library.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for the einv library.
#[derive(Error, Debug)]
pub enum EinvError {
    /// Archive extraction error.
    #[error("archive error: {0}")]
    Archive(#[from] ArchiveError),

    /// PDF reading or writing error.
    #[error("PDF error: {0}")]
    Pdf(#[from] PdfError),

    /// Marker page could not be parsed.
    #[error("marker error: {0}")]
    Marker(#[from] MarkerError),

    /// Date string did not have the expected shape.
    #[error("date error: {0}")]
    DateFormat(#[from] DateFormatError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors related to ZIP archives.
#[derive(Error, Debug)]
pub enum ArchiveError {
    /// The file could not be opened.
    #[error("failed to open {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file is not a valid ZIP archive.
    #[error("{path} is not a valid ZIP file: {reason}")]
    Invalid { path: PathBuf, reason: String },

    /// The expected member is not present in the archive.
    #[error("{member} not found in {path}")]
    MemberNotFound { path: PathBuf, member: String },

    /// Extracting or renaming the member failed.
    #[error("failed to extract {member} from {path}: {source}")]
    Extract {
        path: PathBuf,
        member: String,
        #[source]
        source: std::io::Error,
    },
}

/// Errors related to PDF processing.
#[derive(Error, Debug)]
pub enum PdfError {
    /// Failed to open/parse the PDF file.
    #[error("failed to parse PDF: {0}")]
    Parse(String),

    /// Failed to extract text from a page.
    #[error("failed to extract text from page {page}: {reason}")]
    TextExtraction { page: usize, reason: String },

    /// The PDF is encrypted and cannot be processed.
    #[error("PDF is encrypted")]
    Encrypted,

    /// The PDF is empty or has no pages.
    #[error("PDF has no pages")]
    NoPages,

    /// Invalid page index requested.
    #[error("invalid page index: {0}")]
    InvalidPage(usize),

    /// Failed to write a page subset to disk.
    #[error("failed to write {path}: {reason}")]
    Write { path: PathBuf, reason: String },
}

/// A marker page is missing a field that must accompany the marker.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MarkerError {
    /// No document number between the label and its terminator.
    #[error("page {page}: marker present but document number not found")]
    MissingDocumentNumber { page: usize },

    /// No acknowledgement date after its label.
    #[error("page {page}: marker present but ack date not found")]
    MissingAckDate { page: usize },
}

/// A date string is not `dd-mm-yyyy`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("expected dd-mm-yyyy, got {0:?}")]
pub struct DateFormatError(pub String);

/// Result type for the einv library.
pub type Result<T> = std::result::Result<T, EinvError>;
