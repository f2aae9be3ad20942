//! Core library for splitting consolidated e-invoice PDFs.
//!
//! This crate provides:
//! - ZIP archive extraction of the consolidated PDF
//! - Invoice marker detection (document number, ack date) on page text
//! - The page-accumulation splitter writing one PDF per invoice
//! - A pipeline tying folders, archives and splitting together

pub mod archive;
pub mod error;
pub mod folders;
pub mod invoice;
pub mod models;
pub mod pdf;
pub mod pipeline;

pub use error::{ArchiveError, DateFormatError, EinvError, MarkerError, PdfError, Result};
pub use invoice::{InvoiceMarker, InvoicePatterns, InvoiceSplitter, normalize_date, sanitize};
pub use models::config::EinvConfig;
pub use models::report::{OutputDocument, RunSummary, SplitReport};
pub use pdf::{PageSink, PageSource, PdfDocument};
pub use pipeline::{ArchivePipeline, RunProgress};
