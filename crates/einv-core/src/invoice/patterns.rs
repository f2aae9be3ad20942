//! Marker text and regex patterns for e-invoice pages.

use lazy_static::lazy_static;
use regex::Regex;

/// Text that appears on the first page of every invoice.
pub const INVOICE_MARKER: &str = "e-Invoice Details";

/// Everything between the document number label and the IGST column header.
pub const DOCUMENT_NUMBER_PATTERN: &str = r"Document No\. :\s*([\w\s\W]+?)\s*IGST";

/// `dd-mm-yyyy` after the document date label.
pub const DOCUMENT_DATE_PATTERN: &str = r"Document Date : (\d{2}-\d{2}-\d{4})";

/// `dd-mm-yyyy` after the acknowledgement date label.
pub const ACK_DATE_PATTERN: &str = r"Ack Date : (\d{2}-\d{2}-\d{4})";

/// Output name used when no marker page has been seen yet.
pub const DEFAULT_FALLBACK_NAME: &str = "einvoice";

lazy_static! {
    pub static ref DOCUMENT_NUMBER: Regex = Regex::new(DOCUMENT_NUMBER_PATTERN).unwrap();

    pub static ref DOCUMENT_DATE: Regex = Regex::new(DOCUMENT_DATE_PATTERN).unwrap();

    pub static ref ACK_DATE: Regex = Regex::new(ACK_DATE_PATTERN).unwrap();

    // Characters Windows refuses in file names
    pub static ref INVALID_FILENAME_CHARS: Regex = Regex::new(r#"[<>:"/\\|?*]"#).unwrap();
}

/// Return the first capture group of `pattern` in `text`.
///
/// Patterns without a capture group never match.
pub fn extract(text: &str, pattern: &Regex) -> Option<String> {
    pattern
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}
