//! Invoice marker detection on page text.

use regex::Regex;
use serde::Serialize;

use super::filename::sanitize;
use super::patterns::{self, extract};
use crate::error::{EinvError, MarkerError, Result};
use crate::models::config::ExtractionConfig;

/// Fields read from a page that carries the invoice marker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InvoiceMarker {
    /// Page index (0-based) the marker was found on.
    pub page: usize,
    /// Document number, already sanitized for use as a file name.
    pub document_number: String,
    /// Document date as printed (`dd-mm-yyyy`), if present.
    pub document_date: Option<String>,
    /// Acknowledgement date as printed (`dd-mm-yyyy`).
    pub ack_date: String,
}

/// Compiled marker configuration.
#[derive(Debug, Clone)]
pub struct InvoicePatterns {
    marker: String,
    document_number: Regex,
    document_date: Regex,
    ack_date: Regex,
    fallback_name: String,
}

impl InvoicePatterns {
    /// Compile the patterns from an extraction config.
    pub fn from_config(config: &ExtractionConfig) -> Result<Self> {
        if config.marker.is_empty() {
            return Err(EinvError::Config("marker must not be empty".to_string()));
        }

        Ok(Self {
            marker: config.marker.clone(),
            document_number: compile("document_number_pattern", &config.document_number_pattern)?,
            document_date: compile("document_date_pattern", &config.document_date_pattern)?,
            ack_date: compile("ack_date_pattern", &config.ack_date_pattern)?,
            fallback_name: config.fallback_name.clone(),
        })
    }

    /// Name used for pages that precede any marker.
    pub fn fallback_name(&self) -> &str {
        &self.fallback_name
    }

    /// Whether `text` contains the marker.
    pub fn is_marker_page(&self, text: &str) -> bool {
        text.contains(&self.marker)
    }

    /// Scan one page.
    ///
    /// Returns `Ok(None)` for continuation pages. A marker page must also
    /// carry a document number and an ack date.
    pub fn scan(&self, page: usize, text: &str) -> std::result::Result<Option<InvoiceMarker>, MarkerError> {
        if !self.is_marker_page(text) {
            return Ok(None);
        }

        let ack_date =
            extract(text, &self.ack_date).ok_or(MarkerError::MissingAckDate { page })?;
        let document_number = extract(text, &self.document_number)
            .ok_or(MarkerError::MissingDocumentNumber { page })?;

        Ok(Some(InvoiceMarker {
            page,
            document_number: sanitize(&document_number),
            document_date: extract(text, &self.document_date),
            ack_date,
        }))
    }
}

impl Default for InvoicePatterns {
    fn default() -> Self {
        Self {
            marker: patterns::INVOICE_MARKER.to_string(),
            document_number: patterns::DOCUMENT_NUMBER.clone(),
            document_date: patterns::DOCUMENT_DATE.clone(),
            ack_date: patterns::ACK_DATE.clone(),
            fallback_name: patterns::DEFAULT_FALLBACK_NAME.to_string(),
        }
    }
}

fn compile(field: &str, pattern: &str) -> Result<Regex> {
    let regex = Regex::new(pattern)
        .map_err(|e| EinvError::Config(format!("invalid {}: {}", field, e)))?;
    if regex.captures_len() < 2 {
        return Err(EinvError::Config(format!(
            "{} needs a capture group: {}",
            field, pattern
        )));
    }
    Ok(regex)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn marker_page(doc_no: &str, ack: &str) -> String {
        format!(
            "e-Invoice Details\nAck Date : {ack}\nDocument No. : {doc_no}\nIGST\nDocument Date : 02-01-2024\n"
        )
    }

    #[test]
    fn test_scan_marker_page() {
        let patterns = InvoicePatterns::default();
        let marker = patterns.scan(3, &marker_page("INV/9", "05-01-2024")).unwrap();

        assert_eq!(
            marker,
            Some(InvoiceMarker {
                page: 3,
                document_number: "INV-9".to_string(),
                document_date: Some("02-01-2024".to_string()),
                ack_date: "05-01-2024".to_string(),
            })
        );
    }

    #[test]
    fn test_scan_continuation_page() {
        let patterns = InvoicePatterns::default();
        assert_eq!(patterns.scan(1, "Item 1  100.00\nItem 2  50.00"), Ok(None));
        assert_eq!(patterns.scan(1, ""), Ok(None));
    }

    #[test]
    fn test_scan_missing_fields() {
        let patterns = InvoicePatterns::default();

        let no_ack = "e-Invoice Details\nDocument No. : X\nIGST";
        assert_eq!(
            patterns.scan(2, no_ack),
            Err(MarkerError::MissingAckDate { page: 2 })
        );

        let no_doc = "e-Invoice Details\nAck Date : 01-01-2024\n";
        assert_eq!(
            patterns.scan(0, no_doc),
            Err(MarkerError::MissingDocumentNumber { page: 0 })
        );
    }

    #[test]
    fn test_document_date_optional() {
        let patterns = InvoicePatterns::default();
        let text = "e-Invoice Details\nAck Date : 01-01-2024\nDocument No. : X\nIGST";
        let marker = patterns.scan(0, text).unwrap().unwrap();
        assert_eq!(marker.document_date, None);
    }

    #[test]
    fn test_from_config_matches_default() {
        let patterns = InvoicePatterns::from_config(&ExtractionConfig::default()).unwrap();
        let page = marker_page("A:1", "09-09-2023");
        assert_eq!(
            patterns.scan(0, &page).unwrap(),
            InvoicePatterns::default().scan(0, &page).unwrap()
        );
        assert_eq!(patterns.fallback_name(), "einvoice");
    }

    #[test]
    fn test_from_config_rejects_bad_patterns() {
        let mut config = ExtractionConfig::default();
        config.ack_date_pattern = "(unclosed".to_string();
        assert!(InvoicePatterns::from_config(&config).is_err());

        let mut config = ExtractionConfig::default();
        config.document_number_pattern = "no group".to_string();
        assert!(InvoicePatterns::from_config(&config).is_err());

        let mut config = ExtractionConfig::default();
        config.marker.clear();
        assert!(InvoicePatterns::from_config(&config).is_err());
    }
}
