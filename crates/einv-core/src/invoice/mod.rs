//! Invoice boundary detection and splitting.

mod dates;
mod filename;
mod marker;
pub mod patterns;
mod splitter;

pub use dates::normalize_date;
pub use filename::sanitize;
pub use marker::{InvoiceMarker, InvoicePatterns};
pub use patterns::extract;
pub use splitter::InvoiceSplitter;
