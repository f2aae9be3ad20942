//! Ack date normalization.

use crate::error::DateFormatError;

/// Convert `dd-mm-yyyy` into `yyyymmdd`.
///
/// Only the shape is checked: the input must split into exactly three
/// hyphen-separated parts. Values are not validated against a calendar.
pub fn normalize_date(date: &str) -> Result<String, DateFormatError> {
    let mut parts = date.split('-');
    match (parts.next(), parts.next(), parts.next(), parts.next()) {
        (Some(day), Some(month), Some(year), None) => Ok(format!("{year}{month}{day}")),
        _ => Err(DateFormatError(date.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_date() {
        assert_eq!(normalize_date("05-01-2024").unwrap(), "20240105");
        assert_eq!(normalize_date("31-12-1999").unwrap(), "19991231");
    }

    #[test]
    fn test_no_calendar_validation() {
        assert_eq!(normalize_date("32-13-2024").unwrap(), "20241332");
    }

    #[test]
    fn test_wrong_component_count() {
        assert_eq!(
            normalize_date("05/01/2024"),
            Err(DateFormatError("05/01/2024".to_string()))
        );
        assert!(normalize_date("05-01").is_err());
        assert!(normalize_date("05-01-2024-1").is_err());
        assert!(normalize_date("").is_err());
    }

    #[test]
    fn test_components_stay_in_place() {
        // Distinct inputs map to distinct outputs
        let a = normalize_date("01-02-2024").unwrap();
        let b = normalize_date("02-01-2024").unwrap();
        assert_ne!(a, b);
        assert_eq!(&a[0..4], "2024");
        assert_eq!(&a[4..6], "02");
        assert_eq!(&a[6..8], "01");
    }
}
