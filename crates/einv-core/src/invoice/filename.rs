//! File name sanitizing for extracted document numbers.

use super::patterns::INVALID_FILENAME_CHARS;

/// Replace every character in `< > : " / \ | ? *` with a hyphen.
pub fn sanitize(name: &str) -> String {
    INVALID_FILENAME_CHARS.replace_all(name, "-").into_owned()
}
