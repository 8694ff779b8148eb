//! Default header stripping

use crate::client::default_headers;

/// Drop headers that equal one of the client's default headers.
///
/// A header is dropped only when its name matches case-insensitively and
/// its value matches exactly, so overridden defaults survive.
#[must_use]
pub fn strip_default_headers(headers: &[(String, String)]) -> Vec<(String, String)> {
    let defaults = default_headers();

    headers
        .iter()
        .filter(|(name, value)| {
            !defaults
                .iter()
                .any(|(d_name, d_value)| d_name.eq_ignore_ascii_case(name) && d_value == value)
        })
        .cloned()
        .collect()
}
