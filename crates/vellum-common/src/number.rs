//! Compact numeric formatting for SVG attribute values.

/// Format `value` with at most four decimals and no redundant zeros.
///
/// The value is rendered with fixed four-decimal precision, trailing zeros
/// are stripped, and a bare trailing decimal point is removed. Negative zero
/// (including values that round to it) prints as `0`.
///
/// # Example
/// ```
/// use vellum_common::number::format_float;
/// assert_eq!(format_float(1.2), "1.2");
/// assert_eq!(format_float(2.0), "2");
/// assert_eq!(format_float(-0.00001), "0");
/// ```
#[must_use]
pub fn format_float(value: f64) -> String {
    let mut text = format!("{value:.4}");
    if text.contains('.') {
        let trimmed = text.trim_end_matches('0').trim_end_matches('.').len();
        text.truncate(trimmed);
    }
    if text == "-0" {
        let _ = text.remove(0);
    }
    text
}

/// Like [`format_float`], with `suffix` (a unit such as `"pt"`) appended.
#[must_use]
pub fn format_float_suffixed(value: f64, suffix: &str) -> String {
    let mut text = format_float(value);
    text.push_str(suffix);
    text
}

/// Format a list of values separated by single spaces.
#[must_use]
pub fn format_list(values: &[f64]) -> String {
    values
        .iter()
        .map(|&v| format_float(v))
        .collect::<Vec<_>>()
        .join(" ")
}
