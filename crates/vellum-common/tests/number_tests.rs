//! Tests for SVG number formatting.

use quickcheck::TestResult;
use quickcheck_macros::quickcheck;
use vellum_common::number::{format_float, format_float_suffixed, format_list};

#[test]
fn test_strips_trailing_zeros() {
    assert_eq!(format_float(1.2), "1.2");
    assert_eq!(format_float(1.25), "1.25");
    assert_eq!(format_float(100.0), "100");
}

#[test]
fn test_strips_bare_decimal_point() {
    assert_eq!(format_float(2.0), "2");
    assert_eq!(format_float(0.0), "0");
}

#[test]
fn test_rounds_to_four_decimals() {
    assert_eq!(format_float(0.123_456), "0.1235");
    assert_eq!(format_float(3.000_04), "3");
    assert_eq!(format_float(-7.5), "-7.5");
}

#[test]
fn test_negative_zero_prints_as_zero() {
    assert_eq!(format_float(-0.0), "0");
    assert_eq!(format_float(-0.000_01), "0");
}

#[test]
fn test_suffix_is_appended() {
    assert_eq!(format_float_suffixed(12.0, "pt"), "12pt");
    assert_eq!(format_float_suffixed(0.5, "px"), "0.5px");
}

#[test]
fn test_format_list() {
    assert_eq!(format_list(&[1.0, 2.5, -3.25]), "1 2.5 -3.25");
    assert_eq!(format_list(&[]), "");
}

#[quickcheck]
fn prop_reparse_is_within_tolerance(value: f64) -> TestResult {
    if !value.is_finite() || value.abs() > 1e9 {
        return TestResult::discard();
    }
    let reparsed: f64 = format_float(value).parse().unwrap();
    TestResult::from_bool((reparsed - value).abs() <= 1e-4)
}

#[quickcheck]
fn prop_formatting_is_idempotent(value: f64) -> TestResult {
    if !value.is_finite() || value.abs() > 1e9 {
        return TestResult::discard();
    }
    let once = format_float(value);
    let twice = format_float(once.parse().unwrap());
    TestResult::from_bool(once == twice)
}
