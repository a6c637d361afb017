//! Tests for path re-encoding.

use quickcheck::TestResult;
use quickcheck_macros::quickcheck;
use vellum_common::{Diagnostics, WarningKind};
use vellum_convert::Frame;
use vellum_convert::path::encode_path;
use vellum_model::{PathOp, Point};

fn m(x: f64, y: f64) -> PathOp {
    PathOp::MoveTo(Point::new(x, y))
}

fn l(x: f64, y: f64) -> PathOp {
    PathOp::LineTo(Point::new(x, y))
}

fn c(points: [(f64, f64); 3]) -> PathOp {
    let [a, b, e] = points.map(|(x, y)| Point::new(x, y));
    PathOp::CurveTo(a, b, e)
}

fn encode(ops: &[PathOp], frame: Frame) -> String {
    let mut diagnostics = Diagnostics::new();
    let data = encode_path(ops, &frame, &mut diagnostics);
    assert!(diagnostics.is_empty(), "unexpected warnings: {diagnostics:?}");
    data
}

#[test]
fn test_closed_triangle() {
    let ops = [m(0.0, 0.0), l(10.0, 0.0), l(5.0, 10.0), PathOp::ClosePath];
    assert_eq!(encode(&ops, Frame::new(0.0, 10.0)), "M 0 10 h 10 L 5 0 Z");
}

#[test]
fn test_closed_triangle_at_zero_origin() {
    let ops = [m(0.0, 0.0), l(10.0, 0.0), l(5.0, 10.0), PathOp::ClosePath];
    // Source Y points up, so the apex lands above the baseline.
    assert_eq!(encode(&ops, Frame::new(0.0, 0.0)), "M 0 0 h 10 L 5 -10 Z");
}

#[test]
fn test_closing_segment_is_elided() {
    let ops = [
        m(0.0, 0.0),
        l(10.0, 0.0),
        l(5.0, 10.0),
        l(0.0, 0.0),
        PathOp::ClosePath,
    ];
    assert_eq!(encode(&ops, Frame::new(0.0, 10.0)), "M 0 10 h 10 L 5 0 Z");
}

#[test]
fn test_closing_segment_kept_when_open() {
    let ops = [m(0.0, 0.0), l(10.0, 0.0), l(0.0, 0.0)];
    assert_eq!(encode(&ops, Frame::new(0.0, 0.0)), "M 0 0 h 10 -10");
}

#[test]
fn test_vertical_shorthand_is_flipped() {
    let ops = [m(0.0, 0.0), l(0.0, 5.0)];
    assert_eq!(encode(&ops, Frame::new(0.0, 0.0)), "M 0 0 v -5");
}

#[test]
fn test_relative_when_shorter() {
    let ops = [m(100.5, 200.25), l(101.5, 201.25), l(102.5, 202.25)];
    assert_eq!(
        encode(&ops, Frame::new(0.0, 0.0)),
        "M 100.5 -200.25 l 1 -1 1 -1"
    );
}

#[test]
fn test_no_shorthand_while_relative() {
    let ops = [m(100.5, 200.25), l(101.5, 201.25), l(101.5, 205.25)];
    assert_eq!(
        encode(&ops, Frame::new(0.0, 0.0)),
        "M 100.5 -200.25 l 1 -1 0 -4"
    );
}

#[test]
fn test_tie_prefers_absolute() {
    let ops = [m(0.0, 0.0), l(1.0, 1.0)];
    assert_eq!(encode(&ops, Frame::new(0.0, 0.0)), "M 0 0 L 1 -1");
}

#[test]
fn test_curves_are_absolute_and_share_token() {
    let ops = [
        m(0.0, 0.0),
        c([(1.0, 1.0), (2.0, 2.0), (3.0, 0.0)]),
        c([(4.0, -1.0), (5.0, -2.0), (6.0, 0.0)]),
    ];
    assert_eq!(
        encode(&ops, Frame::new(0.0, 0.0)),
        "M 0 0 C 1 -1 2 -2 3 0 4 1 5 2 6 0"
    );
}

#[test]
fn test_new_subpath_repeats_move() {
    let ops = [m(0.0, 0.0), l(5.0, 0.0), m(10.0, 10.0), l(10.0, 20.0)];
    assert_eq!(
        encode(&ops, Frame::new(0.0, 0.0)),
        "M 0 0 h 5 M 10 -10 v -10"
    );
}

#[test]
fn test_frame_translation_and_rounding() {
    let ops = [m(0.123_456, 0.0), l(1.0 / 3.0, 2.0)];
    assert_eq!(
        encode(&ops, Frame::new(10.0, 100.0)),
        "M 10.1235 100 l 0.2098 -2"
    );
}

#[test]
fn test_degenerate_subpaths() {
    let ops = [
        m(5.0, 5.0),
        m(0.0, 0.0),
        l(0.0, 1.0),
        PathOp::ClosePath,
        l(3.0, 3.0),
        l(4.0, 4.0),
    ];
    let mut diagnostics = Diagnostics::new();
    let data = encode_path(&ops, &Frame::new(0.0, 0.0), &mut diagnostics);

    assert_eq!(data, "M 0 0 v -1 Z");
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics.warnings()[0].kind, WarningKind::UnknownFeature);
}

#[test]
fn test_empty_path() {
    assert_eq!(encode(&[], Frame::new(0.0, 0.0)), "");
    assert_eq!(encode(&[m(1.0, 1.0)], Frame::new(0.0, 0.0)), "");
}

/// A closed subpath ends with a close command, and an explicit final
/// segment back to the start changes nothing.
#[quickcheck]
fn prop_closing_segment_never_written(points: Vec<(i16, i16)>) -> TestResult {
    if points.len() < 2 || points.last() == points.first() {
        return TestResult::discard();
    }
    let points: Vec<Point> = points
        .into_iter()
        .map(|(x, y)| Point::new(f64::from(x), f64::from(y)))
        .collect();

    let mut ops = vec![PathOp::MoveTo(points[0])];
    ops.extend(points[1..].iter().map(|p| PathOp::LineTo(*p)));
    let mut explicit = ops.clone();
    explicit.push(PathOp::LineTo(points[0]));
    ops.push(PathOp::ClosePath);
    explicit.push(PathOp::ClosePath);

    let frame = Frame::new(0.0, 0.0);
    let implicit = encode(&ops, frame);
    TestResult::from_bool(implicit.ends_with('Z') && implicit == encode(&explicit, frame))
}
