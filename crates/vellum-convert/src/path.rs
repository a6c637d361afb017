//! Path re-encoding.
//!
//! Absolute source paths are rewritten as compact SVG path data. Each
//! coordinate group is preceded by its operator token only when the token
//! differs from the last one written. Straight segments pick whichever of
//! the horizontal/vertical shorthand, absolute, or relative forms is
//! shortest.

use vellum_common::number::format_float;
use vellum_common::{Diagnostics, WarningKind};
use vellum_model::{PathOp, Point};

use crate::frame::Frame;

const COMPONENT: &str = "path";

/// An SVG path operator token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token {
    /// `M`: absolute moveto.
    Move,
    /// `L`: absolute lineto.
    Line,
    /// `l`: relative lineto.
    RelativeLine,
    /// `h`: relative horizontal lineto.
    Horizontal,
    /// `v`: relative vertical lineto.
    Vertical,
    /// `C`: absolute cubic curveto.
    Curve,
    /// `Z`: closepath.
    Close,
}

impl Token {
    /// The token as written.
    #[must_use]
    pub const fn symbol(self) -> char {
        match self {
            Self::Move => 'M',
            Self::Line => 'L',
            Self::RelativeLine => 'l',
            Self::Horizontal => 'h',
            Self::Vertical => 'v',
            Self::Curve => 'C',
            Self::Close => 'Z',
        }
    }
}

/// Whether `next` must be written before its coordinates, given the last
/// token written.
///
/// Repeating a token is implicit in SVG path syntax, except after a moveto,
/// where further pairs would be read as linetos; a moveto is only ever
/// followed by a different token here, so the rule reduces to inequality.
#[must_use]
pub fn needs_token(last: Option<Token>, next: Token) -> bool {
    last != Some(next)
}

/// A subpath: its points, and whether it was closed.
struct Subpath {
    ops: Vec<PathOp>,
    closed: bool,
}

/// Split at every moveto and closepath.
fn split_subpaths(ops: &[PathOp]) -> Vec<Subpath> {
    let mut subpaths = Vec::new();
    let mut current = Vec::new();
    for op in ops {
        match op {
            PathOp::MoveTo(_) => {
                if !current.is_empty() {
                    subpaths.push(Subpath {
                        ops: std::mem::take(&mut current),
                        closed: false,
                    });
                }
                current.push(*op);
            }
            PathOp::ClosePath => subpaths.push(Subpath {
                ops: std::mem::take(&mut current),
                closed: true,
            }),
            PathOp::LineTo(_) | PathOp::CurveTo(..) => current.push(*op),
        }
    }
    if !current.is_empty() {
        subpaths.push(Subpath {
            ops: current,
            closed: false,
        });
    }
    subpaths
}

/// Writes path data while tracking the last token.
struct Encoder {
    out: String,
    last: Option<Token>,
}

impl Encoder {
    const fn new() -> Self {
        Self {
            out: String::new(),
            last: None,
        }
    }

    /// Text length of `args` under `token`, counting the token if it would be written.
    fn cost(&self, token: Token, args: &str) -> usize {
        let token_cost = if needs_token(self.last, token) { 2 } else { 0 };
        token_cost + args.len()
    }

    fn emit(&mut self, token: Token, args: &str) {
        if !self.out.is_empty() {
            self.out.push(' ');
        }
        if needs_token(self.last, token) {
            self.out.push(token.symbol());
            if !args.is_empty() {
                self.out.push(' ');
            }
        }
        self.out.push_str(args);
        self.last = Some(token);
    }
}

/// Output coordinates rounded to the precision they are written with, so
/// relative offsets add up to the absolute positions exactly.
fn rounded(p: Point) -> Point {
    let round = |v: f64| (v * 10_000.0).round() / 10_000.0;
    Point::new(round(p.x), round(p.y))
}

fn pair(p: Point) -> String {
    format!("{} {}", format_float(p.x), format_float(p.y))
}

/// Encode `ops` as SVG path data in `frame`'s output space.
///
/// Subpaths with fewer than two points are dropped. A subpath that does not
/// start with a moveto is skipped with a warning. A closed subpath's final
/// lineto back to its start is left to the closepath.
pub fn encode_path(ops: &[PathOp], frame: &Frame, diagnostics: &mut Diagnostics) -> String {
    let mut encoder = Encoder::new();

    for subpath in split_subpaths(ops) {
        if subpath.ops.len() < 2 {
            continue;
        }
        let PathOp::MoveTo(start) = subpath.ops[0] else {
            diagnostics.warn(
                WarningKind::UnknownFeature,
                COMPONENT,
                "subpath does not begin with a moveto",
            );
            continue;
        };

        let start = rounded(frame.point(start));
        encoder.emit(Token::Move, &pair(start));
        let mut current = start;

        let last_index = subpath.ops.len() - 1;
        for (index, op) in subpath.ops.iter().enumerate().skip(1) {
            match *op {
                PathOp::LineTo(target) => {
                    let target = rounded(frame.point(target));
                    if subpath.closed && index == last_index && target == start {
                        continue;
                    }
                    encode_line(&mut encoder, current, target);
                    current = target;
                }
                PathOp::CurveTo(c1, c2, end) => {
                    let (c1, c2, end) = (
                        rounded(frame.point(c1)),
                        rounded(frame.point(c2)),
                        rounded(frame.point(end)),
                    );
                    encoder.emit(
                        Token::Curve,
                        &format!("{} {} {}", pair(c1), pair(c2), pair(end)),
                    );
                    current = end;
                }
                // A second moveto or a closepath cannot occur inside a split subpath.
                PathOp::MoveTo(_) | PathOp::ClosePath => {}
            }
        }

        if subpath.closed {
            encoder.emit(Token::Close, "");
        }
    }

    encoder.out
}

fn encode_line(encoder: &mut Encoder, from: Point, to: Point) {
    let delta = Point::new(to.x - from.x, to.y - from.y);

    if encoder.last != Some(Token::RelativeLine) {
        if format_float(to.x) == format_float(from.x) {
            encoder.emit(Token::Vertical, &format_float(delta.y));
            return;
        }
        if format_float(to.y) == format_float(from.y) {
            encoder.emit(Token::Horizontal, &format_float(delta.x));
            return;
        }
    }

    let absolute = pair(to);
    let relative = pair(delta);
    if encoder.cost(Token::RelativeLine, &relative) < encoder.cost(Token::Line, &absolute) {
        encoder.emit(Token::RelativeLine, &relative);
    } else {
        encoder.emit(Token::Line, &absolute);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_needs_token() {
        assert!(needs_token(None, Token::Move));
        assert!(needs_token(Some(Token::Move), Token::Line));
        assert!(!needs_token(Some(Token::Curve), Token::Curve));
    }

    #[test]
    fn test_split_subpaths() {
        let p = Point::new(0.0, 0.0);
        let ops = [
            PathOp::MoveTo(p),
            PathOp::LineTo(p),
            PathOp::ClosePath,
            PathOp::MoveTo(p),
            PathOp::MoveTo(p),
            PathOp::LineTo(p),
        ];
        let subpaths = split_subpaths(&ops);
        let shape: Vec<(usize, bool)> = subpaths.iter().map(|s| (s.ops.len(), s.closed)).collect();
        assert_eq!(shape, vec![(2, true), (1, false), (2, false)]);
    }
}
