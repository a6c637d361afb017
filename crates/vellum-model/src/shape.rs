//! Decoded vector shapes.
//!
//! Coordinates are absolute and in source space (Y up); the converter flips
//! them when it emits output.

use strum_macros::{Display, FromRepr};

use crate::color::Color;
use crate::geometry::{Point, Rect};
use crate::text::RichText;

/// One step of a vector path.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathOp {
    /// Start a new subpath at the point.
    MoveTo(Point),
    /// Straight segment to the point.
    LineTo(Point),
    /// Cubic Bézier segment: two control points, then the end point.
    CurveTo(Point, Point, Point),
    /// Close the current subpath.
    ClosePath,
}

/// Stroke corner style.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display, FromRepr)]
#[repr(u8)]
#[strum(serialize_all = "lowercase")]
pub enum LineJoin {
    /// Sharp corners (the SVG default).
    #[default]
    Miter = 0,
    /// Rounded corners.
    Round = 1,
    /// Cut-off corners.
    Bevel = 2,
}

/// Stroke parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stroke {
    /// Stroke color.
    pub color: Color,
    /// Line width.
    pub width: f64,
    /// Corner style.
    pub join: LineJoin,
    /// Dash and gap lengths for a dashed stroke.
    pub dash: Option<(f64, f64)>,
}

/// Fill and stroke of a shape. `None` means the part is not drawn.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Paint {
    /// Fill color, if filled.
    pub fill: Option<Color>,
    /// Stroke, if stroked.
    pub stroke: Option<Stroke>,
}

impl Paint {
    /// Whether neither fill nor stroke is drawn.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.fill.is_none() && self.stroke.is_none()
    }
}

/// Compositing mode, numbered as in Core Graphics and named as in CSS.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display, FromRepr)]
#[repr(u8)]
#[strum(serialize_all = "kebab-case")]
pub enum BlendMode {
    /// Plain source-over.
    #[default]
    Normal = 0,
    /// Multiply.
    Multiply = 1,
    /// Screen.
    Screen = 2,
    /// Overlay.
    Overlay = 3,
    /// Darken.
    Darken = 4,
    /// Lighten.
    Lighten = 5,
    /// Color dodge.
    ColorDodge = 6,
    /// Color burn.
    ColorBurn = 7,
    /// Soft light.
    SoftLight = 8,
    /// Hard light.
    HardLight = 9,
    /// Difference.
    Difference = 10,
    /// Exclusion.
    Exclusion = 11,
    /// Hue.
    Hue = 12,
    /// Saturation.
    Saturation = 13,
    /// Color.
    Color = 14,
    /// Luminosity.
    Luminosity = 15,
}

/// Drop shadow parameters of a single graphic.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Shadow {
    /// Shadow color including alpha.
    pub color: Color,
    /// Blur radius; zero means a hard shadow.
    pub blur_radius: f64,
    /// Offset in source space (Y up).
    pub offset: Point,
}

/// The geometry-bearing part of a graphic.
#[derive(Debug, Clone, PartialEq)]
pub enum ShapeRecord {
    /// A group of graphics rendered in order.
    Group {
        /// Child graphics.
        children: Vec<Graphic>,
    },
    /// An axis-aligned, optionally rounded rectangle.
    Rectangle {
        /// Source-space bounds.
        bounds: Rect,
        /// Corner radius, when rounded.
        corner_radius: Option<f64>,
        /// Fill and stroke.
        paint: Paint,
    },
    /// A block of rich text.
    TextArea {
        /// Source-space bounds of the text container.
        bounds: Rect,
        /// The text.
        text: RichText,
        /// Background fill and border.
        paint: Paint,
    },
    /// Any shape expressed as a path (ovals, lines, free paths).
    PathShape {
        /// Source-space bounds.
        bounds: Rect,
        /// Absolute path operations.
        path: Vec<PathOp>,
        /// Fill and stroke.
        paint: Paint,
    },
}

impl ShapeRecord {
    /// The shape's bounds; groups report the union of their children.
    #[must_use]
    pub fn bounds(&self) -> Option<Rect> {
        match self {
            Self::Group { children } => {
                let corners: Vec<Point> = children
                    .iter()
                    .filter_map(|child| child.shape.bounds())
                    .flat_map(|r| [Point::new(r.x, r.y), Point::new(r.max_x(), r.max_y())])
                    .collect();
                Rect::bounding(&corners)
            }
            Self::Rectangle { bounds, .. }
            | Self::TextArea { bounds, .. }
            | Self::PathShape { bounds, .. } => Some(*bounds),
        }
    }
}

/// A shape together with its per-graphic effects.
#[derive(Debug, Clone, PartialEq)]
pub struct Graphic {
    /// The shape.
    pub shape: ShapeRecord,
    /// Drop shadow, when enabled.
    pub shadow: Option<Shadow>,
    /// Counter-clockwise rotation in degrees about the bounds centre.
    pub rotation: f64,
    /// Compositing mode.
    pub blend: BlendMode,
    /// Whether edges are anti-aliased.
    pub anti_alias: bool,
}

impl Graphic {
    /// A graphic with no effects.
    #[must_use]
    pub const fn plain(shape: ShapeRecord) -> Self {
        Self {
            shape,
            shadow: None,
            rotation: 0.0,
            blend: BlendMode::Normal,
            anti_alias: true,
        }
    }
}
