//! Coordinate mapping from document space to output space.
//!
//! Document space has its origin at the bottom-left with Y growing upwards;
//! output space has its origin at the top-left with Y growing downwards.
//! A [`Frame`] is the mapping for one layer: X is translated by the layer's
//! left edge and Y is mirrored about the layer's top edge.

use vellum_model::{Point, Rect};

/// Output-space mapping for the contents of one layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    /// Output X of the layer's local origin.
    pub origin_x: f64,
    /// Output Y of the layer's local origin.
    pub origin_y: f64,
}

impl Frame {
    /// A frame with an explicit origin.
    #[must_use]
    pub const fn new(origin_x: f64, origin_y: f64) -> Self {
        Self { origin_x, origin_y }
    }

    /// The frame of a layer occupying `layer` in a document `document_height`
    /// tall.
    ///
    /// Frames are always relative to the whole document; a nested layer does
    /// not inherit its parent's offset.
    #[must_use]
    pub fn for_layer(layer: Rect, document_height: f64) -> Self {
        let top_y = document_height - layer.y - layer.height;
        Self::new(layer.x, top_y + layer.height)
    }

    /// Output X of a local X.
    #[must_use]
    pub fn x(&self, x: f64) -> f64 {
        self.origin_x + x
    }

    /// Output Y of a local Y.
    #[must_use]
    pub fn y(&self, y: f64) -> f64 {
        self.origin_y - y
    }

    /// Output position of a local point.
    #[must_use]
    pub fn point(&self, p: Point) -> Point {
        Point::new(self.x(p.x), self.y(p.y))
    }

    /// Output rectangle of a local rectangle; the origin moves to the top-left corner.
    #[must_use]
    pub fn rect(&self, r: Rect) -> Rect {
        Rect::new(self.x(r.x), self.y(r.max_y()), r.width, r.height)
    }

    /// Output displacement of a local displacement.
    #[must_use]
    pub fn delta(d: Point) -> Point {
        Point::new(d.x, -d.y)
    }
}
