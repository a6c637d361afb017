//! Input document model for the Vellum converter.
//!
//! This crate describes what a layered document looks like before it is
//! converted:
//! - **Layers** - flat records and the [`build_layer_tree`] hierarchy builder
//! - **Shapes** - decoded graphics with their paint and effects
//! - **Text** - rich text runs and the [`TextShaper`] collaborator
//! - **Store** - the [`RecordStore`] collaborator and a JSON-backed [`JsonStore`]
//!
//! All coordinates here are in source space, where Y grows upwards.

pub mod color;
pub mod decode;
pub mod font;
pub mod geometry;
pub mod layer;
pub mod shape;
pub mod store;
pub mod text;

pub use color::Color;
pub use decode::decode_graphics;
pub use font::{FontClass, FontDescriptor};
pub use geometry::{Point, Rect, Size};
pub use layer::{
    LayerId, LayerKind, LayerNode, LayerRecord, build_layer_tree, format_tree, print_tree,
};
pub use shape::{BlendMode, Graphic, LineJoin, Paint, PathOp, Shadow, ShapeRecord, Stroke};
pub use store::{Bitmap, JsonStore, LayerAttributes, RecordStore};
pub use text::{
    ApproximateShaper, Glyph, LineFragment, RichText, TextLayout, TextRun, TextShaper,
};
