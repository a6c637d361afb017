//! Fill, stroke and color attributes.

use vellum_common::number::{format_float, format_list};
use vellum_dom::ElementData;
use vellum_model::{Color, LineJoin, Paint, Stroke};

/// Set `fill`/`stroke` and their details on a shape element.
///
/// A part that is not drawn is written as `none` so that nothing is
/// inherited from enclosing groups.
pub fn apply_paint(element: &mut ElementData, paint: &Paint) {
    match paint.fill {
        Some(color) => {
            element.set_attr("fill", color.to_svg());
            element.set_attr("fill-opacity", format_float(color.a));
        }
        None => element.set_attr("fill", "none"),
    }
    match &paint.stroke {
        Some(stroke) => apply_stroke(element, stroke),
        None => element.set_attr("stroke", "none"),
    }
}

fn apply_stroke(element: &mut ElementData, stroke: &Stroke) {
    element.set_attr("stroke", stroke.color.to_svg());
    element.set_attr("stroke-opacity", format_float(stroke.color.a));
    element.set_attr("stroke-width", format_float(stroke.width));
    if stroke.join != LineJoin::Miter {
        element.set_attr("stroke-linejoin", stroke.join.to_string());
    }
    if let Some((dash, gap)) = stroke.dash {
        element.set_attr("stroke-dasharray", format_list(&[dash, gap]));
    }
}

/// Set a color attribute, plus `<name>-opacity` when not fully opaque.
pub fn apply_color(element: &mut ElementData, name: &str, color: Color) {
    element.set_attr(name, color.to_svg());
    if color.a < 1.0 {
        element.set_attr(&format!("{name}-opacity"), format_float(color.a));
    }
}
