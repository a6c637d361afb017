//! Per-shape rendering.

use vellum_common::number::format_float;
use vellum_dom::{DomTree, ElementData, NodeId};
use vellum_model::{BlendMode, Graphic, Paint, Point, Rect, ShapeRecord, TextShaper};

use crate::context::GenerationContext;
use crate::frame::Frame;
use crate::paint::apply_paint;
use crate::path::encode_path;
use crate::shadow::attach_shadow;
use crate::text::{append_text, flatten_text};

/// Render one graphic into `parent`.
///
/// Returns the element that carries the graphic's effects, or `None` when
/// nothing was drawn (an unpainted shape, an empty path or an empty group).
pub fn render_graphic(
    tree: &mut DomTree,
    parent: NodeId,
    graphic: &Graphic,
    frame: &Frame,
    ctx: &mut GenerationContext,
    shaper: &dyn TextShaper,
) -> Option<NodeId> {
    let node = match &graphic.shape {
        ShapeRecord::Group { children } => {
            let group = tree.append_element(parent, ElementData::svg("g"));
            for child in children {
                let _ = render_graphic(tree, group, child, frame, ctx, shaper);
            }
            if tree.children(group).is_empty() {
                tree.remove_child(parent, group);
                return None;
            }
            group
        }
        ShapeRecord::Rectangle {
            bounds,
            corner_radius,
            paint,
        } => {
            if paint.is_empty() {
                return None;
            }
            let rect = rect_element(frame.rect(*bounds), *corner_radius, paint);
            tree.append_element(parent, rect)
        }
        ShapeRecord::PathShape { path, paint, .. } => {
            if paint.is_empty() {
                return None;
            }
            let data = encode_path(path, frame, &mut ctx.diagnostics);
            if data.is_empty() {
                return None;
            }
            let mut element = ElementData::svg("path");
            element.set_attr("d", data);
            apply_paint(&mut element, paint);
            tree.append_element(parent, element)
        }
        ShapeRecord::TextArea {
            bounds,
            text,
            paint,
        } => {
            let area = frame.rect(*bounds);
            let layout = shaper.layout(text, bounds.size());
            let spans = flatten_text(text, &layout);
            if spans.is_empty() && paint.is_empty() {
                return None;
            }

            // A painted text area gets its background behind the text, both in one group.
            let container = if paint.is_empty() {
                parent
            } else {
                let group = tree.append_element(parent, ElementData::svg("g"));
                let _ = tree.append_element(group, rect_element(area, None, paint));
                group
            };
            let text_node = if spans.is_empty() {
                None
            } else {
                let origin = Point::new(area.x, area.y);
                Some(append_text(tree, container, &spans, origin, ctx))
            };
            if container == parent {
                text_node?
            } else {
                container
            }
        }
    };

    apply_effects(tree, parent, node, graphic, frame, ctx);
    Some(node)
}

fn rect_element(area: Rect, corner_radius: Option<f64>, paint: &Paint) -> ElementData {
    let mut rect = ElementData::svg("rect");
    rect.set_attr("x", format_float(area.x));
    rect.set_attr("y", format_float(area.y));
    rect.set_attr("width", format_float(area.width));
    rect.set_attr("height", format_float(area.height));
    if let Some(radius) = corner_radius {
        rect.set_attr("rx", format_float(radius));
        rect.set_attr("ry", format_float(radius));
    }
    apply_paint(&mut rect, paint);
    rect
}

/// Rotation, blend mode, anti-aliasing and shadow of a rendered graphic.
fn apply_effects(
    tree: &mut DomTree,
    parent: NodeId,
    node: NodeId,
    graphic: &Graphic,
    frame: &Frame,
    ctx: &mut GenerationContext,
) {
    if let Some(element) = tree.as_element_mut(node) {
        let rotated = graphic.shape.bounds().filter(|_| graphic.rotation != 0.0);
        if let Some(bounds) = rotated {
            let centre = frame.point(bounds.center());
            element.set_attr(
                "transform",
                format!(
                    "rotate({} {} {})",
                    format_float(-graphic.rotation),
                    format_float(centre.x),
                    format_float(centre.y)
                ),
            );
        }
        if graphic.blend != BlendMode::Normal {
            element.set_attr("style", format!("mix-blend-mode:{}", graphic.blend));
        }
        if !graphic.anti_alias {
            element.set_attr("shape-rendering", "crispEdges");
        }
    }

    if let Some(shadow) = &graphic.shadow {
        attach_shadow(tree, parent, node, shadow, ctx);
    }
}
