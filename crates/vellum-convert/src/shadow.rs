//! Drop shadow synthesis.
//!
//! Shadows with the same color and blur share one `filter` definition. A
//! shadow-casting element gets a generated id and a filtered `use` copy of
//! itself placed just before it, so the copy paints underneath.

use vellum_common::number::format_float;
use vellum_dom::{DomTree, ElementData, NodeId, NodeType, XLINK_NAMESPACE};
use vellum_model::{Color, Point, Shadow};

use crate::context::GenerationContext;
use crate::frame::Frame;

/// The value that identifies one reusable shadow filter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShadowDescriptor {
    /// Shadow color including alpha.
    pub color: Color,
    /// Blur radius.
    pub blur_radius: f64,
}

/// Shadow descriptors seen so far, with their filter names in first-seen order.
#[derive(Debug, Default)]
pub struct ShadowCache {
    entries: Vec<(ShadowDescriptor, String)>,
}

impl ShadowCache {
    /// Create an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The filter name for `descriptor`, allocating `shadowN` on first sight.
    pub fn filter_name_for(&mut self, descriptor: ShadowDescriptor) -> String {
        if let Some((_, name)) = self.entries.iter().find(|(d, _)| *d == descriptor) {
            return name.clone();
        }
        let name = format!("shadow{}", self.entries.len() + 1);
        self.entries.push((descriptor, name.clone()));
        name
    }

    /// Number of distinct shadows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no shadow has been seen.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Append one `filter` per cached shadow to `defs`.
    pub fn append_filters(&self, tree: &mut DomTree, defs: NodeId) {
        for (descriptor, name) in &self.entries {
            append_filter(tree, defs, descriptor, name);
        }
    }
}

fn append_filter(tree: &mut DomTree, defs: NodeId, descriptor: &ShadowDescriptor, name: &str) {
    let mut filter = ElementData::svg("filter");
    filter.set_attr("id", name);
    filter.set_attr("x", "-50%");
    filter.set_attr("y", "-50%");
    filter.set_attr("width", "200%");
    filter.set_attr("height", "200%");
    let filter = tree.append_element(defs, filter);

    let blurred = descriptor.blur_radius > 0.0;
    if blurred {
        let mut blur = ElementData::svg("feGaussianBlur");
        blur.set_attr("in", "SourceAlpha");
        blur.set_attr("stdDeviation", format_float(descriptor.blur_radius / 2.0));
        blur.set_attr("result", "blur");
        let _ = tree.append_element(filter, blur);
    }

    if !descriptor.color.is_opaque_black() || !blurred {
        let mut flood = ElementData::svg("feFlood");
        flood.set_attr("flood-color", descriptor.color.to_svg());
        flood.set_attr("flood-opacity", format_float(descriptor.color.a));
        let _ = tree.append_element(filter, flood);

        let mut composite = ElementData::svg("feComposite");
        composite.set_attr("in2", if blurred { "blur" } else { "SourceAlpha" });
        composite.set_attr("operator", "in");
        let _ = tree.append_element(filter, composite);
    }
}

/// Whether a shadow is visible at all.
#[must_use]
pub fn casts_shadow(shadow: &Shadow) -> bool {
    !shadow.color.is_transparent()
}

/// Give `node` a generated id and insert a filtered copy of it before it.
///
/// Does nothing when the shadow is invisible.
pub fn attach_shadow(
    tree: &mut DomTree,
    parent: NodeId,
    node: NodeId,
    shadow: &Shadow,
    ctx: &mut GenerationContext,
) {
    if !casts_shadow(shadow) {
        return;
    }
    let filter = ctx.shadows.filter_name_for(ShadowDescriptor {
        color: shadow.color,
        blur_radius: shadow.blur_radius,
    });

    let id = ctx.generate_id("shape");
    if let Some(element) = tree.as_element_mut(node) {
        element.set_attr("id", id.as_str());
    }

    let mut copy = ElementData::svg("use");
    copy.set_attr_ns(XLINK_NAMESPACE, "href", format!("#{id}"));
    copy.set_attr("filter", format!("url(#{filter})"));
    let offset = Frame::delta(shadow.offset);
    if offset != Point::default() {
        copy.set_attr(
            "transform",
            format!("translate({} {})", format_float(offset.x), format_float(offset.y)),
        );
    }
    let copy = tree.alloc(NodeType::Element(copy));
    tree.insert_before(parent, copy, node);
}
