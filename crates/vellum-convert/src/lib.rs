//! Layered document to SVG conversion.
//!
//! [`convert`] drives a whole run:
//!
//! 1. Read the layer records and build the layer tree.
//! 2. Walk the tree depth-first, rendering each layer into an SVG group.
//! 3. Prepend a `defs` section with shadow filters and font faces.
//! 4. Collapse redundant groups and resolve namespace prefixes.
//!
//! Recoverable problems are collected as warnings on the returned
//! [`Conversion`]; anything fatal aborts with a [`ConvertError`].

pub mod context;
pub mod font;
pub mod frame;
pub mod layer;
pub mod options;
pub mod paint;
pub mod path;
pub mod shadow;
pub mod shape;
pub mod text;

pub use context::GenerationContext;
pub use frame::Frame;
pub use options::ConvertOptions;

use vellum_common::image::ImageRecoder;
use vellum_common::number::{format_float, format_float_suffixed};
use vellum_common::{ConvertError, Warning};
use vellum_dom::{
    DomTree, ElementData, NodeId, NodeType, SVG_NAMESPACE, XLINK_NAMESPACE,
    assign_namespace_prefixes, remove_redundant_groups, to_xml,
};
use vellum_model::{LayerNode, RecordStore, TextShaper, build_layer_tree};

use crate::layer::LayerRenderer;

/// The result of a conversion run.
#[derive(Debug)]
pub struct Conversion {
    /// The generated SVG tree, namespace prefixes resolved.
    pub document: DomTree,
    /// The layer hierarchy that was rendered.
    pub layers: LayerNode,
    /// Recoverable problems, in first-seen order.
    pub warnings: Vec<Warning>,
}

impl Conversion {
    /// The document as XML text.
    #[must_use]
    pub fn to_xml(&self) -> String {
        to_xml(&self.document)
    }
}

/// Convert the document in `store` to SVG.
///
/// # Errors
///
/// Returns [`ConvertError::MalformedInput`] or [`ConvertError::Store`] when
/// required input is missing or unreadable, and
/// [`ConvertError::Namespace`] if the generated tree cannot be serialized
/// with valid prefixes.
pub fn convert(
    store: &dyn RecordStore,
    shaper: &dyn TextShaper,
    recoder: &mut dyn ImageRecoder,
    options: &ConvertOptions,
) -> Result<Conversion, ConvertError> {
    let mut ctx = GenerationContext::new(options.clone());
    let layers = build_layer_tree(store.records()?, &mut ctx.diagnostics);

    let mut document = DomTree::new();
    let svg = document.append_element(NodeId::ROOT, root_element(store, options));

    LayerRenderer {
        store,
        shaper,
        recoder,
        ctx: &mut ctx,
    }
    .render(&mut document, svg, &layers)?;

    append_defs(&mut document, svg, &ctx);
    if options.prune_groups {
        remove_redundant_groups(&mut document);
    }
    assign_namespace_prefixes(&mut document)?;

    Ok(Conversion {
        document,
        layers,
        warnings: ctx.diagnostics.into_warnings(),
    })
}

fn root_element(store: &dyn RecordStore, options: &ConvertOptions) -> ElementData {
    let size = store.canvas_size();
    let mut svg = ElementData::svg("svg");
    svg.declare_namespace(None, SVG_NAMESPACE);
    svg.declare_namespace(Some("xlink"), XLINK_NAMESPACE);
    svg.set_attr("version", "1.1");
    match &options.unit {
        Some(unit) => {
            svg.set_attr("width", format_float_suffixed(size.width, unit));
            svg.set_attr("height", format_float_suffixed(size.height, unit));
            svg.set_attr(
                "viewBox",
                format!("0 0 {} {}", format_float(size.width), format_float(size.height)),
            );
        }
        None => {
            svg.set_attr("width", format_float(size.width));
            svg.set_attr("height", format_float(size.height));
        }
    }
    svg
}

/// Insert `defs` as the first child of `svg` if there is anything to define.
fn append_defs(document: &mut DomTree, svg: NodeId, ctx: &GenerationContext) {
    let font_faces = ctx.options.font_faces && !ctx.fonts.is_empty();
    if ctx.shadows.is_empty() && !font_faces {
        return;
    }

    let defs = document.alloc(NodeType::Element(ElementData::svg("defs")));
    document.prepend_child(svg, defs);
    ctx.shadows.append_filters(document, defs);
    if font_faces {
        ctx.fonts.append_font_faces(document, defs);
    }
}
