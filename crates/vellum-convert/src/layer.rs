//! Layer rendering.
//!
//! Every layer becomes a `g` element. Its content depends on its kind:
//! vector graphics for shape layers, an `image` for bitmap layers, and
//! nothing of its own for groups. Sub-layers follow the content.

use vellum_common::image::ImageRecoder;
use vellum_common::number::format_float;
use vellum_common::{ConvertError, WarningKind};
use vellum_dom::{DomTree, ElementData, NodeId, XLINK_NAMESPACE};
use vellum_model::{
    BlendMode, LayerAttributes, LayerId, LayerKind, LayerNode, RecordStore, Rect, TextShaper,
    decode_graphics,
};

use crate::context::GenerationContext;
use crate::frame::Frame;
use crate::shape::render_graphic;

const COMPONENT: &str = "layer";

/// Collaborators and state shared by every layer of one run.
pub struct LayerRenderer<'a> {
    /// Source of layer data.
    pub store: &'a dyn RecordStore,
    /// Text layout collaborator.
    pub shaper: &'a dyn TextShaper,
    /// Image recoding collaborator.
    pub recoder: &'a mut dyn ImageRecoder,
    /// Generation state.
    pub ctx: &'a mut GenerationContext,
}

impl LayerRenderer<'_> {
    /// Render `layer` and its sub-layers into `parent`.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot supply the layer's attributes or
    /// payload, or a graphics blob is malformed.
    pub fn render(
        &mut self,
        tree: &mut DomTree,
        parent: NodeId,
        layer: &LayerNode,
    ) -> Result<(), ConvertError> {
        let Some(id) = &layer.id else {
            // The synthetic root has no content of its own.
            for child in &layer.children {
                self.render(tree, parent, child)?;
            }
            return Ok(());
        };

        if let LayerKind::Unknown(tag) = &layer.kind {
            self.ctx.warn(
                WarningKind::UnknownFeature,
                COMPONENT,
                format!("skipping layer {id} of unknown kind '{tag}'"),
            );
            return Ok(());
        }

        let attributes = self.store.attributes(id)?;
        let group = tree.append_element(parent, self.group_element(layer, &attributes));
        let frame = Frame::for_layer(layer.frame, self.store.canvas_size().height);

        match &layer.kind {
            LayerKind::Shape => self.render_shapes(tree, group, id, &attributes, &frame)?,
            LayerKind::Bitmap => self.render_bitmap(tree, group, id, &frame, layer.frame)?,
            LayerKind::Group | LayerKind::Unknown(_) => {}
        }

        for child in &layer.children {
            self.render(tree, group, child)?;
        }
        Ok(())
    }

    fn group_element(&mut self, layer: &LayerNode, attributes: &LayerAttributes) -> ElementData {
        let mut group = ElementData::svg("g");
        if self.ctx.claim_id(&layer.name) {
            group.set_attr("id", layer.name.as_str());
        }
        if !attributes.visible {
            group.set_attr("display", "none");
        }
        if attributes.opacity < 1.0 {
            group.set_attr("opacity", format_float(attributes.opacity));
        }
        match blend_mode(attributes.compositing_mode) {
            Some(BlendMode::Normal) => {}
            Some(mode) => group.set_attr("style", format!("mix-blend-mode:{mode}")),
            None => self.ctx.warn(
                WarningKind::UnknownFeature,
                COMPONENT,
                format!("unknown compositing mode {}", attributes.compositing_mode),
            ),
        }
        group
    }

    fn render_shapes(
        &mut self,
        tree: &mut DomTree,
        group: NodeId,
        id: &LayerId,
        attributes: &LayerAttributes,
        frame: &Frame,
    ) -> Result<(), ConvertError> {
        let context = format!("layer {id}");
        let blob = attributes
            .graphics
            .as_ref()
            .ok_or_else(|| ConvertError::malformed(&context, "shape layer has no graphics"))?;
        let graphics = decode_graphics(blob, &context, &mut self.ctx.diagnostics)?;
        for graphic in &graphics {
            let _ = render_graphic(tree, group, graphic, frame, self.ctx, self.shaper);
        }
        Ok(())
    }

    fn render_bitmap(
        &mut self,
        tree: &mut DomTree,
        group: NodeId,
        id: &LayerId,
        frame: &Frame,
        bounds: Rect,
    ) -> Result<(), ConvertError> {
        let bitmap = self.store.bitmap(id)?;
        let Some(locator) =
            self.ctx
                .recode_image(self.recoder, &bitmap.bytes, &bitmap.declared_type)
        else {
            return Ok(());
        };

        // The image fills the layer, whose local origin is its own corner.
        let area = frame.rect(Rect::new(0.0, 0.0, bounds.width, bounds.height));
        let mut image = ElementData::svg("image");
        image.set_attr("x", format_float(area.x));
        image.set_attr("y", format_float(area.y));
        image.set_attr("width", format_float(area.width));
        image.set_attr("height", format_float(area.height));
        image.set_attr("preserveAspectRatio", "none");
        image.set_attr_ns(XLINK_NAMESPACE, "href", locator);
        let _ = tree.append_element(group, image);
        Ok(())
    }
}

fn blend_mode(mode: u32) -> Option<BlendMode> {
    u8::try_from(mode).ok().and_then(BlendMode::from_repr)
}
