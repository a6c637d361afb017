//! Rich text flattening.
//!
//! Laid-out rich text is cut into spans, one per overlap of a text run with
//! a line fragment, in document order. Each span becomes a `tspan` placed
//! either by a single anchor or by explicit per-character positions.

use std::ops::Range;

use vellum_common::number::{format_float, format_list};
use vellum_dom::{DomTree, ElementData, NodeId, XML_NAMESPACE};
use vellum_model::text::is_line_terminator;
use vellum_model::{Color, FontDescriptor, Point, RichText, TextLayout};

use crate::context::GenerationContext;
use crate::font::set_font_style;
use crate::paint::apply_color;

/// Where a span's characters go, relative to the text container's top-left.
#[derive(Debug, Clone, PartialEq)]
pub enum SpanPosition {
    /// The first character's origin; the rest follow at nominal advances.
    Anchor(Point),
    /// One origin per character.
    PerCharacter(Vec<Point>),
}

/// One positioned piece of text.
#[derive(Debug, Clone, PartialEq)]
pub struct TextSpan {
    /// Character range in the source text.
    pub range: Range<usize>,
    /// The characters.
    pub text: String,
    /// Placement.
    pub position: SpanPosition,
    /// Font of the run, if known.
    pub font: Option<FontDescriptor>,
    /// Foreground color.
    pub color: Color,
    /// Advisory total advance, for simple spans only.
    pub text_length: Option<f64>,
}

/// Cut `text` into spans using `layout`.
///
/// Characters outside every run are still emitted, unstyled. A line
/// terminator at the end of a fragment is dropped from the span that ends
/// with it. Spans left empty are skipped.
#[must_use]
pub fn flatten_text(text: &RichText, layout: &TextLayout) -> Vec<TextSpan> {
    let chars: Vec<char> = text.string.chars().collect();
    let mut spans = Vec::new();

    for run in text.covering_runs() {
        let run_range = run.range();
        for fragment in &layout.fragments {
            let start = run_range.start.max(fragment.glyph_range.start);
            let mut end = run_range.end.min(fragment.glyph_range.end);
            if start >= end {
                continue;
            }

            let trimmed = end == fragment.glyph_range.end && is_line_terminator(chars[end - 1]);
            if trimmed {
                end -= 1;
                if start == end {
                    continue;
                }
            }

            let origin = Point::new(fragment.rect.x, fragment.rect.y);
            let Some(positions) = glyph_positions(layout, origin, start..end) else {
                continue;
            };
            let nominal = (start + 1..end)
                .all(|i| layout.glyph(i).is_some_and(|glyph| glyph.nominal));
            let simple = end - start > 1 && run.font.is_some() && !trimmed;
            let text_length = if simple {
                let first = positions[0];
                let last = positions[positions.len() - 1];
                layout
                    .glyph(end - 1)
                    .map(|glyph| last.x + glyph.advance - first.x)
            } else {
                None
            };

            spans.push(TextSpan {
                range: start..end,
                text: chars[start..end].iter().collect(),
                position: if nominal {
                    SpanPosition::Anchor(positions[0])
                } else {
                    SpanPosition::PerCharacter(positions)
                },
                font: run.font.clone(),
                color: run.color,
                text_length,
            });
        }
    }
    spans
}

/// Container-space origins of the glyphs in `range`, or `None` if any is missing.
fn glyph_positions(layout: &TextLayout, origin: Point, range: Range<usize>) -> Option<Vec<Point>> {
    range
        .map(|i| {
            layout
                .glyph(i)
                .map(|glyph| Point::new(origin.x + glyph.location.x, origin.y + glyph.location.y))
        })
        .collect()
}

/// Emit a `text` element holding one `tspan` per span.
///
/// `origin` is the output position of the text container's top-left corner.
pub fn append_text(
    tree: &mut DomTree,
    parent: NodeId,
    spans: &[TextSpan],
    origin: Point,
    ctx: &mut GenerationContext,
) -> NodeId {
    let mut text = ElementData::svg("text");
    text.set_attr_ns(XML_NAMESPACE, "space", "preserve");
    let text = tree.append_element(parent, text);

    for span in spans {
        let mut tspan = ElementData::svg("tspan");
        match &span.position {
            SpanPosition::Anchor(p) => {
                tspan.set_attr("x", format_float(origin.x + p.x));
                tspan.set_attr("y", format_float(origin.y + p.y));
            }
            SpanPosition::PerCharacter(points) => {
                let xs: Vec<f64> = points.iter().map(|p| origin.x + p.x).collect();
                let ys: Vec<f64> = points.iter().map(|p| origin.y + p.y).collect();
                tspan.set_attr("x", format_list(&xs));
                tspan.set_attr("y", format_list(&ys));
            }
        }
        apply_color(&mut tspan, "fill", span.color);
        if let Some(font) = &span.font {
            let attrs = ctx.fonts.attributes(font);
            tspan.set_attr("font-family", attrs.family.as_str());
            tspan.set_attr("font-size", format_float(font.size));
            set_font_style(&mut tspan, attrs);
        }
        let hint = span.text_length.filter(|_| ctx.options.text_length_hints);
        if let Some(length) = hint {
            tspan.set_attr("textLength", format_float(length));
        }
        let tspan = tree.append_element(text, tspan);
        let _ = tree.append_text(tspan, span.text.as_str());
    }
    text
}
