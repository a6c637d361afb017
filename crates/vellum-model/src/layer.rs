//! Layer records and the layer tree builder.
//!
//! The store yields a flat, ordered list of records, each naming its parent.
//! [`build_layer_tree`] turns that into a hierarchy under a synthetic root,
//! keeping source order among siblings.

use std::collections::{HashMap, HashSet};
use std::fmt::Write;

use strum_macros::EnumString;
use vellum_common::{Diagnostics, WarningKind};

use crate::geometry::Rect;

/// Opaque layer identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LayerId(pub String);

impl std::fmt::Display for LayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// What a layer holds.
#[derive(Debug, Clone, PartialEq, Eq, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum LayerKind {
    /// Container of sub-layers.
    Group,
    /// Vector shapes stored as a graphics blob.
    Shape,
    /// Raster pixels.
    Bitmap,
    /// A kind this converter does not know, with its source tag.
    #[strum(default)]
    Unknown(String),
}

impl LayerKind {
    /// Parse a source tag; unrecognized tags become [`LayerKind::Unknown`].
    #[must_use]
    pub fn from_tag(tag: &str) -> Self {
        tag.parse().unwrap_or_else(|_| Self::Unknown(tag.to_string()))
    }

    /// The source tag.
    #[must_use]
    pub fn tag(&self) -> &str {
        match self {
            Self::Group => "group",
            Self::Shape => "shape",
            Self::Bitmap => "bitmap",
            Self::Unknown(tag) => tag,
        }
    }
}

/// One flat record from the store.
#[derive(Debug, Clone, PartialEq)]
pub struct LayerRecord {
    /// The layer's identity.
    pub id: LayerId,
    /// The containing layer; `None` for top-level layers.
    pub parent: Option<LayerId>,
    /// Kind tag.
    pub kind: LayerKind,
    /// Display name.
    pub name: String,
    /// Frame in document space (Y up).
    pub frame: Rect,
}

/// A node of the built layer hierarchy.
#[derive(Debug, Clone, PartialEq)]
pub struct LayerNode {
    /// The layer's identity; `None` only for the synthetic root.
    pub id: Option<LayerId>,
    /// Display name.
    pub name: String,
    /// Kind tag.
    pub kind: LayerKind,
    /// Frame in document space (Y up).
    pub frame: Rect,
    /// Sub-layers in source order.
    pub children: Vec<LayerNode>,
}

impl LayerNode {
    fn root() -> Self {
        Self {
            id: None,
            name: String::new(),
            kind: LayerKind::Group,
            frame: Rect::default(),
            children: Vec::new(),
        }
    }

    fn from_record(record: LayerRecord) -> Self {
        Self {
            id: Some(record.id),
            name: record.name,
            kind: record.kind,
            frame: record.frame,
            children: Vec::new(),
        }
    }

    /// Number of nodes in this subtree, not counting a synthetic root.
    #[must_use]
    pub fn count(&self) -> usize {
        let own = usize::from(self.id.is_some());
        own + self.children.iter().map(Self::count).sum::<usize>()
    }
}

const COMPONENT: &str = "layer";

/// Assemble records into a tree under a synthetic root.
///
/// Records are dropped with a [`WarningKind::DanglingReference`] warning when
/// they repeat an earlier id, name themselves or a missing layer as parent,
/// or are only reachable through a parent cycle.
pub fn build_layer_tree(records: Vec<LayerRecord>, diagnostics: &mut Diagnostics) -> LayerNode {
    let mut slots: Vec<Option<LayerRecord>> = Vec::with_capacity(records.len());
    let mut seen: HashSet<LayerId> = HashSet::new();
    for record in records {
        if seen.insert(record.id.clone()) {
            slots.push(Some(record));
        } else {
            diagnostics.warn(
                WarningKind::DanglingReference,
                COMPONENT,
                format!("duplicate layer id {}", record.id),
            );
        }
    }

    // parent id (None = top level) -> child slot indices, in source order
    let mut children_of: HashMap<Option<LayerId>, Vec<usize>> = HashMap::new();
    for (index, slot) in slots.iter_mut().enumerate() {
        let Some(record) = slot.as_ref() else { continue };
        let problem = match &record.parent {
            Some(parent) if *parent == record.id => {
                Some(format!("layer {} is its own parent", record.id))
            }
            Some(parent) if !seen.contains(parent) => {
                Some(format!("layer {} names missing parent {parent}", record.id))
            }
            parent => {
                children_of.entry(parent.clone()).or_default().push(index);
                None
            }
        };
        if let Some(message) = problem {
            diagnostics.warn(WarningKind::DanglingReference, COMPONENT, message);
            *slot = None;
        }
    }

    let mut root = LayerNode::root();
    attach(&mut root, None, &mut slots, &children_of);

    for record in slots.into_iter().flatten() {
        diagnostics.warn(
            WarningKind::DanglingReference,
            COMPONENT,
            format!("layer {} is unreachable from the document root", record.id),
        );
    }
    root
}

fn attach(
    node: &mut LayerNode,
    key: Option<LayerId>,
    slots: &mut [Option<LayerRecord>],
    children_of: &HashMap<Option<LayerId>, Vec<usize>>,
) {
    let Some(indices) = children_of.get(&key) else {
        return;
    };
    for &index in indices {
        let Some(record) = slots[index].take() else {
            continue;
        };
        let id = record.id.clone();
        let mut child = LayerNode::from_record(record);
        attach(&mut child, Some(id), slots, children_of);
        node.children.push(child);
    }
}

/// Render the hierarchy as indented text, one layer per line.
#[must_use]
pub fn format_tree(node: &LayerNode) -> String {
    let mut out = String::new();
    write_tree(node, 0, &mut out);
    out
}

fn write_tree(node: &LayerNode, indent: usize, out: &mut String) {
    let prefix = "  ".repeat(indent);
    let _ = match &node.id {
        None => writeln!(out, "{prefix}Document"),
        Some(id) => writeln!(
            out,
            "{prefix}{} [{}] #{id} {{{}, {}, {}, {}}}",
            node.name,
            node.kind.tag(),
            node.frame.x,
            node.frame.y,
            node.frame.width,
            node.frame.height
        ),
    };
    for child in &node.children {
        write_tree(child, indent + 1, out);
    }
}

/// Print the hierarchy for debugging.
pub fn print_tree(node: &LayerNode) {
    print!("{}", format_tree(node));
}
