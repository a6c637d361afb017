//! XML serialization of a resolved tree.

use crate::{DomTree, ElementData, NodeId, NodeType};

/// Write the tree as an XML 1.0 document.
///
/// Names are written with the prefixes chosen by
/// [`crate::assign_namespace_prefixes`], so that pass must run first.
/// Element-only content is indented two spaces per level. An element that
/// holds text, or whose children hold text (a `text` element and its
/// `tspan`s), is written on one line so that no whitespace is added to
/// character data.
#[must_use]
pub fn to_xml(tree: &DomTree) -> String {
    let mut out = String::from("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    for &child in tree.children(tree.root()) {
        write_node(tree, child, 0, true, &mut out);
        out.push('\n');
    }
    out
}

fn write_node(tree: &DomTree, id: NodeId, depth: usize, indent: bool, out: &mut String) {
    let Some(node) = tree.get(id) else {
        return;
    };
    match &node.node_type {
        NodeType::Document => {}
        NodeType::Text(text) => out.push_str(&escape(text, false)),
        NodeType::Element(element) => {
            if indent {
                push_indent(depth, out);
            }
            write_start_tag(element, out);

            if node.children.is_empty() {
                out.push_str("/>");
                return;
            }
            out.push('>');

            let block = indent && !has_text(tree, id);
            for &child in &node.children {
                if block {
                    out.push('\n');
                }
                write_node(tree, child, depth + 1, block, out);
            }
            if block {
                out.push('\n');
                push_indent(depth, out);
            }
            out.push_str("</");
            out.push_str(&element.name.qualified());
            out.push('>');
        }
    }
}

fn write_start_tag(element: &ElementData, out: &mut String) {
    out.push('<');
    out.push_str(&element.name.qualified());
    for decl in &element.namespaces {
        match &decl.prefix {
            Some(prefix) => out.push_str(&format!(" xmlns:{prefix}=\"")),
            None => out.push_str(" xmlns=\""),
        }
        out.push_str(&escape(&decl.uri, true));
        out.push('"');
    }
    for attr in &element.attrs {
        out.push(' ');
        out.push_str(&attr.name.qualified());
        out.push_str("=\"");
        out.push_str(&escape(&attr.value, true));
        out.push('"');
    }
}

fn has_text(tree: &DomTree, id: NodeId) -> bool {
    let holds_text = |node: NodeId| tree.children(node).iter().any(|&c| tree.as_text(c).is_some());
    holds_text(id) || tree.children(id).iter().any(|&child| holds_text(child))
}

fn push_indent(depth: usize, out: &mut String) {
    for _ in 0..depth {
        out.push_str("  ");
    }
}

/// Escape markup-significant characters; quotes only inside attribute values.
fn escape(text: &str, attribute: bool) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' if attribute => escaped.push_str("&quot;"),
            '\n' if attribute => escaped.push_str("&#10;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}
