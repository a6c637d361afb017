//! Tests for tree mutation methods: insert_before, remove_child, replace_child.

use vellum_dom::{DomTree, ElementData, NodeId, NodeType};

/// Helper to create an SVG element node and return its NodeId.
fn alloc_element(tree: &mut DomTree, tag: &str) -> NodeId {
    tree.alloc(NodeType::Element(ElementData::svg(tag)))
}

#[test]
fn test_append_sets_parent() {
    let mut tree = DomTree::new();
    let svg = alloc_element(&mut tree, "svg");
    tree.append_child(NodeId::ROOT, svg);

    assert_eq!(tree.parent(svg), Some(NodeId::ROOT));
    assert_eq!(tree.document_element(), Some(svg));
}

#[test]
fn test_insert_before_middle() {
    let mut tree = DomTree::new();
    let parent = alloc_element(&mut tree, "g");
    tree.append_child(NodeId::ROOT, parent);

    let a = alloc_element(&mut tree, "rect");
    let c = alloc_element(&mut tree, "path");
    tree.append_child(parent, a);
    tree.append_child(parent, c);

    let b = alloc_element(&mut tree, "use");
    tree.insert_before(parent, b, c);

    assert_eq!(tree.children(parent), &[a, b, c]);
    assert_eq!(tree.parent(b), Some(parent));
}

#[test]
fn test_insert_before_missing_reference_appends() {
    let mut tree = DomTree::new();
    let parent = alloc_element(&mut tree, "g");
    let a = alloc_element(&mut tree, "rect");
    let stray = alloc_element(&mut tree, "rect");
    tree.insert_before(parent, a, stray);

    assert_eq!(tree.children(parent), &[a]);
}

#[test]
fn test_remove_child_detaches() {
    let mut tree = DomTree::new();
    let parent = alloc_element(&mut tree, "g");
    let a = alloc_element(&mut tree, "rect");
    let b = alloc_element(&mut tree, "rect");
    tree.append_child(parent, a);
    tree.append_child(parent, b);

    tree.remove_child(parent, a);

    assert_eq!(tree.children(parent), &[b]);
    assert_eq!(tree.parent(a), None);
}

#[test]
fn test_replace_child_keeps_position() {
    let mut tree = DomTree::new();
    let parent = alloc_element(&mut tree, "g");
    let a = alloc_element(&mut tree, "rect");
    let b = alloc_element(&mut tree, "rect");
    let c = alloc_element(&mut tree, "rect");
    tree.append_child(parent, a);
    tree.append_child(parent, b);

    tree.replace_child(parent, a, c);

    assert_eq!(tree.children(parent), &[c, b]);
    assert_eq!(tree.parent(a), None);
    assert_eq!(tree.parent(c), Some(parent));
}

#[test]
fn test_set_attr_replaces_value_in_place() {
    let mut element = ElementData::svg("rect");
    element.set_attr("x", "1");
    element.set_attr("y", "2");
    element.set_attr("x", "3");

    assert_eq!(element.attr("x"), Some("3"));
    assert_eq!(element.attrs[0].name.local, "x");
    assert_eq!(element.attrs.len(), 2);
}

#[test]
fn test_elements_named_in_document_order() {
    let mut tree = DomTree::new();
    let svg = tree.append_element(NodeId::ROOT, ElementData::svg("svg"));
    let g = tree.append_element(svg, ElementData::svg("g"));
    let first = tree.append_element(g, ElementData::svg("rect"));
    let second = tree.append_element(svg, ElementData::svg("rect"));

    assert_eq!(tree.elements_named("rect"), vec![first, second]);
}

#[test]
fn test_text_content() {
    let mut tree = DomTree::new();
    let svg = tree.append_element(NodeId::ROOT, ElementData::svg("svg"));
    let text = tree.append_element(svg, ElementData::svg("text"));
    let tspan = tree.append_element(text, ElementData::svg("tspan"));
    let _ = tree.append_text(tspan, "Hello");
    let _ = tree.append_text(text, " world");

    assert_eq!(tree.text_content(svg), "Hello world");
    assert_eq!(tree.text_content(tspan), "Hello");
}
