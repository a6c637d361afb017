//! Tests for drop shadow filters and their `use` copies.

use vellum_convert::shadow::{ShadowCache, ShadowDescriptor, attach_shadow};
use vellum_convert::{ConvertOptions, GenerationContext};
use vellum_dom::{DomTree, ElementData, NodeId, XLINK_NAMESPACE};
use vellum_model::{Color, Point, Shadow};

fn descriptor(color: Color, blur_radius: f64) -> ShadowDescriptor {
    ShadowDescriptor { color, blur_radius }
}

/// Local names of the children of `node`.
fn child_names(tree: &DomTree, node: NodeId) -> Vec<String> {
    tree.children(node)
        .iter()
        .filter_map(|&id| tree.as_element(id))
        .map(|e| e.name.local.clone())
        .collect()
}

fn filters(cache: &ShadowCache) -> (DomTree, Vec<NodeId>) {
    let mut tree = DomTree::new();
    let defs = tree.append_element(NodeId::ROOT, ElementData::svg("defs"));
    cache.append_filters(&mut tree, defs);
    let filters = tree.elements_named("filter");
    (tree, filters)
}

#[test]
fn test_equal_shadows_share_a_filter() {
    let mut cache = ShadowCache::new();
    let soft = descriptor(Color::BLACK, 4.0);

    assert_eq!(cache.filter_name_for(soft), "shadow1");
    assert_eq!(cache.filter_name_for(descriptor(Color::BLACK, 2.0)), "shadow2");
    assert_eq!(cache.filter_name_for(soft), "shadow1");
    assert_eq!(cache.len(), 2);
}

#[test]
fn test_black_blurred_shadow_is_blur_only() {
    let mut cache = ShadowCache::new();
    let _ = cache.filter_name_for(descriptor(Color::BLACK, 4.0));
    let (tree, filters) = filters(&cache);

    assert_eq!(filters.len(), 1);
    let filter = tree.as_element(filters[0]).unwrap();
    assert_eq!(filter.attr("id"), Some("shadow1"));
    assert_eq!(filter.attr("x"), Some("-50%"));
    assert_eq!(filter.attr("width"), Some("200%"));
    assert_eq!(child_names(&tree, filters[0]), ["feGaussianBlur"]);

    let blur = tree.as_element(tree.children(filters[0])[0]).unwrap();
    assert_eq!(blur.attr("in"), Some("SourceAlpha"));
    assert_eq!(blur.attr("stdDeviation"), Some("2"));
}

#[test]
fn test_colored_shadow_is_flooded() {
    let mut cache = ShadowCache::new();
    let _ = cache.filter_name_for(descriptor(Color::rgba(1.0, 0.0, 0.0, 0.5), 3.0));
    let (tree, filters) = filters(&cache);

    assert_eq!(
        child_names(&tree, filters[0]),
        ["feGaussianBlur", "feFlood", "feComposite"]
    );
    let children = tree.children(filters[0]);
    let flood = tree.as_element(children[1]).unwrap();
    assert_eq!(flood.attr("flood-color"), Some("#ff0000"));
    assert_eq!(flood.attr("flood-opacity"), Some("0.5"));
    let composite = tree.as_element(children[2]).unwrap();
    assert_eq!(composite.attr("in2"), Some("blur"));
    assert_eq!(composite.attr("operator"), Some("in"));
}

#[test]
fn test_hard_shadow_composites_source_alpha() {
    let mut cache = ShadowCache::new();
    let _ = cache.filter_name_for(descriptor(Color::BLACK, 0.0));
    let (tree, filters) = filters(&cache);

    assert_eq!(child_names(&tree, filters[0]), ["feFlood", "feComposite"]);
    let composite = tree.as_element(tree.children(filters[0])[1]).unwrap();
    assert_eq!(composite.attr("in2"), Some("SourceAlpha"));
}

#[test]
fn test_copy_is_inserted_before_the_shape() {
    let mut ctx = GenerationContext::new(ConvertOptions::default());
    let mut tree = DomTree::new();
    let group = tree.append_element(NodeId::ROOT, ElementData::svg("g"));
    let rect = tree.append_element(group, ElementData::svg("rect"));
    let shadow = Shadow {
        color: Color::BLACK,
        blur_radius: 2.0,
        offset: Point::new(3.0, 4.0),
    };

    attach_shadow(&mut tree, group, rect, &shadow, &mut ctx);

    assert_eq!(child_names(&tree, group), ["use", "rect"]);
    assert_eq!(tree.as_element(rect).unwrap().attr("id"), Some("shape1"));
    let copy = tree.as_element(tree.children(group)[0]).unwrap();
    assert_eq!(copy.attr_ns(XLINK_NAMESPACE, "href"), Some("#shape1"));
    assert_eq!(copy.attr("filter"), Some("url(#shadow1)"));
    // Source offsets point up; output offsets point down.
    assert_eq!(copy.attr("transform"), Some("translate(3 -4)"));
    assert_eq!(ctx.shadows.len(), 1);
}

#[test]
fn test_unshifted_copy_has_no_transform() {
    let mut ctx = GenerationContext::new(ConvertOptions::default());
    let mut tree = DomTree::new();
    let group = tree.append_element(NodeId::ROOT, ElementData::svg("g"));
    let path = tree.append_element(group, ElementData::svg("path"));
    let shadow = Shadow {
        color: Color::BLACK,
        blur_radius: 2.0,
        offset: Point::default(),
    };

    attach_shadow(&mut tree, group, path, &shadow, &mut ctx);

    let copy = tree.as_element(tree.children(group)[0]).unwrap();
    assert_eq!(copy.attr("transform"), None);
}

#[test]
fn test_transparent_shadow_is_ignored() {
    let mut ctx = GenerationContext::new(ConvertOptions::default());
    let mut tree = DomTree::new();
    let group = tree.append_element(NodeId::ROOT, ElementData::svg("g"));
    let rect = tree.append_element(group, ElementData::svg("rect"));
    let shadow = Shadow {
        color: Color::rgba(0.0, 0.0, 0.0, 0.0),
        blur_radius: 2.0,
        offset: Point::new(1.0, 1.0),
    };

    attach_shadow(&mut tree, group, rect, &shadow, &mut ctx);

    assert_eq!(child_names(&tree, group), ["rect"]);
    assert!(ctx.shadows.is_empty());
    assert_eq!(tree.as_element(rect).unwrap().attr("id"), None);
}
