//! End-to-end conversion tests over JSON documents.

use std::io::Cursor;

use base64::Engine;
use serde_json::{Value, json};
use vellum_common::image::{DataUriRecoder, ImageRecoder, RecodeError};
use vellum_common::{ConvertError, WarningKind};
use vellum_convert::{Conversion, ConvertOptions, convert};
use vellum_dom::XLINK_NAMESPACE;
use vellum_model::{ApproximateShaper, JsonStore};

fn document(height: f64, layers: &Value) -> JsonStore {
    let json = json!({ "width": 300, "height": height, "layers": layers });
    JsonStore::parse(&json.to_string()).unwrap()
}

fn run(store: &JsonStore, options: &ConvertOptions) -> Conversion {
    convert(store, &ApproximateShaper, &mut DataUriRecoder, options).unwrap()
}

fn rectangle(bounds: &str) -> Value {
    json!({
        "Class": "Rectangle",
        "Bounds": bounds,
        "DrawsFill": true,
        "FillColor": [0, 0, 0, 1],
    })
}

fn shape_layer(id: u32, name: &str, graphics: &[Value]) -> Value {
    json!({
        "id": id,
        "kind": "shape",
        "name": name,
        "frame": [0, 0, 300, 200],
        "graphics": { "GraphicsList": graphics },
    })
}

fn png_base64() -> String {
    let pixels = image::RgbaImage::from_pixel(2, 2, image::Rgba([255, 0, 0, 255]));
    let mut bytes = Cursor::new(Vec::new());
    pixels.write_to(&mut bytes, image::ImageFormat::Png).unwrap();
    base64::engine::general_purpose::STANDARD.encode(bytes.into_inner())
}

#[test]
fn test_filled_rectangle_is_flipped() {
    let store = document(
        200.0,
        &json!([shape_layer(1, "Layer 1", &[rectangle("{{10, 20}, {100, 50}}")])]),
    );
    let conversion = run(&store, &ConvertOptions::default());
    let xml = conversion.to_xml();

    assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<svg "));
    assert!(xml.contains(
        r#"<rect x="10" y="130" width="100" height="50" fill="black" fill-opacity="1" stroke="none"/>"#
    ));
    // The layer group has no attributes and one child, so it is pruned away.
    assert!(!xml.contains("<g"));
    assert!(!xml.contains("<defs"));
    assert!(conversion.warnings.is_empty());
}

#[test]
fn test_root_element() {
    let store = document(200.0, &json!([]));
    let xml = run(&store, &ConvertOptions::default()).to_xml();
    assert!(xml.contains(
        r#"<svg xmlns="http://www.w3.org/2000/svg" xmlns:xlink="http://www.w3.org/1999/xlink" version="1.1" width="300" height="200"/>"#
    ));

    let options = ConvertOptions {
        unit: Some("pt".to_string()),
        ..ConvertOptions::default()
    };
    let xml = run(&store, &options).to_xml();
    assert!(xml.contains(r#"width="300pt" height="200pt" viewBox="0 0 300 200""#));
}

#[test]
fn test_unpainted_shape_emits_nothing() {
    let unpainted = json!({ "Class": "Rectangle", "Bounds": [0, 0, 10, 10] });
    let store = document(200.0, &json!([shape_layer(1, "Empty", &[unpainted])]));
    let xml = run(&store, &ConvertOptions::default()).to_xml();

    assert!(xml.contains(r#"<g id="Empty"/>"#));
    assert!(!xml.contains("<rect"));
}

#[test]
fn test_pruning_can_be_disabled() {
    let store = document(
        200.0,
        &json!([shape_layer(1, "Layer 1", &[rectangle("{{0, 0}, {5, 5}}")])]),
    );
    let options = ConvertOptions {
        prune_groups: false,
        ..ConvertOptions::default()
    };
    let conversion = run(&store, &options);
    assert_eq!(conversion.document.elements_named("g").len(), 1);
}

#[test]
fn test_layer_attributes() {
    let mut hidden = shape_layer(1, "Hidden", &[rectangle("{{0, 0}, {5, 5}}")]);
    hidden["visible"] = json!(false);
    hidden["opacity"] = json!(0.5);
    hidden["compositingMode"] = json!(1);
    let store = document(200.0, &json!([hidden]));
    let xml = run(&store, &ConvertOptions::default()).to_xml();

    assert!(xml.contains(
        r#"<g id="Hidden" display="none" opacity="0.5" style="mix-blend-mode:multiply">"#
    ));
}

#[test]
fn test_nested_layers_keep_document_order() {
    let layers = json!([
        { "id": 1, "kind": "group", "name": "Outer" },
        shape_layer(2, "Back", &[rectangle("{{0, 0}, {5, 5}}")]),
        { "id": 3, "kind": "group", "name": "Inner", "parent": 1 },
        { "id": 4, "kind": "shape", "name": "Front", "parent": 3,
          "graphics": { "GraphicsList": [rectangle("{{1, 1}, {5, 5}}")] } },
    ]);
    let conversion = run(&document(200.0, &layers), &ConvertOptions::default());
    let xml = conversion.to_xml();

    let outer = xml.find(r#"<g id="Outer">"#).unwrap();
    let inner = xml.find(r#"<g id="Inner">"#).unwrap();
    let front = xml.find(r#"<g id="Front">"#).unwrap();
    let back = xml.find(r#"<g id="Back">"#).unwrap();
    assert!(outer < inner && inner < front && front < back);
    assert_eq!(conversion.layers.count(), 4);
}

#[test]
fn test_duplicate_names_get_one_id() {
    let layers = json!([
        shape_layer(1, "Same", &[rectangle("{{0, 0}, {5, 5}}")]),
        shape_layer(2, "Same", &[rectangle("{{0, 0}, {5, 5}}")]),
    ]);
    let conversion = run(&document(200.0, &layers), &ConvertOptions::default());
    assert_eq!(conversion.to_xml().matches(r#"id="Same""#).count(), 1);
}

#[test]
fn test_shared_shadow_filter() {
    let mut shadowed = rectangle("{{10, 10}, {20, 20}}");
    shadowed["HasShadow"] = json!(true);
    shadowed["ShadowBlurRadius"] = json!(4);
    shadowed["ShadowOffset"] = json!("{2, 2}");
    let mut other = shadowed.clone();
    other["Bounds"] = json!("{{50, 10}, {20, 20}}");

    let store = document(200.0, &json!([shape_layer(1, "Shapes", &[shadowed, other])]));
    let conversion = run(&store, &ConvertOptions::default());
    let tree = &conversion.document;

    let svg = tree.document_element().unwrap();
    let first = tree.as_element(tree.children(svg)[0]).unwrap();
    assert!(first.is("defs"));
    assert_eq!(tree.elements_named("filter").len(), 1);

    let copies = tree.elements_named("use");
    assert_eq!(copies.len(), 2);
    let second = tree.as_element(copies[1]).unwrap();
    assert_eq!(second.attr_ns(XLINK_NAMESPACE, "href"), Some("#shape2"));
    assert_eq!(second.attr("filter"), Some("url(#shadow1)"));
    assert_eq!(second.attr("transform"), Some("translate(2 -2)"));

    let xml = conversion.to_xml();
    assert!(xml.contains(r##"<use xlink:href="#shape1" filter="url(#shadow1)""##));
    assert!(xml.find("<use").unwrap() < xml.find(r#" id="shape1""#).unwrap());
}

#[test]
fn test_text_area() {
    let text = json!({
        "Class": "Text",
        "Bounds": "{{10, 20}, {100, 20}}",
        "RTFD": {
            "string": "Hi",
            "runs": [{ "start": 0, "length": 2, "font": { "name": "Helvetica", "size": 10 } }],
        },
    });
    let store = document(100.0, &json!([shape_layer(1, "Text", &[text])]));
    let options = ConvertOptions {
        font_faces: true,
        ..ConvertOptions::default()
    };
    let xml = run(&store, &options).to_xml();

    assert!(xml.contains(
        r#"<text xml:space="preserve"><tspan x="10" y="69.6" fill="black" font-family="Helvetica" font-size="10" textLength="12">Hi</tspan></text>"#
    ));
    assert!(xml.contains(r#"<font-face font-family="Helvetica">"#));
    assert!(xml.contains(r#"<font-face-name name="Helvetica"/>"#));
}

#[test]
fn test_bitmap_layer() {
    let layers = json!([{
        "id": 1, "kind": "bitmap", "name": "Photo", "frame": [10, 20, 30, 40],
        "bitmap": { "type": "public.png", "data": png_base64() },
    }]);
    let conversion = run(&document(100.0, &layers), &ConvertOptions::default());
    let tree = &conversion.document;

    let image = tree.as_element(tree.elements_named("image")[0]).unwrap();
    assert_eq!(image.attr("x"), Some("10"));
    assert_eq!(image.attr("y"), Some("40"));
    assert_eq!(image.attr("width"), Some("30"));
    assert_eq!(image.attr("height"), Some("40"));
    assert_eq!(image.attr("preserveAspectRatio"), Some("none"));
    assert!(
        image
            .attr_ns(XLINK_NAMESPACE, "href")
            .unwrap()
            .starts_with("data:image/png;base64,")
    );
}

#[test]
fn test_unreadable_bitmap_warns_once() {
    let bitmap = |id: u32| {
        json!({
            "id": id, "kind": "bitmap", "name": format!("Bad {id}"),
            "bitmap": { "type": "public.png", "data": "aGVsbG8=" },
        })
    };
    let conversion = run(
        &document(100.0, &json!([bitmap(1), bitmap(2)])),
        &ConvertOptions::default(),
    );

    assert!(conversion.document.elements_named("image").is_empty());
    assert_eq!(conversion.warnings.len(), 1);
    assert_eq!(conversion.warnings[0].kind, WarningKind::ResourceFailure);
}

/// Hands out sequential names without decoding anything.
#[derive(Default)]
struct CountingRecoder {
    calls: usize,
}

impl ImageRecoder for CountingRecoder {
    fn recode(&mut self, _bytes: &[u8], _declared_type: &str) -> Result<String, RecodeError> {
        self.calls += 1;
        Ok(format!("image-{}.png", self.calls))
    }
}

#[test]
fn test_identical_bitmaps_are_recoded_once() {
    let bitmap = |id: u32| {
        json!({
            "id": id, "kind": "bitmap", "name": format!("Copy {id}"),
            "bitmap": { "type": "public.png", "data": "AAEC" },
        })
    };
    let store = document(100.0, &json!([bitmap(1), bitmap(2)]));
    let mut recoder = CountingRecoder::default();
    let conversion = convert(
        &store,
        &ApproximateShaper,
        &mut recoder,
        &ConvertOptions::default(),
    )
    .unwrap();

    assert_eq!(recoder.calls, 1);
    let tree = &conversion.document;
    for image in tree.elements_named("image") {
        let image = tree.as_element(image).unwrap();
        assert_eq!(image.attr_ns(XLINK_NAMESPACE, "href"), Some("image-1.png"));
    }
}

#[test]
fn test_unknown_layer_kind_is_skipped() {
    let layers = json!([
        { "id": 1, "kind": "text-on-path", "name": "Odd" },
        shape_layer(2, "Kept", &[rectangle("{{0, 0}, {5, 5}}")]),
    ]);
    let conversion = run(&document(100.0, &layers), &ConvertOptions::default());

    assert!(!conversion.to_xml().contains("Odd"));
    assert!(conversion.to_xml().contains(r#"<g id="Kept">"#));
    assert_eq!(conversion.warnings.len(), 1);
    assert_eq!(conversion.warnings[0].kind, WarningKind::UnknownFeature);
}

#[test]
fn test_shape_layer_without_graphics_fails() {
    let layers = json!([{ "id": 1, "kind": "shape", "name": "Broken" }]);
    let result = convert(
        &document(100.0, &layers),
        &ApproximateShaper,
        &mut DataUriRecoder,
        &ConvertOptions::default(),
    );
    assert!(matches!(result, Err(ConvertError::MalformedInput { .. })));
}
