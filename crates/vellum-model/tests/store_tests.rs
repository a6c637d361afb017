//! Tests for the JSON record store.

use vellum_common::ConvertError;
use vellum_model::{JsonStore, LayerId, LayerKind, Rect, RecordStore, Size};

const DOCUMENT: &str = r#"{
    "width": 200,
    "height": 100,
    "layers": [
        { "id": 1, "kind": "group", "name": "Group" },
        { "id": "2", "parent": 1, "kind": "shape", "name": "Shapes",
          "frame": "{{10, 10}, {50, 40}}", "visible": false, "opacity": 0.5,
          "compositingMode": 2, "graphics": { "GraphicsList": [] } },
        { "id": 3, "kind": "bitmap", "name": "Photo",
          "bitmap": { "type": "public.png", "data": "aGVsbG8=" } },
        { "id": 4, "kind": "text-on-path" }
    ]
}"#;

fn id(s: &str) -> LayerId {
    LayerId(s.to_string())
}

#[test]
fn test_records_in_order() {
    let store = JsonStore::parse(DOCUMENT).unwrap();
    let records = store.records().unwrap();

    assert_eq!(store.canvas_size(), Size::new(200.0, 100.0));
    assert_eq!(records.len(), 4);
    assert_eq!(records[1].id, id("2"));
    assert_eq!(records[1].parent, Some(id("1")));
    assert_eq!(records[1].kind, LayerKind::Shape);
    assert_eq!(records[3].kind, LayerKind::Unknown("text-on-path".to_string()));
}

#[test]
fn test_attributes_and_default_frame() {
    let store = JsonStore::parse(DOCUMENT).unwrap();

    let shapes = store.attributes(&id("2")).unwrap();
    assert!(!shapes.visible);
    assert_eq!(shapes.opacity, 0.5);
    assert_eq!(shapes.compositing_mode, 2);
    assert_eq!(shapes.frame, Rect::new(10.0, 10.0, 50.0, 40.0));
    assert!(shapes.graphics.is_some());

    let group = store.attributes(&id("1")).unwrap();
    assert!(group.visible);
    assert_eq!(group.opacity, 1.0);
    assert_eq!(group.frame, Rect::new(0.0, 0.0, 200.0, 100.0));
}

#[test]
fn test_bitmap_payload_is_decoded() {
    let store = JsonStore::parse(DOCUMENT).unwrap();
    let bitmap = store.bitmap(&id("3")).unwrap();

    assert_eq!(bitmap.bytes, b"hello");
    assert_eq!(bitmap.declared_type, "public.png");
}

#[test]
fn test_missing_data_is_an_error() {
    let store = JsonStore::parse(DOCUMENT).unwrap();

    assert!(matches!(
        store.bitmap(&id("1")),
        Err(ConvertError::MalformedInput { .. })
    ));
    assert!(matches!(
        store.attributes(&id("99")),
        Err(ConvertError::Store(_))
    ));
}

#[test]
fn test_invalid_json_is_malformed() {
    assert!(matches!(
        JsonStore::parse("{ \"width\": 1 }"),
        Err(ConvertError::MalformedInput { .. })
    ));
}
