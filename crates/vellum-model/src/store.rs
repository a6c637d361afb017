//! The record-store collaborator and its JSON implementation.
//!
//! A store yields layer records in document order, keyed attributes per
//! layer, and raw bytes for raster layers.

use std::collections::HashMap;

use base64::Engine;
use serde::Deserialize;
use serde_json::Value;
use vellum_common::ConvertError;

use crate::geometry::{Rect, Size};
use crate::layer::{LayerId, LayerKind, LayerRecord};

/// Per-layer attributes.
#[derive(Debug, Clone, PartialEq)]
pub struct LayerAttributes {
    /// Whether the layer is shown.
    pub visible: bool,
    /// Layer opacity in `0.0..=1.0`.
    pub opacity: f64,
    /// Frame in document space (Y up).
    pub frame: Rect,
    /// Compositing mode, numbered as in Core Graphics.
    pub compositing_mode: u32,
    /// The opaque graphics blob of a shape layer.
    pub graphics: Option<Value>,
}

impl Default for LayerAttributes {
    fn default() -> Self {
        Self {
            visible: true,
            opacity: 1.0,
            frame: Rect::default(),
            compositing_mode: 0,
            graphics: None,
        }
    }
}

/// Raw raster payload of a bitmap layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bitmap {
    /// Encoded image bytes.
    pub bytes: Vec<u8>,
    /// Declared type: a UTI, MIME type, or extension.
    pub declared_type: String,
}

/// Source of layer records and their data.
pub trait RecordStore {
    /// Width and height of the document.
    fn canvas_size(&self) -> Size;

    /// All layer records in document order.
    ///
    /// # Errors
    ///
    /// Returns [`ConvertError::Store`] if the records cannot be read.
    fn records(&self) -> Result<Vec<LayerRecord>, ConvertError>;

    /// Keyed attributes of one layer.
    ///
    /// # Errors
    ///
    /// Returns [`ConvertError::Store`] if the layer is unknown.
    fn attributes(&self, id: &LayerId) -> Result<LayerAttributes, ConvertError>;

    /// Raster payload of a bitmap layer.
    ///
    /// # Errors
    ///
    /// Returns [`ConvertError::Store`] if the layer is unknown, or
    /// [`ConvertError::MalformedInput`] if it has no readable payload.
    fn bitmap(&self, id: &LayerId) -> Result<Bitmap, ConvertError>;
}

#[derive(Debug, Deserialize)]
struct JsonDocument {
    width: f64,
    height: f64,
    #[serde(default)]
    layers: Vec<JsonLayer>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct JsonLayer {
    id: LayerIdRepr,
    #[serde(default)]
    parent: Option<LayerIdRepr>,
    kind: String,
    #[serde(default)]
    name: String,
    #[serde(default = "default_true")]
    visible: bool,
    #[serde(default = "default_opacity")]
    opacity: f64,
    #[serde(default)]
    frame: Option<Rect>,
    #[serde(default)]
    compositing_mode: u32,
    #[serde(default)]
    graphics: Option<Value>,
    #[serde(default)]
    bitmap: Option<JsonBitmap>,
}

#[derive(Debug, Deserialize)]
struct JsonBitmap {
    #[serde(rename = "type")]
    declared_type: String,
    data: String,
}

/// Ids may be written as strings or numbers.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum LayerIdRepr {
    Text(String),
    Number(i64),
}

impl From<LayerIdRepr> for LayerId {
    fn from(repr: LayerIdRepr) -> Self {
        match repr {
            LayerIdRepr::Text(text) => Self(text),
            LayerIdRepr::Number(n) => Self(n.to_string()),
        }
    }
}

const fn default_true() -> bool {
    true
}

const fn default_opacity() -> f64 {
    1.0
}

/// A [`RecordStore`] over a JSON document export.
///
/// ```json
/// { "width": 200, "height": 100,
///   "layers": [ { "id": 1, "kind": "shape", "name": "Shapes",
///                 "frame": [0, 0, 200, 100], "graphics": { "GraphicsList": [] } } ] }
/// ```
///
/// Layers without a frame cover the whole canvas.
#[derive(Debug)]
pub struct JsonStore {
    size: Size,
    records: Vec<LayerRecord>,
    attributes: HashMap<LayerId, LayerAttributes>,
    bitmaps: HashMap<LayerId, JsonBitmap>,
}

impl JsonStore {
    /// Parse a JSON export.
    ///
    /// # Errors
    ///
    /// Returns [`ConvertError::MalformedInput`] if the text is not a valid
    /// export.
    pub fn parse(json: &str) -> Result<Self, ConvertError> {
        let document: JsonDocument = serde_json::from_str(json)
            .map_err(|e| ConvertError::malformed("document", e.to_string()))?;
        Ok(Self::from_document(document))
    }

    fn from_document(document: JsonDocument) -> Self {
        let size = Size::new(document.width, document.height);
        let canvas = Rect::new(0.0, 0.0, size.width, size.height);

        let mut store = Self {
            size,
            records: Vec::with_capacity(document.layers.len()),
            attributes: HashMap::new(),
            bitmaps: HashMap::new(),
        };
        for layer in document.layers {
            let id = LayerId::from(layer.id);
            let frame = layer.frame.unwrap_or(canvas);
            store.records.push(LayerRecord {
                id: id.clone(),
                parent: layer.parent.map(LayerId::from),
                kind: LayerKind::from_tag(&layer.kind),
                name: layer.name,
                frame,
            });
            if let Some(bitmap) = layer.bitmap {
                let _ = store.bitmaps.insert(id.clone(), bitmap);
            }
            // First record wins when ids repeat; the tree builder drops the rest.
            let _ = store.attributes.entry(id).or_insert(LayerAttributes {
                visible: layer.visible,
                opacity: layer.opacity.clamp(0.0, 1.0),
                frame,
                compositing_mode: layer.compositing_mode,
                graphics: layer.graphics,
            });
        }
        store
    }
}

impl RecordStore for JsonStore {
    fn canvas_size(&self) -> Size {
        self.size
    }

    fn records(&self) -> Result<Vec<LayerRecord>, ConvertError> {
        Ok(self.records.clone())
    }

    fn attributes(&self, id: &LayerId) -> Result<LayerAttributes, ConvertError> {
        self.attributes
            .get(id)
            .cloned()
            .ok_or_else(|| ConvertError::Store(format!("no attributes for layer {id}")))
    }

    fn bitmap(&self, id: &LayerId) -> Result<Bitmap, ConvertError> {
        let bitmap = self
            .bitmaps
            .get(id)
            .ok_or_else(|| ConvertError::malformed(format!("layer {id}"), "bitmap layer has no data"))?;
        let bytes = base64::engine::general_purpose::STANDARD
            .decode(bitmap.data.trim())
            .map_err(|e| ConvertError::malformed(format!("layer {id}"), format!("bad base64 bitmap data: {e}")))?;
        Ok(Bitmap {
            bytes,
            declared_type: bitmap.declared_type.clone(),
        })
    }
}
