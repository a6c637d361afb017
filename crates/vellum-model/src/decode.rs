//! Decoding of shape-layer graphics blobs.
//!
//! A blob is a dictionary whose `GraphicsList` holds one dictionary per
//! graphic, each tagged by its `Class`. Unknown classes and keys are
//! reported and skipped; a graphic missing geometry it cannot do without is
//! malformed input.

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use vellum_common::{ConvertError, Diagnostics, WarningKind};

use crate::color::Color;
use crate::geometry::{Point, Rect};
use crate::shape::{BlendMode, Graphic, LineJoin, Paint, PathOp, Shadow, ShapeRecord, Stroke};
use crate::text::RichText;

/// Keys a graphic dictionary may carry.
pub const KNOWN_GRAPHIC_KEYS: &[&str] = &[
    "AntiAlias",
    "BlendMode",
    "Bounds",
    "Class",
    "CornerRadius",
    "CustomStrokeStyleDash",
    "CustomStrokeStyleGap",
    "DrawsFill",
    "DrawsStroke",
    "EndPoint",
    "FillColor",
    "FMPath",
    "GradientConfig",
    "GraphicsList",
    "HasCornerRadius",
    "HasShadow",
    "KeepBoundsWhenEditing",
    "LineJoinStyle",
    "Path",
    "PointLength",
    "RotationAngle",
    "RTFD",
    "ShadowBlurRadius",
    "ShadowColor",
    "ShadowOffset",
    "StartPoint",
    "StrokeColor",
    "StrokeLineWidth",
    "StrokeStyle",
    "TextStrokeWidth",
];

const COMPONENT: &str = "graphic";

/// Control-point distance for a quarter ellipse drawn with one cubic.
const KAPPA: f64 = 0.552_284_749_831;

type Dict = Map<String, Value>;

/// Decode the graphics of a shape layer.
///
/// # Errors
///
/// Returns [`ConvertError::MalformedInput`] if the blob has no graphics
/// list, or a graphic lacks required geometry.
pub fn decode_graphics(
    blob: &Value,
    context: &str,
    diagnostics: &mut Diagnostics,
) -> Result<Vec<Graphic>, ConvertError> {
    let list = blob
        .get("GraphicsList")
        .ok_or_else(|| ConvertError::malformed(context, "graphics blob has no GraphicsList"))?;
    decode_list(list, context, diagnostics)
}

fn decode_list(
    list: &Value,
    context: &str,
    diagnostics: &mut Diagnostics,
) -> Result<Vec<Graphic>, ConvertError> {
    let items = list
        .as_array()
        .ok_or_else(|| ConvertError::malformed(context, "GraphicsList is not an array"))?;

    let mut graphics = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        let context = format!("{context} graphic {index}");
        let dict = item
            .as_object()
            .ok_or_else(|| ConvertError::malformed(&context, "graphic is not a dictionary"))?;
        if let Some(graphic) = decode_graphic(dict, &context, diagnostics)? {
            graphics.push(graphic);
        }
    }
    Ok(graphics)
}

/// Decode one graphic; `Ok(None)` means it was skipped with a warning.
fn decode_graphic(
    dict: &Dict,
    context: &str,
    diagnostics: &mut Diagnostics,
) -> Result<Option<Graphic>, ConvertError> {
    warn_unknown_keys(dict, diagnostics);

    let class = dict
        .get("Class")
        .and_then(Value::as_str)
        .ok_or_else(|| ConvertError::malformed(context, "graphic has no Class"))?;

    let shape = match class {
        "Group" => {
            let children = match dict.get("GraphicsList") {
                Some(list) => decode_list(list, context, diagnostics)?,
                None => Vec::new(),
            };
            ShapeRecord::Group { children }
        }
        "Rectangle" => {
            let corner_radius = if bool_for_key(dict, "HasCornerRadius", false) {
                float_for_key(dict, "CornerRadius").filter(|r| *r > 0.0)
            } else {
                None
            };
            ShapeRecord::Rectangle {
                bounds: required_bounds(dict, context)?,
                corner_radius,
                paint: decode_paint(dict, diagnostics),
            }
        }
        "Oval" => {
            let bounds = required_bounds(dict, context)?;
            ShapeRecord::PathShape {
                bounds,
                path: oval_path(bounds),
                paint: decode_paint(dict, diagnostics),
            }
        }
        "Line" | "Arrow" => {
            if class == "Arrow" {
                diagnostics.warn(
                    WarningKind::Unsupported,
                    COMPONENT,
                    "arrow heads are not rendered",
                );
            }
            let start = required::<Point>(dict, "StartPoint", context)?;
            let end = required::<Point>(dict, "EndPoint", context)?;
            ShapeRecord::PathShape {
                bounds: required_bounds(dict, context)?,
                path: vec![PathOp::MoveTo(start), PathOp::LineTo(end)],
                paint: decode_paint(dict, diagnostics),
            }
        }
        "Path" | "BezierPath" => {
            let ops = dict
                .get("Path")
                .or_else(|| dict.get("FMPath"))
                .ok_or_else(|| ConvertError::malformed(context, "path graphic has no Path"))?;
            ShapeRecord::PathShape {
                bounds: required_bounds(dict, context)?,
                path: decode_path(ops, context)?,
                paint: decode_paint(dict, diagnostics),
            }
        }
        "Text" => {
            if float_for_key(dict, "TextStrokeWidth").is_some_and(|w| w != 0.0) {
                diagnostics.warn(
                    WarningKind::Unsupported,
                    COMPONENT,
                    "stroked text is rendered unstroked",
                );
            }
            ShapeRecord::TextArea {
                bounds: required_bounds(dict, context)?,
                text: required::<RichText>(dict, "RTFD", context)?,
                paint: decode_paint(dict, diagnostics),
            }
        }
        other => {
            diagnostics.warn(
                WarningKind::UnknownFeature,
                COMPONENT,
                format!("unknown graphic class '{other}'"),
            );
            return Ok(None);
        }
    };

    Ok(Some(Graphic {
        shape,
        shadow: decode_shadow(dict),
        rotation: float_for_key(dict, "RotationAngle").unwrap_or(0.0),
        blend: decode_blend_mode(dict, diagnostics),
        anti_alias: bool_for_key(dict, "AntiAlias", true),
    }))
}

fn warn_unknown_keys(dict: &Dict, diagnostics: &mut Diagnostics) {
    for key in dict.keys() {
        if !KNOWN_GRAPHIC_KEYS.contains(&key.as_str()) {
            diagnostics.warn(
                WarningKind::UnknownFeature,
                COMPONENT,
                format!("unknown graphic key '{key}'"),
            );
        }
    }
}

fn decode_paint(dict: &Dict, diagnostics: &mut Diagnostics) -> Paint {
    if dict.contains_key("GradientConfig") {
        diagnostics.warn(
            WarningKind::Unsupported,
            COMPONENT,
            "gradient fills are rendered as solid fills",
        );
    }

    let fill = bool_for_key(dict, "DrawsFill", false)
        .then(|| optional::<Color>(dict, "FillColor").unwrap_or(Color::BLACK));

    let stroke = bool_for_key(dict, "DrawsStroke", false).then(|| {
        let width = float_for_key(dict, "StrokeLineWidth").unwrap_or(1.0);
        let join = int_for_key(dict, "LineJoinStyle")
            .and_then(|v| u8::try_from(v).ok())
            .and_then(LineJoin::from_repr)
            .unwrap_or_default();
        let dashed = int_for_key(dict, "StrokeStyle").is_some_and(|style| style != 0);
        let dash = dashed.then(|| {
            let default = 3.0 * width;
            (
                float_for_key(dict, "CustomStrokeStyleDash").unwrap_or(default),
                float_for_key(dict, "CustomStrokeStyleGap").unwrap_or(default),
            )
        });
        Stroke {
            color: optional::<Color>(dict, "StrokeColor").unwrap_or(Color::BLACK),
            width,
            join,
            dash,
        }
    });

    Paint { fill, stroke }
}

fn decode_shadow(dict: &Dict) -> Option<Shadow> {
    if !bool_for_key(dict, "HasShadow", false) {
        return None;
    }
    Some(Shadow {
        color: optional::<Color>(dict, "ShadowColor").unwrap_or(Color::BLACK),
        blur_radius: float_for_key(dict, "ShadowBlurRadius").unwrap_or(0.0).max(0.0),
        offset: optional::<Point>(dict, "ShadowOffset").unwrap_or_default(),
    })
}

fn decode_blend_mode(dict: &Dict, diagnostics: &mut Diagnostics) -> BlendMode {
    let Some(value) = int_for_key(dict, "BlendMode") else {
        return BlendMode::Normal;
    };
    match u8::try_from(value).ok().and_then(BlendMode::from_repr) {
        Some(mode) => mode,
        None => {
            diagnostics.warn(
                WarningKind::UnknownFeature,
                COMPONENT,
                format!("unknown blend mode {value}"),
            );
            BlendMode::Normal
        }
    }
}

/// Decode a path operation list: `[["moveto", x, y], ["curveto", x1, y1, x2, y2, x, y], ["closepath"]]`.
///
/// # Errors
///
/// Returns [`ConvertError::MalformedInput`] on an unknown operator or a wrong
/// number of coordinates.
pub fn decode_path(ops: &Value, context: &str) -> Result<Vec<PathOp>, ConvertError> {
    let items = ops
        .as_array()
        .ok_or_else(|| ConvertError::malformed(context, "path is not an array"))?;

    items
        .iter()
        .map(|item| {
            let parts = item
                .as_array()
                .ok_or_else(|| ConvertError::malformed(context, "path element is not an array"))?;
            let (name, args) = parts
                .split_first()
                .ok_or_else(|| ConvertError::malformed(context, "empty path element"))?;
            let name = name
                .as_str()
                .ok_or_else(|| ConvertError::malformed(context, "path operator is not a string"))?;
            let numbers: Vec<f64> = args
                .iter()
                .map(Value::as_f64)
                .collect::<Option<_>>()
                .ok_or_else(|| ConvertError::malformed(context, "non-numeric path coordinate"))?;

            match (name.to_ascii_lowercase().as_str(), numbers.as_slice()) {
                ("moveto", &[x, y]) => Ok(PathOp::MoveTo(Point::new(x, y))),
                ("lineto", &[x, y]) => Ok(PathOp::LineTo(Point::new(x, y))),
                ("curveto", &[x1, y1, x2, y2, x, y]) => Ok(PathOp::CurveTo(
                    Point::new(x1, y1),
                    Point::new(x2, y2),
                    Point::new(x, y),
                )),
                ("closepath", &[]) => Ok(PathOp::ClosePath),
                (other, numbers) => Err(ConvertError::malformed(
                    context,
                    format!("bad path operator '{other}' with {} coordinates", numbers.len()),
                )),
            }
        })
        .collect()
}

/// An ellipse inscribed in `bounds`, as four cubic curves starting at the
/// rightmost point and running counter-clockwise in source space.
#[must_use]
pub fn oval_path(bounds: Rect) -> Vec<PathOp> {
    let c = bounds.center();
    let (rx, ry) = (bounds.width / 2.0, bounds.height / 2.0);
    let (kx, ky) = (rx * KAPPA, ry * KAPPA);
    let p = Point::new;
    vec![
        PathOp::MoveTo(p(c.x + rx, c.y)),
        PathOp::CurveTo(p(c.x + rx, c.y + ky), p(c.x + kx, c.y + ry), p(c.x, c.y + ry)),
        PathOp::CurveTo(p(c.x - kx, c.y + ry), p(c.x - rx, c.y + ky), p(c.x - rx, c.y)),
        PathOp::CurveTo(p(c.x - rx, c.y - ky), p(c.x - kx, c.y - ry), p(c.x, c.y - ry)),
        PathOp::CurveTo(p(c.x + kx, c.y - ry), p(c.x + rx, c.y - ky), p(c.x + rx, c.y)),
        PathOp::ClosePath,
    ]
}

fn required_bounds(dict: &Dict, context: &str) -> Result<Rect, ConvertError> {
    required::<Rect>(dict, "Bounds", context)
}

fn required<T: DeserializeOwned>(dict: &Dict, key: &str, context: &str) -> Result<T, ConvertError> {
    let value = dict
        .get(key)
        .ok_or_else(|| ConvertError::malformed(context, format!("missing {key}")))?;
    T::deserialize(value).map_err(|e| ConvertError::malformed(context, format!("bad {key}: {e}")))
}

fn optional<T: DeserializeOwned>(dict: &Dict, key: &str) -> Option<T> {
    dict.get(key).and_then(|value| T::deserialize(value).ok())
}

/// Read a flag stored as a boolean, a number, or a `YES`/`NO`/`true`/`false`/`1`/`0` string.
#[must_use]
pub fn bool_for_key(dict: &Dict, key: &str, default: bool) -> bool {
    match dict.get(key) {
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|v| v != 0.0),
        Some(Value::String(s)) => bool_for_string(s).unwrap_or(default),
        _ => default,
    }
}

/// Parse a textual flag.
#[must_use]
pub fn bool_for_string(text: &str) -> Option<bool> {
    match text.trim().to_ascii_lowercase().as_str() {
        "yes" | "true" | "1" => Some(true),
        "no" | "false" | "0" => Some(false),
        _ => None,
    }
}

/// Read a number stored as a JSON number or a numeric string.
#[must_use]
pub fn float_for_key(dict: &Dict, key: &str) -> Option<f64> {
    match dict.get(key)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

#[allow(clippy::cast_possible_truncation)]
fn int_for_key(dict: &Dict, key: &str) -> Option<i64> {
    float_for_key(dict, key).map(|v| v.round() as i64)
}
