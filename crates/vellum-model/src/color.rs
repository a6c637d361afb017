//! sRGB colors with floating-point components.

use serde::{Deserialize, Deserializer, de};

/// An sRGB color with straight alpha, every component in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    /// Red channel.
    pub r: f64,
    /// Green channel.
    pub g: f64,
    /// Blue channel.
    pub b: f64,
    /// Alpha channel (1 = fully opaque).
    pub a: f64,
}

impl Color {
    /// Opaque black.
    pub const BLACK: Self = Self::rgba(0.0, 0.0, 0.0, 1.0);

    /// Opaque white.
    pub const WHITE: Self = Self::rgba(1.0, 1.0, 1.0, 1.0);

    /// Create a color from components.
    #[must_use]
    pub const fn rgba(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self { r, g, b, a }
    }

    /// Parse `#rgb`, `#rrggbb` or `#rrggbbaa` (hash optional).
    #[must_use]
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        if !hex.is_ascii() {
            return None;
        }
        let channel = |s: &str| u8::from_str_radix(s, 16).ok().map(|v| f64::from(v) / 255.0);
        match hex.len() {
            3 => Some(Self::rgba(
                channel(&hex[0..1].repeat(2))?,
                channel(&hex[1..2].repeat(2))?,
                channel(&hex[2..3].repeat(2))?,
                1.0,
            )),
            6 | 8 => Some(Self::rgba(
                channel(&hex[0..2])?,
                channel(&hex[2..4])?,
                channel(&hex[4..6])?,
                if hex.len() == 8 { channel(&hex[6..8])? } else { 1.0 },
            )),
            _ => None,
        }
    }

    /// Build a color from 3 or 4 components; out-of-range values are clamped.
    #[must_use]
    pub fn from_components(components: &[f64]) -> Option<Self> {
        let clamp = |v: f64| v.clamp(0.0, 1.0);
        match *components {
            [r, g, b] => Some(Self::rgba(clamp(r), clamp(g), clamp(b), 1.0)),
            [r, g, b, a] => Some(Self::rgba(clamp(r), clamp(g), clamp(b), clamp(a))),
            _ => None,
        }
    }

    /// Whether the RGB channels are all zero, regardless of alpha.
    #[must_use]
    pub fn is_black(&self) -> bool {
        self.r == 0.0 && self.g == 0.0 && self.b == 0.0
    }

    /// Whether this is black at full opacity.
    #[must_use]
    pub fn is_opaque_black(&self) -> bool {
        self.is_black() && self.a >= 1.0
    }

    /// Whether alpha is so small the color paints nothing.
    #[must_use]
    pub fn is_transparent(&self) -> bool {
        self.a < 1.0 / 512.0
    }

    /// The color as an SVG paint value, ignoring alpha.
    ///
    /// Black and white use their keywords; anything else is `#rrggbb`.
    #[must_use]
    pub fn to_svg(&self) -> String {
        let (r, g, b) = (to_byte(self.r), to_byte(self.g), to_byte(self.b));
        match (r, g, b) {
            (0, 0, 0) => "black".to_string(),
            (255, 255, 255) => "white".to_string(),
            _ => format!("#{r:02x}{g:02x}{b:02x}"),
        }
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::BLACK
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn to_byte(channel: f64) -> u8 {
    (channel.clamp(0.0, 1.0) * 255.0).round() as u8
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ColorRepr {
    Components(Vec<f64>),
    Hex(String),
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match ColorRepr::deserialize(deserializer)? {
            ColorRepr::Components(components) => Self::from_components(&components)
                .ok_or_else(|| de::Error::custom("expected 3 or 4 color components")),
            ColorRepr::Hex(hex) => {
                Self::from_hex(&hex).ok_or_else(|| de::Error::custom(format!("bad color '{hex}'")))
            }
        }
    }
}
