//! Geometry primitives.
//!
//! Source documents use a bottom-up Y axis; these types carry raw numbers
//! and make no assumption about which space they live in.

use serde::{Deserialize, Deserializer, de};

/// A 2D point.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Point {
    /// X coordinate.
    pub x: f64,
    /// Y coordinate.
    pub y: f64,
}

impl Point {
    /// Create a point.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Parse `"{x, y}"` (braces optional).
    #[must_use]
    pub fn parse(text: &str) -> Option<Self> {
        match parse_numbers(text)?.as_slice() {
            &[x, y] => Some(Self { x, y }),
            _ => None,
        }
    }
}

/// A width/height pair.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Size {
    /// Horizontal extent.
    pub width: f64,
    /// Vertical extent.
    pub height: f64,
}

impl Size {
    /// Create a size.
    #[must_use]
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// An axis-aligned rectangle given by origin and size.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Rect {
    /// X of the origin.
    pub x: f64,
    /// Y of the origin.
    pub y: f64,
    /// Width.
    pub width: f64,
    /// Height.
    pub height: f64,
}

impl Rect {
    /// Create a rectangle.
    #[must_use]
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Parse `"{{x, y}, {w, h}}"` (braces optional).
    #[must_use]
    pub fn parse(text: &str) -> Option<Self> {
        match parse_numbers(text)?.as_slice() {
            &[x, y, width, height] => Some(Self::new(x, y, width, height)),
            _ => None,
        }
    }

    /// The rectangle's size.
    #[must_use]
    pub const fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Largest X coordinate.
    #[must_use]
    pub fn max_x(&self) -> f64 {
        self.x + self.width
    }

    /// Largest Y coordinate.
    #[must_use]
    pub fn max_y(&self) -> f64 {
        self.y + self.height
    }

    /// Centre point.
    #[must_use]
    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Smallest rectangle containing all `points`, or `None` if empty.
    #[must_use]
    pub fn bounding(points: &[Point]) -> Option<Self> {
        let first = points.first()?;
        let (mut min, mut max) = (*first, *first);
        for p in points {
            min.x = min.x.min(p.x);
            min.y = min.y.min(p.y);
            max.x = max.x.max(p.x);
            max.y = max.y.max(p.y);
        }
        Some(Self::new(min.x, min.y, max.x - min.x, max.y - min.y))
    }
}

/// Split a brace/comma formatted list like `{{1, 2}, {3, 4}}` into numbers.
fn parse_numbers(text: &str) -> Option<Vec<f64>> {
    text.split(|c: char| c == ',' || c == '{' || c == '}')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| s.parse::<f64>().ok())
        .collect()
}

/// Serialized form accepted for points and rectangles: a numeric array or a
/// brace-formatted string.
#[derive(Deserialize)]
#[serde(untagged)]
enum NumberList {
    Numbers(Vec<f64>),
    Text(String),
}

impl NumberList {
    fn into_numbers(self) -> Result<Vec<f64>, String> {
        match self {
            Self::Numbers(numbers) => Ok(numbers),
            Self::Text(text) => parse_numbers(&text).ok_or_else(|| format!("bad number list '{text}'")),
        }
    }
}

impl<'de> Deserialize<'de> for Point {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let numbers = NumberList::deserialize(deserializer)?
            .into_numbers()
            .map_err(de::Error::custom)?;
        match numbers.as_slice() {
            &[x, y] => Ok(Self::new(x, y)),
            other => Err(de::Error::custom(format!(
                "expected 2 numbers for a point, got {}",
                other.len()
            ))),
        }
    }
}

impl<'de> Deserialize<'de> for Rect {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let numbers = NumberList::deserialize(deserializer)?
            .into_numbers()
            .map_err(de::Error::custom)?;
        match numbers.as_slice() {
            &[x, y, w, h] => Ok(Self::new(x, y, w, h)),
            other => Err(de::Error::custom(format!(
                "expected 4 numbers for a rectangle, got {}",
                other.len()
            ))),
        }
    }
}
