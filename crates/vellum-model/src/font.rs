//! Font descriptors as stored in rich text runs.

use serde::Deserialize;

/// Default weight on the 0–15 weight scale (regular).
pub const NORMAL_WEIGHT: u8 = 5;

/// Broad typographic classification of a font family.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FontClass {
    /// No classification available.
    #[default]
    Unknown,
    /// Old-style serif faces (Garamond).
    OldStyleSerif,
    /// Transitional serif faces (Times).
    TransitionalSerif,
    /// Modern serif faces (Didot).
    ModernSerif,
    /// Clarendon serif faces.
    ClarendonSerif,
    /// Slab serif faces (Rockwell).
    SlabSerif,
    /// Freeform serif faces.
    FreeformSerif,
    /// Sans-serif faces (Helvetica).
    SansSerif,
    /// Decorative display faces.
    Ornamental,
    /// Script and handwriting faces.
    Script,
    /// Symbol and dingbat faces.
    Symbolic,
}

impl FontClass {
    /// Whether this is one of the serif classes.
    #[must_use]
    pub const fn is_serif(self) -> bool {
        matches!(
            self,
            Self::OldStyleSerif
                | Self::TransitionalSerif
                | Self::ModernSerif
                | Self::ClarendonSerif
                | Self::SlabSerif
                | Self::FreeformSerif
        )
    }
}

/// A concrete font face at a size, as referenced by a text run.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FontDescriptor {
    /// Internal (PostScript-style) face name, e.g. `Helvetica-BoldOblique`.
    pub name: String,
    /// Family name, e.g. `Helvetica`. Derived from `name` when absent.
    #[serde(default)]
    pub family: Option<String>,
    /// Point size.
    pub size: f64,
    /// Weight on the 0–15 scale, 5 being regular and 9 bold.
    #[serde(default = "default_weight")]
    pub weight: u8,
    /// Bold trait flag.
    #[serde(default)]
    pub bold: bool,
    /// Italic/oblique trait flag.
    #[serde(default)]
    pub italic: bool,
    /// Condensed width trait.
    #[serde(default)]
    pub condensed: bool,
    /// Expanded width trait.
    #[serde(default)]
    pub expanded: bool,
    /// Fixed-pitch (monospace) trait.
    #[serde(default)]
    pub fixed_pitch: bool,
    /// Family classification.
    #[serde(default)]
    pub class: FontClass,
}

const fn default_weight() -> u8 {
    NORMAL_WEIGHT
}

impl FontDescriptor {
    /// A regular-weight face with no traits.
    #[must_use]
    pub fn new(name: impl Into<String>, size: f64) -> Self {
        Self {
            name: name.into(),
            family: None,
            size,
            weight: NORMAL_WEIGHT,
            bold: false,
            italic: false,
            condensed: false,
            expanded: false,
            fixed_pitch: false,
            class: FontClass::Unknown,
        }
    }

    /// The family name: the explicit one, else `name` up to the first `-`.
    #[must_use]
    pub fn family_name(&self) -> &str {
        match &self.family {
            Some(family) if !family.trim().is_empty() => family.trim(),
            _ => self.name.split('-').next().unwrap_or(&self.name),
        }
    }
}
