//! Conversion options.

use serde::Deserialize;

/// Knobs for a single conversion run.
///
/// Deserializes from JSON; missing fields take their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
#[allow(clippy::struct_excessive_bools)]
pub struct ConvertOptions {
    /// Collapse attribute-less single-child groups after generation.
    pub prune_groups: bool,
    /// Emit a `font-face` definition for every font used.
    pub font_faces: bool,
    /// Emit advisory `textLength` on simple text spans.
    pub text_length_hints: bool,
    /// Unit suffix for the root `width` and `height` (e.g. `"pt"`).
    pub unit: Option<String>,
    /// Print warnings to stderr as they are raised.
    pub echo_warnings: bool,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            prune_groups: true,
            font_faces: false,
            text_length_hints: true,
            unit: None,
            echo_warnings: false,
        }
    }
}
