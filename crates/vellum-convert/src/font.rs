//! Font descriptor to CSS font attribute mapping.
//!
//! [CSS Fonts Module Level 4](https://www.w3.org/TR/css-fonts-4/)

use std::collections::HashMap;

use vellum_dom::{DomTree, ElementData, NodeId};
use vellum_model::{FontClass, FontDescriptor};

/// Style attributes derived from a font descriptor. Size is not included.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontAttributes {
    /// `font-style`: `normal`, `italic` or `oblique`.
    pub style: &'static str,
    /// `font-weight`: `normal`, `bold` or a multiple of 100.
    pub weight: String,
    /// `font-stretch`: `normal`, `condensed` or `expanded`.
    pub stretch: &'static str,
    /// The family name alone, quoted when needed.
    pub face_family: String,
    /// `font-family`: the family name followed by generic fallbacks.
    pub family: String,
}

/// Font attribute cache keyed by font name, kept in first-seen order.
#[derive(Debug, Default)]
pub struct FontMapper {
    index: HashMap<String, usize>,
    entries: Vec<(String, FontAttributes)>,
}

impl FontMapper {
    /// Create an empty mapper.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Attributes for `font`, computed once per font name.
    pub fn attributes(&mut self, font: &FontDescriptor) -> &FontAttributes {
        let index = match self.index.get(&font.name) {
            Some(&index) => index,
            None => {
                let index = self.entries.len();
                self.entries.push((font.name.clone(), map_font(font)));
                let _ = self.index.insert(font.name.clone(), index);
                index
            }
        };
        &self.entries[index].1
    }

    /// Number of distinct fonts seen.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no font has been seen.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Append one `font-face` per cached font to `defs`.
    pub fn append_font_faces(&self, tree: &mut DomTree, defs: NodeId) {
        for (name, attrs) in &self.entries {
            let mut face = ElementData::svg("font-face");
            face.set_attr("font-family", attrs.face_family.as_str());
            set_font_style(&mut face, attrs);
            let face = tree.append_element(defs, face);
            let src = tree.append_element(face, ElementData::svg("font-face-src"));
            let mut face_name = ElementData::svg("font-face-name");
            face_name.set_attr("name", name.as_str());
            let _ = tree.append_element(src, face_name);
        }
    }
}

/// Set `font-weight`, `font-style` and `font-stretch` where they are not `normal`.
pub fn set_font_style(element: &mut ElementData, attrs: &FontAttributes) {
    if attrs.weight != "normal" {
        element.set_attr("font-weight", attrs.weight.as_str());
    }
    if attrs.style != "normal" {
        element.set_attr("font-style", attrs.style);
    }
    if attrs.stretch != "normal" {
        element.set_attr("font-stretch", attrs.stretch);
    }
}

/// Derive the attributes of one font.
#[must_use]
pub fn map_font(font: &FontDescriptor) -> FontAttributes {
    let face_family = quote_family(font.family_name());

    let mut family = face_family.clone();
    if font.fixed_pitch {
        family.push_str(", monospace");
    }
    if let Some(generic) = generic_family(font.class) {
        family.push_str(", ");
        family.push_str(generic);
    }

    FontAttributes {
        style: font_style(font),
        weight: font_weight(font),
        stretch: font_stretch(font),
        face_family,
        family,
    }
}

/// Weight on the 0–15 scale to a CSS weight.
#[must_use]
pub fn font_weight(font: &FontDescriptor) -> String {
    let weight = font.weight;
    if font.bold || weight > 5 {
        if weight == 7 || weight <= 4 {
            "bold".to_string()
        } else {
            (u32::from(weight) * 100).min(900).to_string()
        }
    } else if weight < 5 {
        match weight {
            4 | 3 => "300",
            2 | 1 => "200",
            _ => "100",
        }
        .to_string()
    } else {
        "normal".to_string()
    }
}

/// `italic` or `oblique` for slanted faces, whichever the face name mentions first.
#[must_use]
pub fn font_style(font: &FontDescriptor) -> &'static str {
    if !font.italic {
        return "normal";
    }
    let name = font.name.to_ascii_lowercase();
    match (name.find("oblique"), name.find("italic")) {
        (Some(oblique), Some(italic)) if oblique <= italic => "oblique",
        (Some(_), None) => "oblique",
        _ => "italic",
    }
}

const fn font_stretch(font: &FontDescriptor) -> &'static str {
    if font.condensed {
        "condensed"
    } else if font.expanded {
        "expanded"
    } else {
        "normal"
    }
}

/// At most one generic family, by fixed priority over the classification.
const fn generic_family(class: FontClass) -> Option<&'static str> {
    match class {
        FontClass::SansSerif => Some("sans-serif"),
        FontClass::Script => Some("cursive"),
        FontClass::Ornamental => Some("fantasy"),
        _ if class.is_serif() => Some("serif"),
        _ => None,
    }
}

/// [§ 4.2 font-family](https://www.w3.org/TR/css-fonts-4/#font-family-prop)
///
/// "Font family names other than generic families must either be given
/// quoted as strings, or unquoted as a sequence of one or more identifiers."
/// Generic family keywords must be quoted to be read as family names.
#[must_use]
pub fn quote_family(name: &str) -> String {
    const KEYWORDS: &[&str] = &[
        "serif",
        "sans-serif",
        "monospace",
        "cursive",
        "fantasy",
        "system-ui",
        "inherit",
        "initial",
        "unset",
        "default",
    ];

    let bare = !name.is_empty()
        && name.split(' ').all(is_identifier)
        && !KEYWORDS.contains(&name.to_ascii_lowercase().as_str());
    if bare {
        return name.to_string();
    }

    let mut quoted = String::with_capacity(name.len() + 2);
    quoted.push('\'');
    for ch in name.chars() {
        if ch == '\'' || ch == '\\' {
            quoted.push('\\');
        }
        quoted.push(ch);
    }
    quoted.push('\'');
    quoted
}

/// [§ 4.3.9 Check if three code points would start an ident sequence](https://www.w3.org/TR/css-syntax-3/#would-start-an-identifier)
/// followed only by ident code points. Escapes are not considered.
fn is_identifier(word: &str) -> bool {
    let mut chars = word.chars();
    let starts = match chars.next() {
        Some('-') => chars
            .clone()
            .next()
            .is_some_and(|c| c == '-' || is_ident_start_code_point(c)),
        Some(c) => is_ident_start_code_point(c),
        None => false,
    };
    starts && chars.all(is_ident_code_point)
}

/// "A letter, a non-ASCII code point, or U+005F LOW LINE (_)."
fn is_ident_start_code_point(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || !c.is_ascii()
}

/// "An ident-start code point, a digit, or U+002D HYPHEN-MINUS (-)."
fn is_ident_code_point(c: char) -> bool {
    is_ident_start_code_point(c) || c.is_ascii_digit() || c == '-'
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identifiers() {
        assert!(is_identifier("Helvetica"));
        assert!(is_identifier("-apple-system"));
        assert!(is_identifier("--x"));
        assert!(!is_identifier("-9"));
        assert!(!is_identifier("9Point"));
        assert!(!is_identifier(""));
    }
}
