//! Per-run generation state.

use std::collections::{HashMap, HashSet};

use vellum_common::image::ImageRecoder;
use vellum_common::{Diagnostics, WarningKind};

use crate::font::FontMapper;
use crate::options::ConvertOptions;
use crate::shadow::ShadowCache;

/// Everything a conversion run accumulates while walking the document.
///
/// Caches only grow; nothing is evicted before the run ends.
#[derive(Debug)]
pub struct GenerationContext {
    /// Options for this run.
    pub options: ConvertOptions,
    /// Recoverable problems seen so far.
    pub diagnostics: Diagnostics,
    /// Shadow filters by descriptor.
    pub shadows: ShadowCache,
    /// Font attributes by font name.
    pub fonts: FontMapper,
    next_id: usize,
    used_ids: HashSet<String>,
    images: HashMap<(String, Vec<u8>), Option<String>>,
}

impl GenerationContext {
    /// Fresh state for one run.
    #[must_use]
    pub fn new(options: ConvertOptions) -> Self {
        let diagnostics = if options.echo_warnings {
            Diagnostics::echoing()
        } else {
            Diagnostics::new()
        };
        Self {
            options,
            diagnostics,
            shadows: ShadowCache::new(),
            fonts: FontMapper::new(),
            next_id: 0,
            used_ids: HashSet::new(),
            images: HashMap::new(),
        }
    }

    /// Record a warning.
    pub fn warn(&mut self, kind: WarningKind, component: &'static str, message: impl Into<String>) {
        self.diagnostics.warn(kind, component, message);
    }

    /// A fresh `<prefix>N` id not used anywhere else in the document.
    pub fn generate_id(&mut self, prefix: &str) -> String {
        loop {
            self.next_id += 1;
            let id = format!("{prefix}{}", self.next_id);
            if self.used_ids.insert(id.clone()) {
                return id;
            }
        }
    }

    /// Reserve `name` as an element id if it is a valid, unused, non-generated name.
    pub fn claim_id(&mut self, name: &str) -> bool {
        is_xml_name(name) && !is_generated_id(name) && self.used_ids.insert(name.to_string())
    }

    /// Recode a bitmap once per distinct payload.
    ///
    /// Failures are reported once and remembered, so a repeated bad payload
    /// is skipped silently.
    pub fn recode_image(
        &mut self,
        recoder: &mut dyn ImageRecoder,
        bytes: &[u8],
        declared_type: &str,
    ) -> Option<String> {
        let key = (declared_type.to_string(), bytes.to_vec());
        if let Some(cached) = self.images.get(&key) {
            return cached.clone();
        }
        let locator = match recoder.recode(bytes, declared_type) {
            Ok(locator) => Some(locator),
            Err(err) => {
                self.diagnostics
                    .warn(WarningKind::ResourceFailure, "image", err.to_string());
                None
            }
        };
        let _ = self.images.insert(key, locator.clone());
        locator
    }
}

/// Ids of the form `shadowN` and `shapeN` belong to generated elements.
fn is_generated_id(name: &str) -> bool {
    ["shadow", "shape"].iter().any(|prefix| {
        name.strip_prefix(prefix)
            .is_some_and(|rest| !rest.is_empty() && rest.bytes().all(|b| b.is_ascii_digit()))
    })
}

/// [XML 1.0 § 2.3 Common Syntactic Constructs](https://www.w3.org/TR/xml/#NT-Name)
///
/// A name starts with a letter or underscore and continues with letters,
/// digits, `-`, `.` and `_`. Colons are excluded since ids are unprefixed.
#[must_use]
pub fn is_xml_name(name: &str) -> bool {
    let mut chars = name.chars();
    chars
        .next()
        .is_some_and(|c| c.is_alphabetic() || c == '_')
        && chars.all(|c| c.is_alphanumeric() || matches!(c, '-' | '.' | '_'))
}
