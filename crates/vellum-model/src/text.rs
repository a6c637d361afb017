//! Rich text and the text-shaping collaborator contract.
//!
//! Text is indexed by `char`, and the shaper produces exactly one glyph per
//! character, so glyph ranges and character ranges are interchangeable.

use std::ops::Range;

use serde::Deserialize;

use crate::color::Color;
use crate::font::FontDescriptor;
use crate::geometry::{Point, Rect, Size};

/// Font size used for characters not covered by any run.
pub const DEFAULT_FONT_SIZE: f64 = 12.0;

/// A span of characters sharing one font and color.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TextRun {
    /// Index of the first character.
    pub start: usize,
    /// Number of characters.
    pub length: usize,
    /// The run's font, if known.
    #[serde(default)]
    pub font: Option<FontDescriptor>,
    /// Foreground color.
    #[serde(default)]
    pub color: Color,
}

impl TextRun {
    /// The character range covered by this run.
    #[must_use]
    pub const fn range(&self) -> Range<usize> {
        self.start..self.start.saturating_add(self.length)
    }

    fn unstyled(range: Range<usize>) -> Self {
        Self {
            start: range.start,
            length: range.len(),
            font: None,
            color: Color::BLACK,
        }
    }
}

/// A string partitioned into runs of uniform attributes.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RichText {
    /// The characters.
    pub string: String,
    /// Runs of uniform attributes; see [`RichText::covering_runs`].
    #[serde(default)]
    pub runs: Vec<TextRun>,
}

impl RichText {
    /// A single run covering all of `string`.
    #[must_use]
    pub fn plain(string: impl Into<String>, font: FontDescriptor, color: Color) -> Self {
        let string = string.into();
        let length = string.chars().count();
        Self {
            string,
            runs: vec![TextRun {
                start: 0,
                length,
                font: Some(font),
                color,
            }],
        }
    }

    /// Number of characters.
    #[must_use]
    pub fn char_count(&self) -> usize {
        self.string.chars().count()
    }

    /// Runs sorted by start and clipped to the text, with uncovered gaps
    /// filled by font-less black runs.
    ///
    /// The result covers every character exactly once, in document order.
    /// Overlapping input runs are cut at the end of the earlier one.
    #[must_use]
    pub fn covering_runs(&self) -> Vec<TextRun> {
        let count = self.char_count();
        let mut sorted: Vec<&TextRun> = self.runs.iter().collect();
        sorted.sort_by_key(|run| run.start);

        let mut covering = Vec::with_capacity(sorted.len() + 1);
        let mut next = 0;
        for run in sorted {
            let end = run.range().end.min(count);
            let start = run.start.max(next).min(end);
            if start == end {
                continue;
            }
            if next < start {
                covering.push(TextRun::unstyled(next..start));
            }
            covering.push(TextRun {
                start,
                length: end - start,
                ..run.clone()
            });
            next = end;
        }
        if next < count {
            covering.push(TextRun::unstyled(next..count));
        }
        covering
    }

    /// The run covering character `index`.
    #[must_use]
    pub fn run_at(&self, index: usize) -> Option<&TextRun> {
        self.runs.iter().find(|run| run.range().contains(&index))
    }
}

/// Whether `ch` ends a line.
#[must_use]
pub const fn is_line_terminator(ch: char) -> bool {
    matches!(ch, '\n' | '\r' | '\u{2028}' | '\u{2029}')
}

/// One laid-out line.
#[derive(Debug, Clone, PartialEq)]
pub struct LineFragment {
    /// Line rectangle in text-container space (origin top-left, Y down).
    pub rect: Rect,
    /// Glyphs placed on this line, including a trailing line terminator.
    pub glyph_range: Range<usize>,
}

/// Placement of a single glyph.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Glyph {
    /// Position relative to the line fragment origin; `y` is the baseline.
    pub location: Point,
    /// Nominal advance width.
    pub advance: f64,
    /// Whether the glyph sits at its predecessor's nominal advance.
    pub nominal: bool,
}

/// Output of a [`TextShaper`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextLayout {
    /// Lines in order.
    pub fragments: Vec<LineFragment>,
    /// One entry per character.
    pub glyphs: Vec<Glyph>,
}

impl TextLayout {
    /// The glyph at `index`, if laid out.
    #[must_use]
    pub fn glyph(&self, index: usize) -> Option<&Glyph> {
        self.glyphs.get(index)
    }
}

/// Text-shaping collaborator: line breaking and glyph placement.
pub trait TextShaper {
    /// Lay out `text` in a container of `container` size.
    fn layout(&self, text: &RichText, container: Size) -> TextLayout;
}

/// Shaper using fixed-ratio metrics instead of real font data.
///
/// Every glyph advances 0.6 em, lines are 1.2 em tall (of the largest font
/// on the line) with the baseline at 80% of the line height. Lines break at
/// the last space that fits, or mid-word when a word alone overflows, and
/// always after a line terminator.
#[derive(Debug, Clone, Copy, Default)]
pub struct ApproximateShaper;

impl ApproximateShaper {
    const CHAR_WIDTH_RATIO: f64 = 0.6;
    const LINE_HEIGHT_RATIO: f64 = 1.2;
    const BASELINE_RATIO: f64 = 0.8;

    fn font_size(text: &RichText, index: usize) -> f64 {
        text.run_at(index)
            .and_then(|run| run.font.as_ref())
            .map_or(DEFAULT_FONT_SIZE, |font| font.size)
    }

    fn break_lines(chars: &[char], advances: &[f64], width: f64) -> Vec<Range<usize>> {
        let mut lines = Vec::new();
        let mut line_start = 0;
        let mut x = 0.0;
        let mut last_break = None;
        let mut i = 0;

        while i < chars.len() {
            if is_line_terminator(chars[i]) {
                lines.push(line_start..i + 1);
                line_start = i + 1;
                x = 0.0;
                last_break = None;
                i += 1;
                continue;
            }

            if width > 0.0 && i > line_start && x + advances[i] > width {
                match last_break.take() {
                    Some(at) if at > line_start => {
                        lines.push(line_start..at);
                        line_start = at;
                        x = advances[at..i].iter().sum();
                    }
                    _ => {
                        lines.push(line_start..i);
                        line_start = i;
                        x = 0.0;
                    }
                }
                continue;
            }

            x += advances[i];
            if chars[i] == ' ' {
                last_break = Some(i + 1);
            }
            i += 1;
        }

        if line_start < chars.len() {
            lines.push(line_start..chars.len());
        }
        lines
    }
}

impl TextShaper for ApproximateShaper {
    fn layout(&self, text: &RichText, container: Size) -> TextLayout {
        let chars: Vec<char> = text.string.chars().collect();
        let sizes: Vec<f64> = (0..chars.len()).map(|i| Self::font_size(text, i)).collect();
        let advances: Vec<f64> = chars
            .iter()
            .zip(&sizes)
            .map(|(&ch, &size)| {
                if is_line_terminator(ch) {
                    0.0
                } else {
                    size * Self::CHAR_WIDTH_RATIO
                }
            })
            .collect();

        let mut layout = TextLayout {
            fragments: Vec::new(),
            glyphs: Vec::with_capacity(chars.len()),
        };
        let mut top = 0.0;
        for range in Self::break_lines(&chars, &advances, container.width) {
            let tallest = sizes[range.clone()]
                .iter()
                .copied()
                .fold(0.0_f64, f64::max);
            let line_height = tallest * Self::LINE_HEIGHT_RATIO;
            let baseline = line_height * Self::BASELINE_RATIO;

            let mut x = 0.0;
            for i in range.clone() {
                layout.glyphs.push(Glyph {
                    location: Point::new(x, baseline),
                    advance: advances[i],
                    nominal: true,
                });
                x += advances[i];
            }
            layout.fragments.push(LineFragment {
                rect: Rect::new(0.0, top, container.width, line_height),
                glyph_range: range,
            });
            top += line_height;
        }
        layout
    }
}
