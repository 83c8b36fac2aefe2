/*!
 * Input data model for captured on-screen text regions.
 *
 * A `TextArea` is produced by the host's OCR/scene layer and handed to a
 * translation session. It carries the recognized text both as ordered lines
 * (with word rectangles, for line-by-line layout and word lookups) and as a
 * raw string (for dialog-style word wrapping).
 */

use serde::{Deserialize, Serialize};

use crate::geometry::{Rectf, Vec2f};

/// A single recognized word and its screen rectangle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WordInfo {
    /// The word text
    pub word: String,
    /// Screen rectangle covering the word
    pub rect: Rectf,
}

/// One recognized line of text
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineInfo {
    /// The full line text
    pub text: String,
    /// Words making up the line, in reading order
    pub words: Vec<WordInfo>,
    /// Screen rectangle covering the line
    pub rect: Rectf,
}

/// A captured region of on-screen text, externally owned
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextArea {
    /// Detected source language code (ISO 639-1 style), may be empty
    pub language: String,
    /// Raw text as captured, line breaks preserved
    pub raw_text: String,
    /// Recognized lines in reading order
    pub lines: Vec<LineInfo>,
    /// Top-left positions of each line, used for line-by-line layout
    pub line_starts: Vec<Vec2f>,
    /// Average glyph height across the area, in pixels
    pub average_text_height: f32,
    /// Bounding rectangle of the whole area
    pub rect: Rectf,
    /// Whether this area looks like free-flowing dialog text
    pub is_dialog: bool,
}

impl TextArea {
    /// All line texts joined with `\n`, the line-by-line translation payload
    pub fn joined_lines(&self) -> String {
        self.lines
            .iter()
            .map(|l| l.text.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Total character count across all lines (Unicode scalar values)
    pub fn char_count(&self) -> usize {
        self.lines.iter().map(|l| l.text.chars().count()).sum()
    }

    /// Find the word containing a screen point, if any
    pub fn word_at(&self, point: Vec2f) -> Option<&WordInfo> {
        self.lines
            .iter()
            .flat_map(|l| l.words.iter())
            .find(|w| w.rect.contains(point))
    }

    /// Line top-left offsets relative to the area's own top-left corner
    pub fn local_line_offsets(&self) -> Vec<Vec2f> {
        let origin = self.rect.top_left();
        self.line_starts
            .iter()
            .map(|p| Vec2f::new(p.x - origin.x, p.y - origin.y))
            .collect()
    }
}

/// Layout mode for a text area, selected by the host or per-area flag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TextHinting {
    /// Decide per area from its dialog flag
    #[default]
    Auto,
    /// Force word-wrapped dialog layout
    Dialog,
    /// Force fixed per-line layout
    LineByLine,
}

impl TextHinting {
    /// Resolve the effective dialog flag for an area
    pub fn is_dialog(&self, area: &TextArea) -> bool {
        match self {
            Self::Dialog => true,
            Self::LineByLine => false,
            Self::Auto => area.is_dialog,
        }
    }
}
