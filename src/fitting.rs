/*!
 * Adaptive text fitting: pixel-height selection and line wrapping for a
 * target rectangle.
 *
 * Two algorithms, selected by the dialog flag:
 * - dialog text shrinks its height until the estimated character capacity of
 *   the rectangle covers the text, then word-wraps at that height;
 * - line-by-line text keeps the captured line structure and only scales the
 *   height down when the widest line overflows the rectangle.
 *
 * Actual glyph measurement is an external concern behind the `TextMeasurer`
 * trait; the bundled `HeuristicMeasurer` estimates from a width/height glyph
 * ratio, which is exact enough for monospaced estimates and for tests.
 */

use log::debug;

use crate::app_config::Config;
use crate::errors::FitError;
use crate::geometry::{Rectf, Vec2f};
use crate::language_utils::is_asian_language;
use crate::text_area::TextArea;

/// Default width/height glyph ratio when nothing is configured
pub const DEFAULT_WIDTH_MOD: f32 = 0.60;

/// Fallback ratio for wide Asian glyphs without a configured font override
pub const ASIAN_FALLBACK_WIDTH_MOD: f32 = 1.0;

/// Fixed padding heuristic applied to the target rectangle after fitting
pub const RECT_PADDING_FACTOR: f32 = 1.5;

/// Heights below this cannot render legibly; descents stop here and report
/// failure rather than running forever or going non-positive
pub const MIN_PIXEL_HEIGHT: f32 = 1.0;

/// Result of a fitting pass
#[derive(Debug, Clone, PartialEq)]
pub struct FitResult {
    /// Chosen pixel height, always above `MIN_PIXEL_HEIGHT`
    pub pixel_height: f32,
    /// Wrapped lines in display order
    pub lines: Vec<String>,
    /// Size of the wrapped block at the chosen height
    pub wrapped_size: Vec2f,
}

/// External text-measurement collaborator
///
/// `wrap` breaks `text` into lines no wider than `max_size.x` at the given
/// pixel height and returns the lines together with the measured block size.
/// `width_mod` is the estimated glyph width/height ratio; measurers backed by
/// a real rasterizer may ignore it.
pub trait TextMeasurer: Send + Sync {
    /// Wrap text into the given width at a pixel height
    fn wrap(
        &self,
        text: &str,
        max_size: Vec2f,
        pixel_height: f32,
        width_mod: f32,
    ) -> (Vec<String>, Vec2f);
}

/// Character-count based measurer using greedy word wrapping
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicMeasurer;

impl TextMeasurer for HeuristicMeasurer {
    fn wrap(
        &self,
        text: &str,
        max_size: Vec2f,
        pixel_height: f32,
        width_mod: f32,
    ) -> (Vec<String>, Vec2f) {
        let char_width = (pixel_height * width_mod).max(f32::EPSILON);
        let columns = ((max_size.x / char_width).floor() as usize).max(1);

        let mut lines: Vec<String> = Vec::new();
        for paragraph in text.split('\n') {
            if paragraph.is_empty() {
                lines.push(String::new());
                continue;
            }
            for wrapped in textwrap::wrap(paragraph, columns) {
                lines.push(wrapped.into_owned());
            }
        }

        let widest = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0);
        let size = Vec2f::new(widest as f32 * char_width, lines.len() as f32 * pixel_height);
        (lines, size)
    }
}

/// Width/height glyph ratio for a language
///
/// A configured override always wins; an Asian script without one falls back
/// to a square ratio, everything else to the default.
pub fn width_modifier(language: &str, config: &Config) -> f32 {
    config.width_override(language).unwrap_or(if is_asian_language(language) {
        ASIAN_FALLBACK_WIDTH_MOD
    } else {
        DEFAULT_WIDTH_MOD
    })
}

/// Shrink a starting height until the rectangle's estimated character
/// capacity covers `char_count`
///
/// Capacity at height `h` is `(w / (h * width_mod)) * (rect_h / h)`. The
/// descent reduces the height by 1% per step and stops once capacity is
/// sufficient, or fails once the height reaches `MIN_PIXEL_HEIGHT`.
pub fn shrink_to_fit_char_budget(
    start_height: f32,
    width_mod: f32,
    char_count: usize,
    rect: &Rectf,
) -> Result<f32, FitError> {
    if !rect.is_valid() {
        return Err(FitError::DegenerateRect {
            width: rect.width,
            height: rect.height,
        });
    }

    let mut height = start_height.max(MIN_PIXEL_HEIGHT);
    let mut first_time = true;

    loop {
        if !first_time {
            // too big, make it smaller and try again
            height -= height / 100.0;
        }
        first_time = false;

        if height < MIN_PIXEL_HEIGHT {
            return Err(FitError::Unconvergible {
                width: rect.width,
                height: rect.height,
                min_height: MIN_PIXEL_HEIGHT,
            });
        }

        let char_width = height * width_mod;
        let vertical_lines_available = rect.height / height;
        let capacity = (rect.width / char_width) * vertical_lines_available;

        if capacity >= char_count as f32 {
            return Ok(height);
        }
    }
}

/// Wrap text into a rectangle, descending the height 5% per step until the
/// wrapped block fits vertically
///
/// `start_height` of `None` defaults to the average glyph height. The descent
/// is bounded by `MIN_PIXEL_HEIGHT` so it always terminates.
pub fn word_wrap_to_rect(
    text: &str,
    rect: &Rectf,
    start_height: Option<f32>,
    average_height: f32,
    width_mod: f32,
    measurer: &dyn TextMeasurer,
) -> Result<FitResult, FitError> {
    if !rect.is_valid() {
        return Err(FitError::DegenerateRect {
            width: rect.width,
            height: rect.height,
        });
    }

    let mut pixel_height = match start_height {
        Some(h) if h > 0.0 => h,
        _ => average_height,
    };
    let mut first_time = true;

    loop {
        if !first_time {
            // make it smaller, it still doesn't fit
            pixel_height *= 0.95;
        }
        first_time = false;

        if pixel_height < MIN_PIXEL_HEIGHT {
            return Err(FitError::Unconvergible {
                width: rect.width,
                height: rect.height,
                min_height: MIN_PIXEL_HEIGHT,
            });
        }

        let (lines, wrapped_size) = measurer.wrap(text, rect.size(), pixel_height, width_mod);
        debug!("Trying size {:.2}, wrapped height {:.2}", pixel_height, wrapped_size.y);

        if wrapped_size.y <= rect.height {
            return Ok(FitResult {
                pixel_height,
                lines,
                wrapped_size,
            });
        }
    }
}

/// Text shaped for sending to the renderer
#[derive(Debug, Clone)]
pub struct ShapedText {
    /// Lines to lay out
    pub lines: Vec<String>,
    /// Chosen pixel height
    pub pixel_height: f32,
    /// Target rectangle after the fixed padding expansion
    pub padded_rect: Rectf,
    /// Glyph width/height ratio used for the estimate
    pub width_mod: f32,
    /// Total character count across all lines
    pub char_count: usize,
}

/// Shape a piece of text against its area before rendering
///
/// The translated path splits on `\n` (dropping a trailing empty line the
/// backend tends to append); the source path keeps the captured line
/// structure. Dialog areas get the shrink-to-fit budget pass, line-by-line
/// areas only scale down on horizontal overflow. The target rectangle is
/// always expanded by the fixed padding factor afterwards.
pub fn shape_for_layout(
    text: &str,
    area: &TextArea,
    is_translated: bool,
    dialog: bool,
    target_language: &str,
    config: &Config,
) -> Result<ShapedText, FitError> {
    let lines: Vec<String> = if is_translated {
        let mut lines: Vec<String> = text.split('\n').map(|s| s.to_string()).collect();
        if lines.last().is_some_and(|l| l.is_empty()) {
            lines.pop();
        }
        lines
    } else {
        area.lines.iter().map(|l| l.text.clone()).collect()
    };

    let language = if is_translated { target_language } else { area.language.as_str() };
    let width_mod = width_modifier(language, config);

    let mut height = area.average_text_height;
    let mut max_width: f32 = 0.0;
    let mut char_count = 0usize;

    for line in &lines {
        let len = line.chars().count();
        char_count += len;
        max_width = max_width.max(len as f32 * width_mod * area.average_text_height);
    }

    if dialog {
        height = shrink_to_fit_char_budget(height, width_mod, char_count, &area.rect)?;
        if height > area.average_text_height {
            height = area.average_text_height;
        }
    } else if max_width > area.rect.width {
        let ratio = area.rect.width / max_width;
        height *= ratio;
    }

    if !is_translated {
        height *= config.pre_translated_height_mod(&area.language);
    }

    Ok(ShapedText {
        lines,
        pixel_height: height.max(MIN_PIXEL_HEIGHT),
        padded_rect: area.rect.scale_size(RECT_PADDING_FACTOR),
        width_mod,
        char_count,
    })
}

/// Fixed per-line layout at a precomputed height
///
/// Used for label/subtitle-style areas where the captured line structure is
/// preserved as-is.
pub fn layout_line_by_line(shaped: &ShapedText) -> FitResult {
    let char_width = shaped.pixel_height * shaped.width_mod;
    let widest = shaped
        .lines
        .iter()
        .map(|l| l.chars().count())
        .max()
        .unwrap_or(0);

    FitResult {
        pixel_height: shaped.pixel_height,
        lines: shaped.lines.clone(),
        wrapped_size: Vec2f::new(
            widest as f32 * char_width,
            shaped.lines.len() as f32 * shaped.pixel_height,
        ),
    }
}
