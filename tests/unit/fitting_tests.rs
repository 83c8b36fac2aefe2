/*!
 * Tests for the text-fitting engine
 */

use textlens::app_config::Config;
use textlens::errors::FitError;
use textlens::fitting::{
    DEFAULT_WIDTH_MOD, HeuristicMeasurer, MIN_PIXEL_HEIGHT, RECT_PADDING_FACTOR, TextMeasurer,
    shape_for_layout, shrink_to_fit_char_budget, width_modifier, word_wrap_to_rect,
};
use textlens::geometry::{Rectf, Vec2f};
use textlens::text_area::{LineInfo, TextArea};

fn capacity(height: f32, width_mod: f32, rect: &Rectf) -> f32 {
    (rect.width / (height * width_mod)) * (rect.height / height)
}

/// The shrink descent always yields a positive height with enough capacity
#[test]
fn test_shrinkToFit_withVariedGeometry_shouldSatisfyCharBudget() {
    let rects = [
        Rectf::from_size(100.0, 40.0),
        Rectf::from_size(320.0, 200.0),
        Rectf::from_size(15.0, 15.0),
        Rectf::from_size(800.0, 30.0),
    ];
    let counts = [1usize, 12, 80, 400];
    let mods = [0.4f32, 0.6, 1.0];

    for rect in &rects {
        for &count in &counts {
            for &width_mod in &mods {
                match shrink_to_fit_char_budget(24.0, width_mod, count, rect) {
                    Ok(height) => {
                        assert!(height > 0.0);
                        assert!(
                            capacity(height, width_mod, rect) >= count as f32,
                            "capacity too small for {} chars in {:?}",
                            count,
                            rect
                        );
                    }
                    Err(FitError::Unconvergible { min_height, .. }) => {
                        assert!(min_height > 0.0);
                    }
                    Err(e) => panic!("Unexpected error: {}", e),
                }
            }
        }
    }
}

/// A budget that already fits keeps the starting height
#[test]
fn test_shrinkToFit_withAmpleRoom_shouldKeepStartHeight() {
    let rect = Rectf::from_size(600.0, 300.0);
    let height = shrink_to_fit_char_budget(20.0, 0.6, 10, &rect).unwrap();
    assert!((height - 20.0).abs() < f32::EPSILON);
}

/// An impossible budget reports failure instead of a non-positive height
#[test]
fn test_shrinkToFit_withImpossibleBudget_shouldReportFailure() {
    let rect = Rectf::from_size(2.0, 2.0);
    let result = shrink_to_fit_char_budget(24.0, 1.0, 1_000_000, &rect);
    assert!(matches!(result, Err(FitError::Unconvergible { .. })));
}

/// Degenerate rectangles are rejected up front
#[test]
fn test_shrinkToFit_withDegenerateRect_shouldReportError() {
    let rect = Rectf::from_size(0.0, 40.0);
    let result = shrink_to_fit_char_budget(24.0, 0.6, 10, &rect);
    assert!(matches!(result, Err(FitError::DegenerateRect { .. })));
}

/// Word wrapping terminates and the wrapped block fits the rectangle
#[test]
fn test_wordWrapToRect_withLongText_shouldFitWithinHeight() {
    let measurer = HeuristicMeasurer;
    let rect = Rectf::from_size(240.0, 80.0);
    let text = "The quick brown fox jumps over the lazy dog again and again \
                until the sentence is long enough to need several lines";

    let fit = word_wrap_to_rect(text, &rect, Some(24.0), 24.0, 0.6, &measurer).unwrap();

    assert!(fit.pixel_height > 0.0);
    assert!(fit.pixel_height <= 24.0);
    assert!(fit.wrapped_size.y <= rect.height);
    assert!(!fit.lines.is_empty());
}

/// Unset start height defaults to the average glyph height
#[test]
fn test_wordWrapToRect_withUnsetHeight_shouldUseAverage() {
    let measurer = HeuristicMeasurer;
    let rect = Rectf::from_size(500.0, 200.0);

    let fit = word_wrap_to_rect("short", &rect, None, 18.0, 0.6, &measurer).unwrap();
    assert!((fit.pixel_height - 18.0).abs() < f32::EPSILON);
}

/// The descent is bounded; pathological input reports failure, not a hang
#[test]
fn test_wordWrapToRect_withTinyRect_shouldReportFailure() {
    struct NeverFits;
    impl TextMeasurer for NeverFits {
        fn wrap(
            &self,
            _text: &str,
            _max_size: Vec2f,
            pixel_height: f32,
            _width_mod: f32,
        ) -> (Vec<String>, Vec2f) {
            // Always taller than any rectangle
            (vec!["x".to_string()], Vec2f::new(10.0, pixel_height * 1000.0))
        }
    }

    let rect = Rectf::from_size(50.0, 10.0);
    let result = word_wrap_to_rect("text", &rect, Some(24.0), 24.0, 0.6, &NeverFits);
    assert!(matches!(result, Err(FitError::Unconvergible { min_height, .. }) if min_height == MIN_PIXEL_HEIGHT));
}

/// Width policy: override wins, Asian scripts fall back to square glyphs
#[test]
fn test_widthModifier_shouldFollowPolicy() {
    let mut config = Config::default();
    assert_eq!(width_modifier("en", &config), DEFAULT_WIDTH_MOD);
    assert_eq!(width_modifier("ja", &config), 1.0);
    assert_eq!(width_modifier("zh-CN", &config), 1.0);

    config.width_overrides.insert("ja".to_string(), 0.8);
    assert_eq!(width_modifier("ja", &config), 0.8);
}

fn label_area(line: &str) -> TextArea {
    TextArea {
        language: "ja".to_string(),
        raw_text: line.to_string(),
        lines: vec![LineInfo {
            text: line.to_string(),
            words: vec![],
            rect: Rectf::new(0.0, 0.0, 120.0, 20.0),
        }],
        line_starts: vec![],
        average_text_height: 16.0,
        rect: Rectf::new(0.0, 0.0, 120.0, 40.0),
        is_dialog: false,
    }
}

/// Shaping always expands the target rectangle by the padding factor
#[test]
fn test_shapeForLayout_shouldApplyPaddedRect() {
    let area = label_area("こんにちは");
    let config = Config::default();

    let shaped = shape_for_layout("Hello", &area, true, false, "en", &config).unwrap();

    assert_eq!(shaped.padded_rect.width, area.rect.width * RECT_PADDING_FACTOR);
    assert_eq!(shaped.padded_rect.height, area.rect.height * RECT_PADDING_FACTOR);
    assert!(shaped.pixel_height > 0.0);
}

/// Translated text drops the trailing empty line backends tend to append
#[test]
fn test_shapeForLayout_withTrailingNewline_shouldDropEmptyLine() {
    let area = label_area("こんにちは");
    let config = Config::default();

    let shaped = shape_for_layout("Hello\nWorld\n", &area, true, false, "en", &config).unwrap();
    assert_eq!(shaped.lines, vec!["Hello".to_string(), "World".to_string()]);
}

/// A line wider than the rectangle scales the height down proportionally
#[test]
fn test_shapeForLayout_withOverflowingLine_shouldScaleHeightDown() {
    let area = label_area("こんにちは");
    let config = Config::default();
    let long_line = "A very long translated line that cannot fit the narrow label";

    let shaped = shape_for_layout(long_line, &area, true, false, "en", &config).unwrap();
    assert!(shaped.pixel_height < area.average_text_height);
}

/// Dialog shaping clamps the fitted height to the area average
#[test]
fn test_shapeForLayout_withDialog_shouldClampToAverageHeight() {
    let mut area = label_area("こんにちは");
    area.is_dialog = true;
    let config = Config::default();

    let shaped = shape_for_layout("Hi", &area, true, true, "en", &config).unwrap();
    assert!(shaped.pixel_height <= area.average_text_height);
}
