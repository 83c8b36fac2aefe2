use isolang::Language;

/// Language utilities for the translation pipeline
///
/// Helpers for comparing detected language codes, mapping codes to display
/// names for prompts and messages, and spotting wide-glyph scripts that need
/// a different width ratio during fitting.
/// Languages whose glyphs are roughly square; fitting treats these as
/// width ratio 1.0 unless an explicit font override is configured.
const ASIAN_SCRIPT_CODES: [&str; 6] = ["ja", "ko", "zh", "zh-CN", "zh-TW", "cmn"];

/// Whether a language code denotes a wide-glyph Asian script
pub fn is_asian_language(code: &str) -> bool {
    ASIAN_SCRIPT_CODES.iter().any(|c| c.eq_ignore_ascii_case(code))
}

/// Whether two codes denote the same language, ignoring case and a region tag
pub fn language_codes_match(code1: &str, code2: &str) -> bool {
    let base = |c: &str| {
        c.trim()
            .split(['-', '_'])
            .next()
            .unwrap_or("")
            .to_lowercase()
    };
    let b1 = base(code1);
    let b2 = base(code2);
    !b1.is_empty() && b1 == b2
}

/// English display name for a language code, falling back to the code itself
pub fn language_display_name(code: &str) -> String {
    let base = code.trim().split(['-', '_']).next().unwrap_or(code);
    Language::from_639_1(&base.to_lowercase())
        .or_else(|| Language::from_639_3(&base.to_lowercase()))
        .map(|l| l.to_name().to_string())
        .unwrap_or_else(|| code.to_string())
}
