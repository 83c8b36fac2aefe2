/*!
 * Language to TTS region/voice resolution.
 *
 * The speech backend wants a regioned language code (`ja-JP`) and a concrete
 * voice name (`ja-JP-Wavenet-B`), but captured text areas only carry a bare
 * language code. The backend publishes no default region per language, so the
 * mapping lives in static lookup tables here, matching the published voice
 * list. See https://cloud.google.com/text-to-speech/docs/voices
 */

use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Default language assumed when the capture layer could not detect one
pub const FALLBACK_LANGUAGE: &str = "ja";

/// Region overrides for languages whose region is not the uppercased code
static REGION_OVERRIDES: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("en", "US"),
        ("ar", "XA"),
        ("da", "DK"),
        ("hi", "IN"),
        ("ja", "JP"),
        ("ko", "KR"),
        ("cmn", "CN"),
        ("nb", "NO"),
        ("el", "GR"),
        ("sm", "SA"),
    ])
});

/// Voice letter overrides where a non-default voice clearly sounds better
static VOICE_LETTER_OVERRIDES: Lazy<HashMap<&'static str, &'static str>> =
    Lazy::new(|| HashMap::from([("en-US", "F"), ("ja-JP", "B")]));

/// Legacy remaps for codes the backend has no direct entry for
static LANGUAGE_REMAPS: Lazy<HashMap<&'static str, &'static str>> =
    Lazy::new(|| HashMap::from([("zh", "cmn"), ("zh-CN", "cmn")]));

/// A fully resolved voice configuration for a TTS request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoiceSelection {
    /// The resolved base language code, after remaps and fallback
    pub language: String,
    /// Regioned language code, e.g. `en-US`
    pub language_code: String,
    /// Concrete voice name, e.g. `en-US-Wavenet-F`
    pub voice_name: String,
    /// SSML voice gender
    pub gender: String,
    /// True when the input code was empty and the fallback was used
    pub guessed: bool,
}

/// Resolve a bare language code into a region/voice configuration
pub fn resolve_voice(code: &str) -> VoiceSelection {
    let mut guessed = false;
    let mut language = code.trim().to_string();

    if language.is_empty() {
        guessed = true;
        language = FALLBACK_LANGUAGE.to_string();
    }

    if let Some(remapped) = LANGUAGE_REMAPS.get(language.as_str()) {
        language = (*remapped).to_string();
    }

    let region = REGION_OVERRIDES
        .get(language.as_str())
        .map(|r| (*r).to_string())
        .unwrap_or_else(|| language.to_uppercase());

    // WaveNet voices by default; Spanish only has solid Standard-tier voices
    let tier = if language == "es" { "Standard" } else { "Wavenet" };

    let language_code = format!("{}-{}", language, region);
    let letter = VOICE_LETTER_OVERRIDES
        .get(language_code.as_str())
        .copied()
        .unwrap_or("A");

    let voice_name = format!("{}-{}-{}", language_code, tier, letter);

    VoiceSelection {
        language,
        language_code,
        voice_name,
        gender: "FEMALE".to_string(),
        guessed,
    }
}
