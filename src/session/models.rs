/*!
 * Data models for translation sessions.
 */

use crate::fitting::FitResult;
use crate::geometry::Rectf;

/// A completed translation laid out for rendering
#[derive(Debug, Clone)]
pub struct TranslatedLayout {
    /// The translated text as returned by the provider
    pub text: String,
    /// Fitting result: chosen height, wrapped lines, wrapped size
    pub fit: FitResult,
    /// Target rectangle after the fixed padding expansion
    pub padded_rect: Rectf,
}

/// Events produced by a session tick
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    /// A translation exchange completed and was laid out
    TranslationSucceeded {
        /// The translated text
        text: String,
    },
    /// A translation exchange failed; the session is back to idle
    TranslationFailed {
        /// Short user-facing description
        message: String,
    },
    /// Synthesized audio was registered and started playing
    AudioStarted,
    /// An audio exchange failed; the session is back to idle
    AudioFailed {
        /// Short user-facing description
        message: String,
    },
}
