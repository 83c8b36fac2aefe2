/*!
 * # textlens
 *
 * A Rust library for translating captured on-screen text regions and
 * speaking them aloud, fitting the results back into their original
 * rectangles.
 *
 * ## Features
 *
 * - Translate text areas using interchangeable backends:
 *   - Google Cloud Translation v2 (API key)
 *   - Google Cloud Translation v3 (bearer auth)
 *   - DeepL
 *   - OpenAI chat completions
 * - Synthesize speech for either language side via Google Cloud TTS,
 *   with table-driven language/region/voice resolution
 * - Adaptive text fitting: shrink-to-fit character budgets for dialog
 *   text, per-line scaling for label-style text
 * - Tick-driven sessions: one translation flow and one audio flow per
 *   text area, polled cooperatively, never blocking
 * - Process-wide audio arbitration: one speaker at a time, across all
 *   sessions
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `text_area`: Captured text-region data model
 * - `providers`: Adapters for the translation backends
 * - `speech`: Speech synthesis adapter
 * - `voice`: Language to region/voice resolution tables
 * - `fitting`: Pixel-height selection and line wrapping
 * - `transport`: Async exchange execution behind a polling interface
 * - `session`: Per-area coordination of translation and audio flows
 * - `audio`: Playback seam and the single-speaker arbiter
 * - `errors`: Custom error types for the pipeline
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod audio;
pub mod errors;
pub mod fitting;
pub mod geometry;
pub mod language_utils;
pub mod providers;
pub mod session;
pub mod speech;
pub mod status;
pub mod text_area;
pub mod trace;
pub mod transport;
pub mod voice;

// Re-export main types for easier usage
pub use app_config::{Config, TranslationEngine};
pub use audio::{AudioArbiter, AudioHandle, AudioSink};
pub use errors::{AppError, FitError, ProviderError, SessionError, SpeechError};
pub use fitting::{FitResult, TextMeasurer};
pub use session::{SessionEvent, TranslationPipeline, TranslationSession};
pub use text_area::TextArea;
pub use voice::{VoiceSelection, resolve_voice};
