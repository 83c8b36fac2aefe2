/*!
 * Per-text-area translation sessions.
 *
 * This module handles:
 * - The two per-session exchange state machines (translation, audio)
 * - Driving exchanges to completion on external ticks
 * - Feeding results into the fitting engine and the audio arbiter
 * - Wiring shared collaborators through `TranslationPipeline`
 */

pub use self::flow::{ExchangeFlow, FlowState};
pub use self::manager::{TranslationPipeline, TranslationSession};
pub use self::models::{SessionEvent, TranslatedLayout};

pub mod flow;
pub mod manager;
pub mod models;
