/*!
 * Translation session coordinator and pipeline wiring.
 *
 * A `TranslationSession` is created when a text area appears and dropped
 * when it goes away. It owns one translation flow and one audio flow, both
 * driven by the host calling `update()` every tick; neither call blocks.
 * Completed translations run through the fitting engine; completed audio is
 * registered with the process-wide arbiter and played.
 *
 * `TranslationPipeline` holds the collaborators shared by every session
 * (config, transport, measurer, audio sink, arbiter, notifier) and stamps
 * out sessions wired to them.
 */

use log::{debug, error, info, warn};
use std::sync::Arc;

use crate::app_config::Config;
use crate::audio::{AudioArbiter, AudioHandle, AudioSink, NullAudioSink, store_decoded_audio};
use crate::errors::{SessionError, SpeechError};
use crate::fitting::{
    HeuristicMeasurer, TextMeasurer, layout_line_by_line, shape_for_layout, word_wrap_to_rect,
};
use crate::language_utils::language_codes_match;
use crate::providers::{ProviderAdapter, TranslationInput, adapter_for_engine};
use crate::speech::SpeechSynthesisAdapter;
use crate::status::{LogNotifier, StatusNotifier};
use crate::text_area::TextArea;
use crate::trace::DiagnosticsSink;
use crate::transport::{HttpTransport, PendingExchange, Transport};
use crate::voice::resolve_voice;

use super::flow::{ExchangeFlow, FlowState};
use super::models::{SessionEvent, TranslatedLayout};

/// Shared collaborators for creating translation sessions
pub struct TranslationPipeline {
    config: Arc<Config>,
    transport: Arc<dyn Transport>,
    measurer: Arc<dyn TextMeasurer>,
    sink: Arc<dyn AudioSink>,
    arbiter: Arc<AudioArbiter>,
    notifier: Arc<dyn StatusNotifier>,
}

impl TranslationPipeline {
    /// Create a pipeline with the default HTTP transport, heuristic
    /// measurer, silent audio sink and log-backed notifier
    pub fn new(config: Config) -> Self {
        let transport = Arc::new(HttpTransport::new(config.timeout_secs));
        Self {
            config: Arc::new(config),
            transport,
            measurer: Arc::new(HeuristicMeasurer),
            sink: Arc::new(NullAudioSink::default()),
            arbiter: Arc::new(AudioArbiter::new()),
            notifier: Arc::new(LogNotifier),
        }
    }

    /// Replace the transport collaborator
    pub fn with_transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = transport;
        self
    }

    /// Replace the text measurer
    pub fn with_measurer(mut self, measurer: Arc<dyn TextMeasurer>) -> Self {
        self.measurer = measurer;
        self
    }

    /// Replace the audio sink
    pub fn with_sink(mut self, sink: Arc<dyn AudioSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Replace the status notifier
    pub fn with_notifier(mut self, notifier: Arc<dyn StatusNotifier>) -> Self {
        self.notifier = notifier;
        self
    }

    /// The shared audio arbiter
    pub fn arbiter(&self) -> Arc<AudioArbiter> {
        Arc::clone(&self.arbiter)
    }

    /// The active configuration
    pub fn config(&self) -> Arc<Config> {
        Arc::clone(&self.config)
    }

    /// Swap the configuration, e.g. after a target-language change
    ///
    /// Existing sessions keep their old config until told to re-request via
    /// [`TranslationSession::on_target_language_changed`].
    pub fn set_config(&mut self, config: Config) {
        self.config = Arc::new(config);
    }

    /// Create a session for a newly appeared text area
    ///
    /// Requests a translation immediately unless the area already matches
    /// the target language (or translation is disabled).
    pub fn create_session(&self, area: TextArea) -> TranslationSession {
        let mut session = TranslationSession::new(
            area,
            Arc::clone(&self.config),
            Arc::clone(&self.transport),
            Arc::clone(&self.measurer),
            Arc::clone(&self.sink),
            Arc::clone(&self.arbiter),
            Arc::clone(&self.notifier),
        );
        session.request_translation_on_init();
        session.request_audio_on_init();
        session
    }
}

/// Per-text-area coordinator for one translation flow and one audio flow
pub struct TranslationSession {
    area: TextArea,
    config: Arc<Config>,
    adapter: Box<dyn ProviderAdapter>,
    tts: SpeechSynthesisAdapter,
    transport: Arc<dyn Transport>,
    measurer: Arc<dyn TextMeasurer>,
    sink: Arc<dyn AudioSink>,
    arbiter: Arc<AudioArbiter>,
    notifier: Arc<dyn StatusNotifier>,
    diagnostics: DiagnosticsSink,

    translation_flow: ExchangeFlow,
    audio_flow: ExchangeFlow,

    /// Completed translation with its layout, if any
    translated: Option<TranslatedLayout>,
    /// Handle of the clip this session last registered, if any
    audio_handle: Option<AudioHandle>,
    /// Regioned code of the last TTS request, echoed in error messages
    last_tts_language: String,
}

impl TranslationSession {
    #[allow(clippy::too_many_arguments)]
    fn new(
        area: TextArea,
        config: Arc<Config>,
        transport: Arc<dyn Transport>,
        measurer: Arc<dyn TextMeasurer>,
        sink: Arc<dyn AudioSink>,
        arbiter: Arc<AudioArbiter>,
        notifier: Arc<dyn StatusNotifier>,
    ) -> Self {
        let adapter = adapter_for_engine(&config);
        let tts = SpeechSynthesisAdapter::new(config.google_api_key.clone());
        let diagnostics = DiagnosticsSink::new(config.debug_dumps);
        Self {
            area,
            config,
            adapter,
            tts,
            transport,
            measurer,
            sink,
            arbiter,
            notifier,
            diagnostics,
            translation_flow: ExchangeFlow::new(),
            audio_flow: ExchangeFlow::new(),
            translated: None,
            audio_handle: None,
            last_tts_language: String::new(),
        }
    }

    /// The area this session was created for
    pub fn area(&self) -> &TextArea {
        &self.area
    }

    /// State of the translation flow
    pub fn translation_state(&self) -> FlowState {
        self.translation_flow.state()
    }

    /// State of the audio flow
    pub fn audio_state(&self) -> FlowState {
        self.audio_flow.state()
    }

    /// Whether no translation exchange is pending
    pub fn finished_with_translation(&self) -> bool {
        !self.translation_flow.is_requested()
    }

    /// Whether an audio exchange is waiting on the transport
    pub fn is_downloading_audio(&self) -> bool {
        self.audio_flow.is_requested()
    }

    /// Whether audio is downloading, or this session's clip is audible
    pub fn is_still_playing_or_planning_to_play(&self) -> bool {
        if self.audio_flow.is_requested() {
            return true;
        }
        self.audio_handle.is_some_and(|h| self.sink.is_playing(h))
    }

    /// The completed translation and its layout, if any
    pub fn translated_layout(&self) -> Option<&TranslatedLayout> {
        self.translated.as_ref()
    }

    /// Text a copy action should use: the translation when one happened,
    /// otherwise the captured source text
    pub fn text_for_copy(&self) -> &str {
        match &self.translated {
            Some(layout) => &layout.text,
            None => &self.area.raw_text,
        }
    }

    /// Effective dialog flag for this area under the current hinting
    fn is_dialog(&self) -> bool {
        self.config.text_hinting.is_dialog(&self.area)
    }

    /// Translation payload per layout mode: raw dialog text, or lines
    /// joined with `\n`
    fn text_to_translate(&self) -> String {
        if self.is_dialog() {
            self.area.raw_text.clone()
        } else {
            self.area.joined_lines()
        }
    }

    fn request_translation_on_init(&mut self) {
        if let Err(e) = self.request_translation() {
            // Missing credentials and the like; already shown to the user
            debug!("Initial translation request not started: {}", e);
        }
    }

    /// Dialog areas speak automatically when configured to
    fn request_audio_on_init(&mut self) {
        if !self.config.autoplay_audio || !self.is_dialog() {
            return;
        }
        if let Err(e) = self.request_audio(true, false) {
            debug!("Autoplay audio request not started: {}", e);
        }
    }

    /// Start a translation exchange
    ///
    /// Stays idle when translation is disabled or the area already matches
    /// the target language. Callers must check `translation_state()` first;
    /// a second request while one is in flight is refused.
    pub fn request_translation(&mut self) -> Result<(), SessionError> {
        let Some(target) = self.config.target_language.clone() else {
            return Ok(());
        };
        if target.is_empty() || language_codes_match(&self.area.language, &target) {
            // Nothing to do, languages are the same
            return Ok(());
        }
        if self.translation_flow.is_requested() {
            return Err(SessionError::ExchangeInFlight);
        }

        let input = TranslationInput {
            text: self.text_to_translate(),
            source_language: self.area.language.clone(),
            target_language: target,
        };

        let request = match self.adapter.build(&input) {
            Ok(request) => request,
            Err(e) => {
                self.notifier.quick_message(&e.to_string());
                return Err(e.into());
            }
        };

        self.diagnostics.dump("translation_request", &request.body_bytes());
        info!(
            "Requesting {} translation of {} chars",
            self.adapter.name(),
            input.text.chars().count()
        );

        self.translation_flow
            .begin(PendingExchange::start(Arc::clone(&self.transport), request))
    }

    /// Re-request after the target language changed; drops the old layout
    pub fn on_target_language_changed(&mut self, config: Arc<Config>) {
        self.config = config;
        self.adapter = adapter_for_engine(&self.config);
        self.tts = SpeechSynthesisAdapter::new(self.config.google_api_key.clone());
        self.translated = None;
        self.translation_flow.abandon();
        if let Err(e) = self.request_translation() {
            debug!("Re-request after language change not started: {}", e);
        }
    }

    /// Start (or toggle off) an audio exchange
    ///
    /// When this session's clip is already audible the call stops it
    /// instead. `use_source_language` picks the side to speak; the config's
    /// `audio_prefers_source` flag inverts it when false. Callers must check
    /// `audio_state()` first; a second request while one is in flight is
    /// refused.
    pub fn request_audio(
        &mut self,
        use_source_language: bool,
        show_message: bool,
    ) -> Result<(), SessionError> {
        let use_source = if self.config.audio_prefers_source {
            use_source_language
        } else {
            !use_source_language
        };

        if let Some(handle) = self.audio_handle {
            if self.sink.is_playing(handle) {
                self.stop_audio_if_playing();
                return Ok(());
            }
        }
        if self.audio_flow.is_requested() {
            return Err(SessionError::ExchangeInFlight);
        }

        let (language, text) = match (&self.translated, use_source) {
            (Some(layout), false) => (
                self.config.target_language.clone().unwrap_or_default(),
                layout.text.clone(),
            ),
            _ => (self.area.language.clone(), self.text_to_translate()),
        };

        let voice = resolve_voice(&language);
        self.last_tts_language = voice.language_code.clone();

        if show_message {
            if voice.guessed {
                self.notifier.quick_message(&format!(
                    "Not sure of language, trying {}",
                    voice.language_code
                ));
            } else {
                self.notifier
                    .quick_message(&format!("Reading as {}", voice.language_code));
            }
        }

        let request = match self.tts.build(&voice, &text) {
            Ok(request) => request,
            Err(e) => {
                self.notifier.quick_message(&e.to_string());
                return Err(e.into());
            }
        };

        self.diagnostics.dump("tts_request", &request.body_bytes());
        self.audio_flow
            .begin(PendingExchange::start(Arc::clone(&self.transport), request))
    }

    /// Stop this session's clip if it is the registered one
    pub fn stop_audio_if_playing(&mut self) {
        if let Some(handle) = self.audio_handle.take() {
            self.arbiter.release(handle, self.sink.as_ref());
        }
    }

    /// Drive both flows forward; never blocks
    ///
    /// Call once per host tick. Returns the events produced this tick; both
    /// flows settle back to idle after completion, success or failure. No
    /// automatic retry happens on failure.
    pub fn update(&mut self) -> Vec<SessionEvent> {
        let mut events = Vec::new();

        if let Some(result) = self.translation_flow.poll() {
            match result {
                Ok(bytes) => {
                    self.diagnostics.dump("translation_reply", &bytes);
                    match self.apply_translation(&bytes) {
                        Ok(text) => {
                            self.translation_flow.settle();
                            events.push(SessionEvent::TranslationSucceeded { text });
                        }
                        Err(e) => {
                            let message = e.to_string();
                            error!(
                                "Error handling {} translation reply: {}",
                                self.adapter.name(),
                                message
                            );
                            self.notifier.quick_message(&message);
                            self.translation_flow.settle_failed();
                            events.push(SessionEvent::TranslationFailed { message });
                        }
                    }
                }
                Err(e) => {
                    let message = e.to_string();
                    error!("Translation transport error: {}", message);
                    self.notifier.quick_message(&message);
                    self.translation_flow.settle();
                    events.push(SessionEvent::TranslationFailed { message });
                }
            }
        }

        if let Some(result) = self.audio_flow.poll() {
            match result {
                Ok(bytes) => {
                    self.diagnostics.dump("tts_reply", &bytes);
                    match self.apply_audio(&bytes) {
                        Ok(()) => {
                            self.audio_flow.settle();
                            events.push(SessionEvent::AudioStarted);
                        }
                        Err(e) => {
                            let message = e.to_string();
                            warn!("Error handling TTS reply: {}", message);
                            self.notifier.status(&message);
                            self.audio_flow.settle_failed();
                            events.push(SessionEvent::AudioFailed { message });
                        }
                    }
                }
                Err(e) => {
                    let message = e.to_string();
                    error!("Audio transport error: {}", message);
                    self.notifier.quick_message(&message);
                    self.audio_flow.settle();
                    events.push(SessionEvent::AudioFailed { message });
                }
            }
        }

        events
    }

    /// Parse a translation reply and lay it out for rendering
    fn apply_translation(&mut self, raw: &[u8]) -> Result<String, SessionError> {
        let text = match self.adapter.parse(raw) {
            Ok(text) => text,
            Err(e) => {
                if let Some(bytes) = e.raw_bytes() {
                    self.diagnostics.dump("translation_error", bytes);
                }
                return Err(e.into());
            }
        };

        let dialog = self.is_dialog();
        let target = self.config.target_language.clone().unwrap_or_default();
        let shaped = shape_for_layout(&text, &self.area, true, dialog, &target, &self.config)?;

        let fit = if dialog {
            word_wrap_to_rect(
                &text,
                &self.area.rect,
                Some(shaped.pixel_height),
                self.area.average_text_height,
                shaped.width_mod,
                self.measurer.as_ref(),
            )?
        } else {
            layout_line_by_line(&shaped)
        };

        self.translated = Some(TranslatedLayout {
            text: text.clone(),
            fit,
            padded_rect: shaped.padded_rect,
        });

        Ok(text)
    }

    /// Decode a TTS reply, store it and register it with the arbiter
    fn apply_audio(&mut self, raw: &[u8]) -> Result<(), SessionError> {
        let audio = match self.tts.parse(raw, &self.last_tts_language) {
            Ok(audio) => audio,
            Err(e) => {
                if let SpeechError::Provider(provider_error) = &e {
                    if let Some(bytes) = provider_error.raw_bytes() {
                        self.diagnostics.dump("tts_error", bytes);
                    }
                }
                return Err(e.into());
            }
        };

        let file = store_decoded_audio(&audio).map_err(SessionError::Speech)?;
        let handle = self.arbiter.acquire(file, self.sink.as_ref());
        self.audio_handle = Some(handle);
        debug!("Registered audio clip {:?} ({} bytes)", handle, audio.len());
        Ok(())
    }
}
