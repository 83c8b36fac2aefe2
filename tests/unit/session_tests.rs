use std::sync::Arc;

use textlens::app_config::{Config, TranslationEngine};
use textlens::session::{FlowState, SessionEvent, TranslationPipeline};

use crate::common::{
    CapturingNotifier, MockTransport, RecordingAudioSink, drive_until_events, japanese_area,
};

fn config_for_engine(engine: TranslationEngine) -> Config {
    Config {
        target_language: Some("en".to_string()),
        engine,
        google_api_key: "google-key".to_string(),
        google_token: "google-token".to_string(),
        google_project: "google-project".to_string(),
        deepl_api_key: "deepl-key".to_string(),
        gpt_api_key: "gpt-key".to_string(),
        ..Config::default()
    }
}

fn success_fixture(engine: TranslationEngine) -> &'static str {
    match engine {
        TranslationEngine::GoogleBasic => {
            r#"{"data":{"translations":[{"translatedText":"Hello"}]}}"#
        }
        TranslationEngine::GoogleAdvanced => {
            r#"{"translations":[{"translatedText":"Hello"}]}"#
        }
        TranslationEngine::DeepL => r#"{"translations":[{"text":"Hello"}]}"#,
        TranslationEngine::Gpt => {
            r#"{"choices":[{"message":{"role":"assistant","content":"Hello"}}]}"#
        }
    }
}

#[tokio::test]
async fn test_update_withEachEngine_shouldSucceedAndReturnToIdle() {
    for engine in [
        TranslationEngine::GoogleBasic,
        TranslationEngine::GoogleAdvanced,
        TranslationEngine::DeepL,
        TranslationEngine::Gpt,
    ] {
        let transport = MockTransport::new();
        transport.push_response(success_fixture(engine).as_bytes());

        let pipeline =
            TranslationPipeline::new(config_for_engine(engine)).with_transport(transport);
        let mut session = pipeline.create_session(japanese_area());
        assert_eq!(session.translation_state(), FlowState::Requested);

        let events = drive_until_events(&mut session).await;
        assert!(
            matches!(
                events.as_slice(),
                [SessionEvent::TranslationSucceeded { text }] if text == "Hello"
            ),
            "unexpected events for {:?}: {:?}",
            engine,
            events
        );
        assert_eq!(session.translation_state(), FlowState::Idle);
        assert_eq!(session.text_for_copy(), "Hello");
        assert!(session.finished_with_translation());
    }
}

fn error_fixture(engine: TranslationEngine) -> &'static str {
    match engine {
        TranslationEngine::GoogleBasic => {
            r#"{"error":{"code":403,"message":"Daily limit exceeded"}}"#
        }
        TranslationEngine::GoogleAdvanced => r#"{"error":{"code":401}}"#,
        TranslationEngine::DeepL => r#"{"message":"Wrong endpoint"}"#,
        TranslationEngine::Gpt => r#"{"error":{"message":"invalid api key"}}"#,
    }
}

#[tokio::test]
async fn test_update_withEachEngineErrorFixture_shouldFailAndReturnToIdle() {
    for engine in [
        TranslationEngine::GoogleBasic,
        TranslationEngine::GoogleAdvanced,
        TranslationEngine::DeepL,
        TranslationEngine::Gpt,
    ] {
        let transport = MockTransport::new();
        transport.push_response(error_fixture(engine).as_bytes());

        let pipeline =
            TranslationPipeline::new(config_for_engine(engine)).with_transport(transport);
        let mut session = pipeline.create_session(japanese_area());

        let events = drive_until_events(&mut session).await;
        assert!(
            matches!(events.as_slice(), [SessionEvent::TranslationFailed { .. }]),
            "unexpected events for {:?}: {:?}",
            engine,
            events
        );
        assert_eq!(session.translation_state(), FlowState::Idle);
        assert!(session.translated_layout().is_none());
    }
}

#[tokio::test]
async fn test_update_withTransportError_shouldFailAndReturnToIdle() {
    let transport = MockTransport::new();
    transport.push_error("connection refused");

    let notifier = CapturingNotifier::new();
    let pipeline = TranslationPipeline::new(config_for_engine(TranslationEngine::GoogleBasic))
        .with_transport(transport)
        .with_notifier(notifier.clone());
    let mut session = pipeline.create_session(japanese_area());

    let events = drive_until_events(&mut session).await;
    assert!(matches!(
        events.as_slice(),
        [SessionEvent::TranslationFailed { .. }]
    ));
    assert_eq!(session.translation_state(), FlowState::Idle);
    assert!(session.translated_layout().is_none());
    assert!(!notifier.messages().is_empty());
}

#[tokio::test]
async fn test_update_withApiErrorBody_shouldFailAndKeepSourceText() {
    let transport = MockTransport::new();
    transport.push_response(
        r#"{"error":{"code":403,"message":"The request is missing a valid API key."}}"#
            .as_bytes(),
    );

    let pipeline = TranslationPipeline::new(config_for_engine(TranslationEngine::GoogleBasic))
        .with_transport(transport);
    let mut session = pipeline.create_session(japanese_area());

    let events = drive_until_events(&mut session).await;
    assert!(matches!(
        events.as_slice(),
        [SessionEvent::TranslationFailed { .. }]
    ));
    assert_eq!(session.text_for_copy(), "こんにちは");
}

#[tokio::test]
async fn test_update_withTinyDeepLBody_shouldFailAsBlankReply() {
    let transport = MockTransport::new();
    transport.push_response(b"abc".to_vec());

    let pipeline = TranslationPipeline::new(config_for_engine(TranslationEngine::DeepL))
        .with_transport(transport);
    let mut session = pipeline.create_session(japanese_area());

    let events = drive_until_events(&mut session).await;
    match events.as_slice() {
        [SessionEvent::TranslationFailed { message }] => {
            assert!(message.contains("blank"), "message was: {}", message);
        }
        other => panic!("unexpected events: {:?}", other),
    }
    assert_eq!(session.translation_state(), FlowState::Idle);
}

#[tokio::test]
async fn test_requestTranslation_afterSettling_shouldBeAcceptedAgain() {
    let transport = MockTransport::new();
    transport.push_response(success_fixture(TranslationEngine::GoogleBasic).as_bytes());
    transport.push_response(success_fixture(TranslationEngine::GoogleBasic).as_bytes());

    let pipeline = TranslationPipeline::new(config_for_engine(TranslationEngine::GoogleBasic))
        .with_transport(transport);
    let mut session = pipeline.create_session(japanese_area());

    drive_until_events(&mut session).await;
    assert_eq!(session.translation_state(), FlowState::Idle);

    assert!(session.request_translation().is_ok());
    assert_eq!(session.translation_state(), FlowState::Requested);
}

#[tokio::test]
async fn test_onTargetLanguageChanged_shouldDropLayoutAndReRequest() {
    let transport = MockTransport::new();
    transport.push_response(success_fixture(TranslationEngine::GoogleBasic).as_bytes());
    transport.push_response(r#"{"data":{"translations":[{"translatedText":"Hallo"}]}}"#.as_bytes());

    let pipeline = TranslationPipeline::new(config_for_engine(TranslationEngine::GoogleBasic))
        .with_transport(transport.clone());
    let mut session = pipeline.create_session(japanese_area());
    drive_until_events(&mut session).await;
    assert_eq!(session.text_for_copy(), "Hello");

    let new_config = Config {
        target_language: Some("de".to_string()),
        ..config_for_engine(TranslationEngine::GoogleBasic)
    };
    session.on_target_language_changed(Arc::new(new_config));
    assert!(session.translated_layout().is_none());
    assert_eq!(session.translation_state(), FlowState::Requested);

    let events = drive_until_events(&mut session).await;
    assert!(matches!(
        events.as_slice(),
        [SessionEvent::TranslationSucceeded { text }] if text == "Hallo"
    ));
    assert_eq!(session.text_for_copy(), "Hallo");
}

#[tokio::test]
async fn test_requestAudio_withSynthesizedClip_shouldPlayThroughSink() {
    let transport = MockTransport::new();
    transport.push_response(r#"{"audioContent":"aGVsbG8="}"#.as_bytes());

    let sink = RecordingAudioSink::new();
    let pipeline = TranslationPipeline::new(Config {
        target_language: None,
        google_api_key: "google-key".to_string(),
        ..Config::default()
    })
    .with_transport(transport)
    .with_sink(sink.clone());
    let mut session = pipeline.create_session(japanese_area());

    session
        .request_audio(true, false)
        .unwrap_or_else(|e| panic!("audio request refused: {}", e));
    assert_eq!(session.audio_state(), FlowState::Requested);
    assert!(session.is_downloading_audio());

    let events = drive_until_events(&mut session).await;
    assert!(matches!(events.as_slice(), [SessionEvent::AudioStarted]));
    assert_eq!(session.audio_state(), FlowState::Idle);
    assert_eq!(sink.playing().len(), 1);
    assert!(session.is_still_playing_or_planning_to_play());
}

#[tokio::test]
async fn test_requestAudio_whileClipPlaying_shouldStopInstead() {
    let transport = MockTransport::new();
    transport.push_response(r#"{"audioContent":"aGVsbG8="}"#.as_bytes());

    let sink = RecordingAudioSink::new();
    let pipeline = TranslationPipeline::new(Config {
        target_language: None,
        google_api_key: "google-key".to_string(),
        ..Config::default()
    })
    .with_transport(transport)
    .with_sink(sink.clone());
    let mut session = pipeline.create_session(japanese_area());

    session
        .request_audio(true, false)
        .unwrap_or_else(|e| panic!("audio request refused: {}", e));
    drive_until_events(&mut session).await;
    assert_eq!(sink.playing().len(), 1);

    // Second press is a toggle while the clip is audible
    session
        .request_audio(true, false)
        .unwrap_or_else(|e| panic!("toggle refused: {}", e));
    assert!(sink.playing().is_empty());
    assert_eq!(sink.stopped().len(), 1);
    assert!(!session.is_still_playing_or_planning_to_play());
}

#[tokio::test]
async fn test_createSession_withAutoplayDialogArea_shouldRequestAudio() {
    let transport = MockTransport::new();
    transport.push_response(r#"{"audioContent":"aGVsbG8="}"#.as_bytes());

    let pipeline = TranslationPipeline::new(Config {
        target_language: None,
        google_api_key: "google-key".to_string(),
        autoplay_audio: true,
        ..Config::default()
    })
    .with_transport(transport);

    let mut area = japanese_area();
    area.is_dialog = true;
    let session = pipeline.create_session(area);
    assert_eq!(session.audio_state(), FlowState::Requested);

    // Non-dialog areas stay quiet even with autoplay enabled
    let quiet = TranslationPipeline::new(Config {
        target_language: None,
        autoplay_audio: true,
        ..Config::default()
    })
    .create_session(japanese_area());
    assert_eq!(quiet.audio_state(), FlowState::Idle);
}

#[tokio::test]
async fn test_requestAudio_withUnsupportedLanguage_shouldFailWithStatus() {
    let transport = MockTransport::new();
    transport.push_response(
        r#"{"error":{"code":400,"message":"Unsupported language"}}"#.as_bytes(),
    );

    let notifier = CapturingNotifier::new();
    let pipeline = TranslationPipeline::new(Config {
        target_language: None,
        google_api_key: "google-key".to_string(),
        ..Config::default()
    })
    .with_transport(transport)
    .with_notifier(notifier.clone());
    let mut session = pipeline.create_session(japanese_area());

    session
        .request_audio(true, false)
        .unwrap_or_else(|e| panic!("audio request refused: {}", e));
    let events = drive_until_events(&mut session).await;
    assert!(matches!(events.as_slice(), [SessionEvent::AudioFailed { .. }]));
    assert_eq!(session.audio_state(), FlowState::Idle);
    assert!(
        notifier
            .messages()
            .iter()
            .any(|m| m.contains("ja-JP")),
        "messages: {:?}",
        notifier.messages()
    );
}
