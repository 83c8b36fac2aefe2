/*!
 * Speech synthesis adapter for the Google Cloud TTS backend.
 *
 * Builds a `text:synthesize` request from a resolved `VoiceSelection` and
 * decodes the base64 audio payload out of the response. Error payloads are
 * mapped onto `SpeechError`: the backend answers 400 for a language it has
 * no voices for, which gets its own user-facing message.
 */

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde::{Deserialize, Serialize};

use crate::errors::{ProviderError, SpeechError};
use crate::providers::{RequestBody, WireRequest};
use crate::voice::VoiceSelection;

/// Backend status code meaning the language has no voices
const STATUS_UNSUPPORTED_LANGUAGE: i64 = 400;

/// Adapter for the TTS backend
#[derive(Debug, Clone)]
pub struct SpeechSynthesisAdapter {
    /// API key appended to the query string
    api_key: String,
    /// Endpoint base URL
    endpoint: String,
}

/// Synthesis request payload
#[derive(Debug, Serialize)]
struct SynthesizeRequest<'a> {
    input: SynthesisInput<'a>,
    voice: VoiceParams<'a>,
    #[serde(rename = "audioConfig")]
    audio_config: AudioConfig<'a>,
}

#[derive(Debug, Serialize)]
struct SynthesisInput<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
struct VoiceParams<'a> {
    #[serde(rename = "languageCode")]
    language_code: &'a str,
    name: &'a str,
    #[serde(rename = "ssmlGender")]
    ssml_gender: &'a str,
}

#[derive(Debug, Serialize)]
struct AudioConfig<'a> {
    #[serde(rename = "audioEncoding")]
    audio_encoding: &'a str,
}

/// Synthesis response payload
#[derive(Debug, Deserialize)]
struct SynthesizeResponse {
    /// Base64-encoded audio on success
    #[serde(rename = "audioContent")]
    audio_content: Option<String>,
    /// Present when the backend rejected the request
    error: Option<ApiErrorBody>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    code: i64,
    #[serde(default)]
    message: String,
}

impl SpeechSynthesisAdapter {
    /// Create a new adapter with the default public endpoint
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            endpoint: "https://texttospeech.googleapis.com".to_string(),
        }
    }

    /// Override the endpoint base, used by tests
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Build the synthesis request for the given voice and text
    pub fn build(&self, voice: &VoiceSelection, text: &str) -> Result<WireRequest, SpeechError> {
        if self.api_key.is_empty() {
            return Err(SpeechError::Provider(ProviderError::MissingCredential(
                "Google API key".to_string(),
            )));
        }

        let payload = SynthesizeRequest {
            input: SynthesisInput { text },
            voice: VoiceParams {
                language_code: &voice.language_code,
                name: &voice.voice_name,
                ssml_gender: &voice.gender,
            },
            audio_config: AudioConfig {
                audio_encoding: "MP3",
            },
        };

        Ok(WireRequest {
            url: format!(
                "{}/v1/text:synthesize?key={}",
                self.endpoint.trim_end_matches('/'),
                self.api_key
            ),
            headers: Vec::new(),
            body: RequestBody::Json(serde_json::to_value(&payload).map_err(|e| {
                SpeechError::Provider(ProviderError::MalformedResponse {
                    message: format!("Failed to serialize request: {}", e),
                    raw: Vec::new(),
                })
            })?),
        })
    }

    /// Parse the response, returning the decoded audio bytes
    ///
    /// `language_code` is the regioned code the request was built with; it is
    /// echoed back in the unsupported-language message.
    pub fn parse(&self, raw: &[u8], language_code: &str) -> Result<Vec<u8>, SpeechError> {
        let response: SynthesizeResponse = serde_json::from_slice(raw).map_err(|e| {
            SpeechError::Provider(ProviderError::MalformedResponse {
                message: format!("Invalid JSON from TTS backend: {}", e),
                raw: raw.to_vec(),
            })
        })?;

        if let Some(error) = response.error {
            if error.code == STATUS_UNSUPPORTED_LANGUAGE {
                return Err(SpeechError::LanguageUnsupported {
                    language_code: language_code.to_string(),
                });
            }
            return Err(SpeechError::Provider(ProviderError::Api {
                message: error.message,
                raw: raw.to_vec(),
            }));
        }

        let encoded = response.audio_content.ok_or_else(|| {
            SpeechError::Provider(ProviderError::MalformedResponse {
                message: "Missing audioContent in TTS reply".to_string(),
                raw: raw.to_vec(),
            })
        })?;

        BASE64.decode(encoded.as_bytes()).map_err(|e| {
            SpeechError::Provider(ProviderError::MalformedResponse {
                message: format!("Invalid base64 audio payload: {}", e),
                raw: raw.to_vec(),
            })
        })
    }
}
