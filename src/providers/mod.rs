/*!
 * Provider adapters for the translation backends.
 *
 * This module contains one adapter per supported backend:
 * - Google Basic: Cloud Translation v2, API-key auth
 * - Google Advanced: Cloud Translation v3, bearer auth
 * - DeepL: v2 form API
 * - GPT: OpenAI chat completions
 *
 * An adapter is a pure request builder and response parser; it never touches
 * the network. The transport executes the `WireRequest` it builds and hands
 * the raw response bytes back to `parse`.
 */

use std::fmt::Debug;

use crate::app_config::{Config, TranslationEngine};
use crate::errors::ProviderError;

pub mod deepl;
pub mod google_advanced;
pub mod google_basic;
pub mod gpt;

/// Input to a translation request build
///
/// The text is already shaped by the caller: the raw dialog string in dialog
/// mode, or all lines joined with `\n` in line-by-line mode. Adapters never
/// decide that themselves.
#[derive(Debug, Clone)]
pub struct TranslationInput {
    /// The text to translate
    pub text: String,
    /// Detected source language code, may be empty
    pub source_language: String,
    /// Target language code
    pub target_language: String,
}

/// Body of a built provider request
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    /// JSON payload
    Json(serde_json::Value),
    /// URL-encoded form fields
    Form(Vec<(String, String)>),
}

/// A fully built provider request, ready for the transport to execute
#[derive(Debug, Clone)]
pub struct WireRequest {
    /// Full request URL including any query-string credentials
    pub url: String,
    /// Extra headers beyond the content type
    pub headers: Vec<(String, String)>,
    /// Request body
    pub body: RequestBody,
}

impl WireRequest {
    /// Request body serialized to bytes, for diagnostics and tests
    pub fn body_bytes(&self) -> Vec<u8> {
        match &self.body {
            RequestBody::Json(value) => value.to_string().into_bytes(),
            RequestBody::Form(fields) => {
                let mut serializer = url::form_urlencoded::Serializer::new(String::new());
                for (name, value) in fields {
                    serializer.append_pair(name, value);
                }
                serializer.finish().into_bytes()
            }
        }
    }
}

/// Common trait for all translation provider adapters
///
/// Implementations build a backend-specific `WireRequest` from a
/// `TranslationInput` and parse raw response bytes into the translated text
/// or a typed `ProviderError`. They are interchangeable from the session's
/// point of view.
pub trait ProviderAdapter: Send + Sync + Debug {
    /// Human-readable backend name for log and status messages
    fn name(&self) -> &'static str;

    /// Build the request for a translation exchange
    ///
    /// # Errors
    /// Returns `ProviderError::MissingCredential` when a required key is
    /// absent, before anything is sent.
    fn build(&self, input: &TranslationInput) -> Result<WireRequest, ProviderError>;

    /// Parse raw response bytes into the translated text
    fn parse(&self, raw: &[u8]) -> Result<String, ProviderError>;
}

/// Construct the adapter for the configured engine
pub fn adapter_for_engine(config: &Config) -> Box<dyn ProviderAdapter> {
    match config.engine {
        TranslationEngine::GoogleBasic => {
            Box::new(google_basic::GoogleBasic::new(config.google_api_key.clone()))
        }
        TranslationEngine::GoogleAdvanced => Box::new(google_advanced::GoogleAdvanced::new(
            config.google_token.clone(),
            config.google_project.clone(),
        )),
        TranslationEngine::DeepL => Box::new(deepl::DeepL::new(
            config.deepl_api_key.clone(),
            config.deepl_endpoint.clone(),
        )),
        TranslationEngine::Gpt => Box::new(gpt::Gpt::new(config.gpt_api_key.clone())),
    }
}

/// Minimum plausible response length; anything shorter is a blank reply
pub(crate) const MIN_PLAUSIBLE_REPLY_BYTES: usize = 5;
