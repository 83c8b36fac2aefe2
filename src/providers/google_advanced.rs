use serde::{Deserialize, Serialize};

use crate::errors::ProviderError;
use crate::providers::{ProviderAdapter, RequestBody, TranslationInput, WireRequest};

/// Adapter for Google Cloud Translation v3, authenticated by bearer token
///
/// Unlike the basic variant, v3 is project-scoped: the project id goes both
/// into the URL and the `x-goog-user-project` header.
#[derive(Debug, Clone)]
pub struct GoogleAdvanced {
    /// OAuth bearer token
    token: String,
    /// Google Cloud project id
    project: String,
    /// Endpoint base URL
    endpoint: String,
}

/// Translation request payload
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TranslateRequest<'a> {
    /// Texts to translate; we always send exactly one
    contents: Vec<&'a str>,
    /// Source language code
    source_language_code: &'a str,
    /// Target language code
    target_language_code: &'a str,
    /// Plain-text handling
    mime_type: &'a str,
}

/// Top-level response payload; v3 puts translations at the root
#[derive(Debug, Deserialize)]
struct TranslateResponse {
    translations: Option<Vec<Translation>>,
}

#[derive(Debug, Deserialize)]
struct Translation {
    #[serde(rename = "translatedText")]
    translated_text: String,
}

impl GoogleAdvanced {
    /// Create a new adapter with the default public endpoint
    pub fn new(token: impl Into<String>, project: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            project: project.into(),
            endpoint: "https://translation.googleapis.com".to_string(),
        }
    }

    /// Override the endpoint base, used by tests
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }
}

impl ProviderAdapter for GoogleAdvanced {
    fn name(&self) -> &'static str {
        "Google Advanced"
    }

    fn build(&self, input: &TranslationInput) -> Result<WireRequest, ProviderError> {
        if self.token.is_empty() {
            return Err(ProviderError::MissingCredential(
                "Google bearer token".to_string(),
            ));
        }
        if self.project.is_empty() {
            return Err(ProviderError::MissingCredential(
                "Google project id".to_string(),
            ));
        }

        let payload = TranslateRequest {
            contents: vec![&input.text],
            source_language_code: &input.source_language,
            target_language_code: &input.target_language,
            mime_type: "text/plain",
        };

        Ok(WireRequest {
            url: format!(
                "{}/v3/projects/{}:translateText",
                self.endpoint.trim_end_matches('/'),
                self.project
            ),
            headers: vec![
                ("x-goog-user-project".to_string(), self.project.clone()),
                (
                    "Authorization".to_string(),
                    format!("Bearer {}", self.token),
                ),
            ],
            body: RequestBody::Json(serde_json::to_value(&payload).map_err(|e| {
                ProviderError::MalformedResponse {
                    message: format!("Failed to serialize request: {}", e),
                    raw: Vec::new(),
                }
            })?),
        })
    }

    fn parse(&self, raw: &[u8]) -> Result<String, ProviderError> {
        let response: TranslateResponse =
            serde_json::from_slice(raw).map_err(|e| ProviderError::MalformedResponse {
                message: format!("Invalid JSON from Google Advanced: {}", e),
                raw: raw.to_vec(),
            })?;

        response
            .translations
            .and_then(|t| t.into_iter().next())
            .map(|t| t.translated_text)
            .ok_or_else(|| ProviderError::MalformedResponse {
                message: "Missing translations in Google Advanced reply".to_string(),
                raw: raw.to_vec(),
            })
    }
}
