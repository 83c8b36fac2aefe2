use serde::{Deserialize, Serialize};

use crate::errors::ProviderError;
use crate::providers::{ProviderAdapter, RequestBody, TranslationInput, WireRequest};

/// Adapter for Google Cloud Translation v2, authenticated by API key
#[derive(Debug, Clone)]
pub struct GoogleBasic {
    /// API key appended to the query string
    api_key: String,
    /// Endpoint base URL
    endpoint: String,
}

/// Translation request payload
#[derive(Debug, Serialize)]
struct TranslateRequest<'a> {
    /// The text to translate
    q: &'a str,
    /// Target language code
    target: &'a str,
    /// Plain-text handling, keeps the backend from HTML-escaping the reply
    format: &'a str,
}

/// Top-level response payload
#[derive(Debug, Deserialize)]
struct TranslateResponse {
    /// Present on success
    data: Option<TranslateData>,
    /// Present when the backend rejected the request
    error: Option<ApiErrorBody>,
}

#[derive(Debug, Deserialize)]
struct TranslateData {
    translations: Vec<Translation>,
}

#[derive(Debug, Deserialize)]
struct Translation {
    #[serde(rename = "translatedText")]
    translated_text: String,
}

/// Error body shape shared by Google APIs
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    message: String,
}

impl GoogleBasic {
    /// Create a new adapter with the default public endpoint
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            endpoint: "https://translation.googleapis.com".to_string(),
        }
    }

    /// Override the endpoint base, used by tests
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }
}

impl ProviderAdapter for GoogleBasic {
    fn name(&self) -> &'static str {
        "Google"
    }

    fn build(&self, input: &TranslationInput) -> Result<WireRequest, ProviderError> {
        if self.api_key.is_empty() {
            return Err(ProviderError::MissingCredential(
                "Google API key".to_string(),
            ));
        }

        let payload = TranslateRequest {
            q: &input.text,
            target: &input.target_language,
            format: "text",
        };

        Ok(WireRequest {
            url: format!(
                "{}/language/translate/v2?key={}",
                self.endpoint.trim_end_matches('/'),
                self.api_key
            ),
            headers: Vec::new(),
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
                message: format!("Invalid JSON from Google: {}", e),
                raw: raw.to_vec(),
            })?;

        if let Some(error) = response.error {
            return Err(ProviderError::Api {
                message: error.message,
                raw: raw.to_vec(),
            });
        }

        response
            .data
            .and_then(|d| d.translations.into_iter().next())
            .map(|t| t.translated_text)
            .ok_or_else(|| ProviderError::MalformedResponse {
                message: "Missing data.translations in Google reply".to_string(),
                raw: raw.to_vec(),
            })
    }
}
