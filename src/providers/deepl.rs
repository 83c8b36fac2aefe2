use serde::Deserialize;

use crate::errors::ProviderError;
use crate::providers::{
    MIN_PLAUSIBLE_REPLY_BYTES, ProviderAdapter, RequestBody, TranslationInput, WireRequest,
};

/// Adapter for the DeepL v2 form API
#[derive(Debug, Clone)]
pub struct DeepL {
    /// API key sent as the `auth_key` form field
    api_key: String,
    /// Endpoint base, differs between the free and pro tiers
    endpoint: String,
}

/// Top-level response payload
#[derive(Debug, Deserialize)]
struct TranslateResponse {
    /// Present on success
    translations: Option<Vec<Translation>>,
    /// DeepL signals errors with a bare `message` field
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Translation {
    text: String,
}

impl DeepL {
    /// Create a new adapter against the given endpoint base
    pub fn new(api_key: impl Into<String>, endpoint: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            endpoint: endpoint.into(),
        }
    }
}

impl ProviderAdapter for DeepL {
    fn name(&self) -> &'static str {
        "DeepL"
    }

    fn build(&self, input: &TranslationInput) -> Result<WireRequest, ProviderError> {
        // Checked up front so the failure is reported without a network call
        if self.api_key.is_empty() {
            return Err(ProviderError::MissingCredential("DeepL API key".to_string()));
        }

        Ok(WireRequest {
            url: format!("{}/v2/translate", self.endpoint.trim_end_matches('/')),
            headers: Vec::new(),
            body: RequestBody::Form(vec![
                ("auth_key".to_string(), self.api_key.clone()),
                ("text".to_string(), input.text.clone()),
                (
                    "target_lang".to_string(),
                    input.target_language.to_uppercase(),
                ),
            ]),
        })
    }

    fn parse(&self, raw: &[u8]) -> Result<String, ProviderError> {
        if raw.len() < MIN_PLAUSIBLE_REPLY_BYTES {
            return Err(ProviderError::BlankReply);
        }

        let response: TranslateResponse =
            serde_json::from_slice(raw).map_err(|e| ProviderError::MalformedResponse {
                message: format!("Invalid JSON from DeepL: {}", e),
                raw: raw.to_vec(),
            })?;

        if let Some(message) = response.message {
            return Err(ProviderError::Api {
                message: format!("DeepL says: {}", message),
                raw: raw.to_vec(),
            });
        }

        response
            .translations
            .and_then(|t| t.into_iter().next())
            .map(|t| t.text)
            .ok_or_else(|| ProviderError::MalformedResponse {
                message: "Missing translations in DeepL reply".to_string(),
                raw: raw.to_vec(),
            })
    }
}
