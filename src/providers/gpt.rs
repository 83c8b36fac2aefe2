use serde::{Deserialize, Serialize};

use crate::errors::ProviderError;
use crate::language_utils::language_display_name;
use crate::providers::{
    MIN_PLAUSIBLE_REPLY_BYTES, ProviderAdapter, RequestBody, TranslationInput, WireRequest,
};

/// Fixed model id for translation requests
const MODEL: &str = "gpt-4o-mini-2024-07-18";

/// Adapter for OpenAI chat completions used as a translation backend
#[derive(Debug, Clone)]
pub struct Gpt {
    /// API key sent as a bearer token
    api_key: String,
    /// Endpoint base URL
    endpoint: String,
}

/// Chat completion request payload
#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    /// The model to use
    model: &'a str,
    /// Number of completions
    n: u32,
    /// Conversation messages; a single user message carrying the instruction
    messages: Vec<ChatMessage>,
    /// Temperature for generation
    temperature: f32,
    /// Maximum number of tokens to generate
    max_tokens: u32,
    /// Top probability mass to consider (nucleus sampling)
    top_p: f32,
    /// Frequency penalty
    frequency_penalty: f32,
    /// Presence penalty
    presence_penalty: f32,
    /// Plain text responses
    response_format: ResponseFormat,
}

/// Chat message format
#[derive(Debug, Serialize, Deserialize)]
struct ChatMessage {
    /// Role of the message sender (user, assistant)
    role: String,
    /// Content of the message
    content: String,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    format_type: String,
}

/// Chat completion response; fields are looked up by name, never by position
#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Option<Vec<ChatChoice>>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

impl Gpt {
    /// Create a new adapter with the default public endpoint
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            endpoint: "https://api.openai.com".to_string(),
        }
    }

    /// Override the endpoint base, used by tests
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// The instruction prefix put in front of the text to translate
    fn instruction(target_language: &str) -> String {
        format!(
            "Translate the following texts to {}. Only respond with the translated texts.\n\n",
            language_display_name(target_language)
        )
    }
}

impl ProviderAdapter for Gpt {
    fn name(&self) -> &'static str {
        "GPT"
    }

    fn build(&self, input: &TranslationInput) -> Result<WireRequest, ProviderError> {
        if self.api_key.is_empty() {
            return Err(ProviderError::MissingCredential("OpenAI API key".to_string()));
        }

        let content = format!(
            "{}{}",
            Self::instruction(&input.target_language),
            input.text
        );

        let payload = ChatRequest {
            model: MODEL,
            n: 1,
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content,
            }],
            temperature: 1.0,
            max_tokens: 256,
            top_p: 1.0,
            frequency_penalty: 0.0,
            presence_penalty: 0.0,
            response_format: ResponseFormat {
                format_type: "text".to_string(),
            },
        };

        Ok(WireRequest {
            url: format!(
                "{}/v1/chat/completions",
                self.endpoint.trim_end_matches('/')
            ),
            headers: vec![
                (
                    "Authorization".to_string(),
                    format!("Bearer {}", self.api_key),
                ),
                (
                    "Accept".to_string(),
                    "application/json, text/plain".to_string(),
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
        if raw.len() < MIN_PLAUSIBLE_REPLY_BYTES {
            return Err(ProviderError::BlankReply);
        }

        let response: ChatResponse =
            serde_json::from_slice(raw).map_err(|e| ProviderError::MalformedResponse {
                message: format!("Invalid JSON from OpenAI: {}", e),
                raw: raw.to_vec(),
            })?;

        response
            .choices
            .and_then(|c| c.into_iter().next())
            .map(|c| c.message.content)
            .ok_or_else(|| ProviderError::MalformedResponse {
                message: "Missing choices[0].message.content in OpenAI reply".to_string(),
                raw: raw.to_vec(),
            })
    }
}
