/*!
 * Error types for the textlens pipeline.
 *
 * This module contains custom error types for different parts of the pipeline,
 * using the thiserror crate for ergonomic error definitions.
 */

use thiserror::Error;

/// Errors that can occur when building or parsing a provider exchange
#[derive(Error, Debug)]
pub enum ProviderError {
    /// A required credential was missing; detected before any network call
    #[error("Missing credential: {0}")]
    MissingCredential(String),

    /// The transport failed before a response payload was available
    #[error("Transport error: {0}")]
    Transport(String),

    /// Structured error payload returned by the backend
    #[error("Provider responded with error: {message}")]
    Api {
        /// Error message extracted from the payload
        message: String,
        /// Raw response bytes kept for diagnostics
        raw: Vec<u8>,
    },

    /// Response body too short to be a real reply, typically a bad API key
    #[error("Provider sent a blank reply, probably a bad API key")]
    BlankReply,

    /// Expected fields were missing or the payload was not valid JSON
    #[error("Malformed provider response: {message}")]
    MalformedResponse {
        /// Description of what was missing
        message: String,
        /// Raw response bytes kept for diagnostics
        raw: Vec<u8>,
    },
}

impl ProviderError {
    /// Raw diagnostic bytes carried by this error, if any
    pub fn raw_bytes(&self) -> Option<&[u8]> {
        match self {
            Self::Api { raw, .. } | Self::MalformedResponse { raw, .. } => Some(raw),
            _ => None,
        }
    }
}

/// Errors that can occur during speech synthesis
#[derive(Error, Debug)]
pub enum SpeechError {
    /// The backend rejected the language (TTS status 400)
    #[error("{language_code} unsupported for speech")]
    LanguageUnsupported {
        /// The regioned language code that was requested
        language_code: String,
    },

    /// Any other backend or payload failure
    #[error("Speech synthesis failed: {0}")]
    Provider(#[from] ProviderError),

    /// The decoded audio could not be written out
    #[error("Failed to store decoded audio: {0}")]
    Storage(String),
}

/// Errors produced by the text-fitting engine
#[derive(Error, Debug)]
pub enum FitError {
    /// Geometry could not converge above the minimum pixel height
    #[error("Text cannot be fit into {width}x{height} above {min_height}px")]
    Unconvergible {
        /// Target rectangle width
        width: f32,
        /// Target rectangle height
        height: f32,
        /// The minimum height the descent was clamped at
        min_height: f32,
    },

    /// The target rectangle had a non-positive dimension
    #[error("Degenerate target rectangle: {width}x{height}")]
    DegenerateRect {
        /// Target rectangle width
        width: f32,
        /// Target rectangle height
        height: f32,
    },
}

/// Errors surfaced by a translation session
#[derive(Error, Debug)]
pub enum SessionError {
    /// A request of the same kind is already in flight for this session
    #[error("An exchange of this kind is already in flight")]
    ExchangeInFlight,

    /// Error from a provider adapter
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// Error from speech synthesis
    #[error("Speech error: {0}")]
    Speech(#[from] SpeechError),

    /// Error from the fitting engine
    #[error("Fitting error: {0}")]
    Fit(#[from] FitError),
}

/// Main error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error from a provider
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// Error from speech synthesis
    #[error("Speech error: {0}")]
    Speech(#[from] SpeechError),

    /// Error from the fitting engine
    #[error("Fitting error: {0}")]
    Fit(#[from] FitError),

    /// Error from a session
    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
