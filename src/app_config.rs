use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::text_area::TextHinting;

/// Application configuration module
/// This module handles the pipeline configuration including loading,
/// validating and saving configuration settings.
/// Represents the pipeline configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Target language code (ISO 639-1 style); `None` disables translation
    #[serde(default)]
    pub target_language: Option<String>,

    /// Active translation engine
    #[serde(default)]
    pub engine: TranslationEngine,

    /// Google API key, used by Google Basic translation and TTS
    #[serde(default = "String::new")]
    pub google_api_key: String,

    /// Google Cloud OAuth bearer token, used by Google Advanced translation
    #[serde(default = "String::new")]
    pub google_token: String,

    /// Google Cloud project id, sent as `x-goog-user-project`
    #[serde(default = "String::new")]
    pub google_project: String,

    /// DeepL API key
    #[serde(default = "String::new")]
    pub deepl_api_key: String,

    /// DeepL endpoint base, configurable for the free vs pro tiers
    #[serde(default = "default_deepl_endpoint")]
    pub deepl_endpoint: String,

    /// OpenAI API key, used by the GPT engine
    #[serde(default = "String::new")]
    pub gpt_api_key: String,

    /// Global layout hinting override
    #[serde(default)]
    pub text_hinting: TextHinting,

    /// Per-language width/height glyph ratio overrides
    #[serde(default)]
    pub width_overrides: HashMap<String, f32>,

    /// Per-language height modifier applied when rendering untranslated text
    #[serde(default)]
    pub pre_translated_height_mods: HashMap<String, f32>,

    /// Whether `request_audio` defaults to the source-language side
    #[serde(default = "default_true")]
    pub audio_prefers_source: bool,

    /// Whether dialog areas should speak automatically when they appear
    #[serde(default)]
    pub autoplay_audio: bool,

    /// Write raw request/response dumps for debugging
    #[serde(default)]
    pub debug_dumps: bool,

    /// Request timeout in seconds for provider exchanges
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

/// Translation engine type
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum TranslationEngine {
    /// Google Cloud Translation v2 with an API key
    #[default]
    GoogleBasic,
    /// Google Cloud Translation v3 with bearer auth
    GoogleAdvanced,
    /// DeepL v2
    DeepL,
    /// OpenAI chat completions
    Gpt,
}

impl TranslationEngine {
    /// Capitalized engine name for user-facing messages
    pub fn display_name(&self) -> &str {
        match self {
            Self::GoogleBasic => "Google",
            Self::GoogleAdvanced => "Google Advanced",
            Self::DeepL => "DeepL",
            Self::Gpt => "GPT",
        }
    }

    /// Lowercase engine identifier
    pub fn to_lowercase_string(&self) -> String {
        match self {
            Self::GoogleBasic => "google_basic".to_string(),
            Self::GoogleAdvanced => "google_advanced".to_string(),
            Self::DeepL => "deepl".to_string(),
            Self::Gpt => "gpt".to_string(),
        }
    }
}

impl std::fmt::Display for TranslationEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_lowercase_string())
    }
}

impl std::str::FromStr for TranslationEngine {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "google" | "google_basic" => Ok(Self::GoogleBasic),
            "google_advanced" => Ok(Self::GoogleAdvanced),
            "deepl" => Ok(Self::DeepL),
            "gpt" | "openai" => Ok(Self::Gpt),
            _ => Err(anyhow!("Invalid translation engine: {}", s)),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            target_language: Some("en".to_string()),
            engine: TranslationEngine::default(),
            google_api_key: String::new(),
            google_token: String::new(),
            google_project: String::new(),
            deepl_api_key: String::new(),
            deepl_endpoint: default_deepl_endpoint(),
            gpt_api_key: String::new(),
            text_hinting: TextHinting::default(),
            width_overrides: HashMap::new(),
            pre_translated_height_mods: HashMap::new(),
            audio_prefers_source: true,
            autoplay_audio: false,
            debug_dumps: false,
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Config {
    /// Load configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).with_context(|| {
            format!("Failed to read config file: {}", path.as_ref().display())
        })?;
        let config: Config =
            serde_json::from_str(&content).context("Failed to parse config file")?;
        Ok(config)
    }

    /// Save configuration to a JSON file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content =
            serde_json::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(path.as_ref(), content).with_context(|| {
            format!("Failed to write config file: {}", path.as_ref().display())
        })?;
        Ok(())
    }

    /// Default config file location under the user config directory
    pub fn default_path() -> Result<PathBuf> {
        let base = dirs::config_dir().ok_or_else(|| anyhow!("No config directory found"))?;
        Ok(base.join("textlens").join("config.json"))
    }

    /// Load from the default location, falling back to defaults if absent
    pub fn load_default() -> Result<Self> {
        let path = Self::default_path()?;
        if path.exists() {
            Self::from_file(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Width/height glyph ratio override for a language, if configured nonzero
    pub fn width_override(&self, language: &str) -> Option<f32> {
        self.width_overrides
            .get(language)
            .copied()
            .filter(|w| *w != 0.0)
    }

    /// Height modifier for untranslated text in a language, default 1.0
    pub fn pre_translated_height_mod(&self, language: &str) -> f32 {
        self.pre_translated_height_mods
            .get(language)
            .copied()
            .filter(|m| *m != 0.0)
            .unwrap_or(1.0)
    }
}

fn default_deepl_endpoint() -> String {
    "https://api.deepl.com".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_true() -> bool {
    true
}
