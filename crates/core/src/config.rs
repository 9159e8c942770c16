use std::env;
use std::time::Duration;

use crate::error::ConfigError;

pub const PLACES_API_KEY_VAR: &str = "TRIPWEAVE_PLACES_API_KEY";
pub const GEMINI_API_KEY_VAR: &str = "TRIPWEAVE_GEMINI_API_KEY";
pub const GEMINI_MODEL_VAR: &str = "TRIPWEAVE_GEMINI_MODEL";
pub const PLACES_LANGUAGE_VAR: &str = "TRIPWEAVE_PLACES_LANGUAGE";
pub const RETRIEVAL_TIMEOUT_VAR: &str = "TRIPWEAVE_RETRIEVAL_TIMEOUT_SECONDS";
pub const PLACES_PER_INTEREST_VAR: &str = "TRIPWEAVE_PLACES_PER_INTEREST";

pub const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-flash";
pub const DEFAULT_PLACES_LANGUAGE: &str = "en";
pub const MAX_PLACES_PER_INTEREST: usize = 5;
const DEFAULT_RETRIEVAL_TIMEOUT_SECONDS: u64 = 8;

#[derive(Debug, Clone, PartialEq)]
pub struct GenerationSettings {
    pub model: String,
    pub temperature: f32,
    pub top_p: f32,
    pub top_k: u32,
    pub max_output_tokens: u32,
    pub response_mime_type: String,
}

impl GenerationSettings {
    pub fn for_model(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            temperature: 0.7,
            top_p: 1.0,
            top_k: 1,
            max_output_tokens: 2048,
            response_mime_type: "application/json".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RetrievalSettings {
    pub language: String,
    pub per_interest_limit: usize,
    pub timeout: Duration,
}

impl Default for RetrievalSettings {
    fn default() -> Self {
        Self {
            language: DEFAULT_PLACES_LANGUAGE.to_string(),
            per_interest_limit: MAX_PLACES_PER_INTEREST,
            timeout: Duration::from_secs(DEFAULT_RETRIEVAL_TIMEOUT_SECONDS),
        }
    }
}

/// Everything the two external capabilities need, resolved once at startup.
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderSettings {
    pub places_api_key: String,
    pub gemini_api_key: String,
    pub generation: GenerationSettings,
    pub retrieval: RetrievalSettings,
}

impl ProviderSettings {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let places_api_key =
            read(PLACES_API_KEY_VAR).ok_or(ConfigError::Missing(PLACES_API_KEY_VAR))?;
        let gemini_api_key =
            read(GEMINI_API_KEY_VAR).ok_or(ConfigError::Missing(GEMINI_API_KEY_VAR))?;

        let model = read(GEMINI_MODEL_VAR).unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string());
        let language =
            read(PLACES_LANGUAGE_VAR).unwrap_or_else(|| DEFAULT_PLACES_LANGUAGE.to_string());

        let timeout_seconds = match read(RETRIEVAL_TIMEOUT_VAR) {
            Some(raw) => parse_number(RETRIEVAL_TIMEOUT_VAR, &raw)?.clamp(1, 60),
            None => DEFAULT_RETRIEVAL_TIMEOUT_SECONDS,
        };
        let per_interest_limit = match read(PLACES_PER_INTEREST_VAR) {
            Some(raw) => (parse_number(PLACES_PER_INTEREST_VAR, &raw)? as usize)
                .clamp(1, MAX_PLACES_PER_INTEREST),
            None => MAX_PLACES_PER_INTEREST,
        };

        Ok(Self {
            places_api_key,
            gemini_api_key,
            generation: GenerationSettings::for_model(model),
            retrieval: RetrievalSettings {
                language,
                per_interest_limit,
                timeout: Duration::from_secs(timeout_seconds),
            },
        })
    }
}

fn parse_number(key: &'static str, raw: &str) -> Result<u64, ConfigError> {
    raw.parse::<u64>().map_err(|error| ConfigError::Invalid {
        key,
        reason: error.to_string(),
    })
}
