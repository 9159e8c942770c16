use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tripweave_core::GenerationSettings;

use crate::generator::{GenerationError, TextGenerator};

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Gemini `generateContent` client with JSON response mode.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    http: Client,
    api_key: String,
    settings: GenerationSettings,
    api_base: String,
}

impl GeminiClient {
    pub fn new(
        api_key: impl Into<String>,
        settings: GenerationSettings,
    ) -> Result<Self, GenerationError> {
        let http = Client::builder()
            .connect_timeout(Duration::from_secs(6))
            .build()
            .map_err(|error| GenerationError::Transport(error.to_string()))?;

        Ok(Self {
            http,
            api_key: api_key.into(),
            settings,
            api_base: GEMINI_API_BASE.to_string(),
        })
    }

    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    fn request_body(&self, prompt: &str) -> serde_json::Value {
        serde_json::json!({
            "contents": [
                {
                    "role": "user",
                    "parts": [ { "text": prompt } ]
                }
            ],
            "generationConfig": {
                "temperature": self.settings.temperature,
                "topP": self.settings.top_p,
                "topK": self.settings.top_k,
                "maxOutputTokens": self.settings.max_output_tokens,
                "responseMimeType": self.settings.response_mime_type
            }
        })
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    fn model_name(&self) -> &str {
        self.settings.model.as_str()
    }

    async fn complete(&self, prompt: &str) -> Result<String, GenerationError> {
        let url = format!(
            "{}/models/{}:generateContent",
            self.api_base.trim_end_matches('/'),
            self.settings.model
        );

        let response = self
            .http
            .post(url)
            .header("x-goog-api-key", self.api_key.as_str())
            .json(&self.request_body(prompt))
            .send()
            .await
            .map_err(|error| GenerationError::Transport(error.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GenerationError::Status {
                status: status.as_u16(),
                message: body,
            });
        }

        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|error| GenerationError::Decode(error.to_string()))?;

        extract_gemini_output_text(&body)
    }
}

fn extract_gemini_output_text(payload: &serde_json::Value) -> Result<String, GenerationError> {
    if let Some(reason) = payload
        .get("promptFeedback")
        .and_then(|value| value.get("blockReason"))
        .and_then(|value| value.as_str())
    {
        return Err(GenerationError::Blocked(reason.to_string()));
    }

    let candidates = payload
        .get("candidates")
        .and_then(|value| value.as_array())
        .ok_or(GenerationError::EmptyResponse)?;

    let mut chunks = Vec::new();
    for candidate in candidates.iter().take(1) {
        let parts = candidate
            .get("content")
            .and_then(|value| value.get("parts"))
            .and_then(|value| value.as_array());
        for part in parts.into_iter().flatten() {
            if let Some(text) = part.get("text").and_then(|value| value.as_str()) {
                chunks.push(text);
            }
        }
    }

    if chunks.is_empty() {
        Err(GenerationError::EmptyResponse)
    } else {
        Ok(chunks.concat())
    }
}
