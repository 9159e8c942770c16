use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use tracing::{debug, instrument, warn};
use tripweave_core::{build_plan_prompt, Itinerary, PipelineError, TripRequest};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerationError {
    #[error("generation transport failed: {0}")]
    Transport(String),

    #[error("generation provider returned {status}: {message}")]
    Status { status: u16, message: String },

    #[error("generation blocked by provider: {0}")]
    Blocked(String),

    #[error("generation response had no text")]
    EmptyResponse,

    #[error("generation response could not be decoded: {0}")]
    Decode(String),
}

/// Single-shot text completion, configured for structured JSON output.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    fn model_name(&self) -> &str;
    async fn complete(&self, prompt: &str) -> Result<String, GenerationError>;
}

#[derive(Clone)]
pub struct PlanGenerator {
    generator: Arc<dyn TextGenerator>,
}

impl PlanGenerator {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self { generator }
    }

    pub fn model_name(&self) -> &str {
        self.generator.model_name()
    }

    /// Prompts the generator with the trip and grounding context, then parses its reply.
    #[instrument(skip_all, fields(model = self.generator.model_name(), days = request.duration))]
    pub async fn generate(
        &self,
        request: &TripRequest,
        context: &str,
    ) -> Result<Itinerary, PipelineError> {
        let prompt = build_plan_prompt(request, context);
        debug!(prompt_chars = prompt.chars().count(), "requesting itinerary");

        let text = self.generator.complete(&prompt).await.map_err(|error| {
            warn!(error = %error, "generation provider failed");
            PipelineError::Provider(error.to_string())
        })?;

        Itinerary::parse(&text).inspect_err(|error| {
            warn!(
                error = %error,
                response_chars = text.chars().count(),
                "generation output malformed"
            );
        })
    }
}
