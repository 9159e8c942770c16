use thiserror::Error;

/// Per-request failure of the planning pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PipelineError {
    #[error("invalid trip request: {0}")]
    InvalidRequest(String),

    #[error("no places matched the requested interests")]
    NoPlacesFound,

    #[error("generation provider failed: {0}")]
    Provider(String),

    #[error("generation output could not be parsed as an itinerary: {0}")]
    MalformedOutput(String),
}

impl PipelineError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidRequest(_) => "invalid_request",
            Self::NoPlacesFound => "no_places_found",
            Self::Provider(_) => "provider_error",
            Self::MalformedOutput(_) => "malformed_output",
        }
    }

    /// Caller-caused failures; everything else is upstream.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::InvalidRequest(_) | Self::NoPlacesFound)
    }

    /// Message safe to hand back to a caller. Provider internals stay in logs.
    pub fn public_message(&self) -> String {
        match self {
            Self::InvalidRequest(reason) => reason.clone(),
            Self::NoPlacesFound => {
                "No places matched your interests. Try choosing different interests.".to_string()
            }
            Self::Provider(_) | Self::MalformedOutput(_) => {
                "Plan generation failed. Please try again later.".to_string()
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("required setting {0} is not set")]
    Missing(&'static str),

    #[error("setting {key} is invalid: {reason}")]
    Invalid { key: &'static str, reason: String },
}
