pub mod catalog;
pub mod config;
pub mod context;
pub mod error;
pub mod itinerary;
pub mod models;
pub mod prompt;

pub use catalog::{InterestCatalog, InterestEntry};
pub use config::{GenerationSettings, ProviderSettings, RetrievalSettings};
pub use context::render_context;
pub use error::{ConfigError, PipelineError};
pub use itinerary::{Itinerary, ItineraryDay};
pub use models::*;
pub use prompt::{build_plan_prompt, day_label};
