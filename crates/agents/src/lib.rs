mod gemini;
mod generator;

use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use tracing::{info, instrument};
use tripweave_core::{
    render_context, InterestCatalog, Itinerary, PipelineError, ProviderSettings, TripRequest,
};
use tripweave_observability::AppMetrics;
use tripweave_retrieval::{GooglePlacesClient, PlaceRetriever, RetrievalReport};
use uuid::Uuid;

pub use gemini::GeminiClient;
pub use generator::{GenerationError, PlanGenerator, TextGenerator};

/// Retrieval, context rendering and generation for one trip request.
#[derive(Clone)]
pub struct RagPipeline {
    retriever: PlaceRetriever,
    generator: PlanGenerator,
    metrics: Arc<AppMetrics>,
}

impl RagPipeline {
    pub fn new(
        retriever: PlaceRetriever,
        generator: PlanGenerator,
        metrics: Arc<AppMetrics>,
    ) -> Self {
        Self {
            retriever,
            generator,
            metrics,
        }
    }

    /// Wires the Google Places and Gemini clients from startup settings.
    pub fn from_settings(settings: &ProviderSettings, metrics: Arc<AppMetrics>) -> Result<Self> {
        let places = GooglePlacesClient::new(settings.places_api_key.clone())
            .context("failed to build place search client")?;
        let gemini = GeminiClient::new(settings.gemini_api_key.clone(), settings.generation.clone())
            .context("failed to build generation client")?;

        let retriever = PlaceRetriever::new(
            Arc::new(places),
            Arc::new(InterestCatalog::standard()),
            settings.retrieval.clone(),
        );

        Ok(Self::new(
            retriever,
            PlanGenerator::new(Arc::new(gemini)),
            metrics,
        ))
    }

    pub fn catalog(&self) -> &InterestCatalog {
        self.retriever.catalog()
    }

    pub fn metrics(&self) -> &Arc<AppMetrics> {
        &self.metrics
    }

    pub async fn retrieve(&self, destination: &str, interests: &[String]) -> RetrievalReport {
        self.retriever.retrieve_report(destination, interests).await
    }

    #[instrument(
        skip(self, request),
        fields(
            run_id = %Uuid::new_v4(),
            destination = %request.destination,
            days = request.duration
        )
    )]
    pub async fn run(&self, request: &TripRequest) -> Result<Itinerary, PipelineError> {
        let started = Instant::now();
        self.metrics.inc_request();

        let result = self.execute(request).await;
        self.metrics.observe_latency(started.elapsed());

        match &result {
            Ok(itinerary) => {
                self.metrics.inc_itinerary();
                info!(days = itinerary.len(), "itinerary generated");
            }
            Err(error) => {
                match error {
                    PipelineError::NoPlacesFound => self.metrics.inc_no_places(),
                    PipelineError::Provider(_) => self.metrics.inc_provider_failure(),
                    PipelineError::MalformedOutput(_) => self.metrics.inc_malformed_output(),
                    PipelineError::InvalidRequest(_) => {}
                }
                info!(kind = error.kind(), error = %error, "itinerary not generated");
            }
        }

        result
    }

    async fn execute(&self, request: &TripRequest) -> Result<Itinerary, PipelineError> {
        request.validate()?;

        let report = self
            .retriever
            .retrieve_report(&request.destination, &request.travel_style.interests)
            .await;
        self.metrics.add_places_retrieved(report.total_places());
        self.metrics
            .add_interests_unavailable(report.unavailable_count());

        let places = report.places();
        if places.is_empty() {
            return Err(PipelineError::NoPlacesFound);
        }

        let context = render_context(&places);
        self.generator.generate(request, &context).await
    }
}
