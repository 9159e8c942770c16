mod google_places;

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use futures::future::join_all;
use serde::Serialize;
use thiserror::Error;
use tracing::{info, instrument, warn};
use tripweave_core::config::MAX_PLACES_PER_INTEREST;
use tripweave_core::{InterestCatalog, RetrievalSettings, RetrievedPlaces};

pub use google_places::GooglePlacesClient;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlaceHit {
    pub name: String,
    pub address: Option<String>,
    pub rating: Option<f32>,
}

impl PlaceHit {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            address: None,
            rating: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SearchError {
    #[error("place search transport failed: {0}")]
    Transport(String),

    #[error("place search returned {status}: {message}")]
    Status { status: String, message: String },

    #[error("place search response could not be decoded: {0}")]
    Decode(String),

    #[error("place search timed out after {0:?}")]
    Timeout(Duration),
}

/// Ranked place lookup. Implementations return an empty list for no matches.
#[async_trait]
pub trait PlaceSearch: Send + Sync {
    fn provider_name(&self) -> &'static str;
    async fn search(&self, query: &str, language: &str) -> Result<Vec<PlaceHit>, SearchError>;
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", content = "detail", rename_all = "snake_case")]
pub enum InterestOutcome {
    Found(Vec<String>),
    Empty,
    Unavailable(String),
    Unmapped,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InterestRetrieval {
    pub interest: String,
    pub query: Option<String>,
    pub outcome: InterestOutcome,
}

/// Per-interest results of one retrieval pass, in request order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RetrievalReport {
    pub destination: String,
    pub interests: Vec<InterestRetrieval>,
}

impl RetrievalReport {
    pub fn places(&self) -> RetrievedPlaces {
        let mut places = RetrievedPlaces::new();
        for entry in &self.interests {
            if let InterestOutcome::Found(names) = &entry.outcome {
                places.insert(entry.interest.clone(), names.clone());
            }
        }
        places
    }

    pub fn unavailable_count(&self) -> usize {
        self.interests
            .iter()
            .filter(|entry| matches!(entry.outcome, InterestOutcome::Unavailable(_)))
            .count()
    }

    pub fn total_places(&self) -> usize {
        self.interests
            .iter()
            .map(|entry| match &entry.outcome {
                InterestOutcome::Found(names) => names.len(),
                _ => 0,
            })
            .sum()
    }
}

#[derive(Clone)]
pub struct PlaceRetriever {
    search: Arc<dyn PlaceSearch>,
    catalog: Arc<InterestCatalog>,
    settings: RetrievalSettings,
}

impl PlaceRetriever {
    pub fn new(
        search: Arc<dyn PlaceSearch>,
        catalog: Arc<InterestCatalog>,
        mut settings: RetrievalSettings,
    ) -> Self {
        settings.per_interest_limit = settings
            .per_interest_limit
            .clamp(1, MAX_PLACES_PER_INTEREST);
        Self {
            search,
            catalog,
            settings,
        }
    }

    pub fn catalog(&self) -> &InterestCatalog {
        &self.catalog
    }

    pub async fn retrieve(&self, destination: &str, interests: &[String]) -> RetrievedPlaces {
        self.retrieve_report(destination, interests).await.places()
    }

    /// Searches every mapped interest concurrently. A failing interest never aborts the others.
    ///
    /// Labels naming the same catalog entry are searched once, under the first spelling seen.
    #[instrument(skip(self, interests), fields(provider = self.search.provider_name()))]
    pub async fn retrieve_report(
        &self,
        destination: &str,
        interests: &[String],
    ) -> RetrievalReport {
        let mut seen = HashSet::new();
        let mut unique = Vec::new();
        for interest in interests {
            let key = match self.catalog.lookup(interest) {
                Some(entry) => entry.label.to_string(),
                None => interest.trim().to_lowercase(),
            };
            if seen.insert(key) {
                unique.push(interest.as_str());
            }
        }

        let lookups = unique
            .into_iter()
            .map(|interest| self.retrieve_interest(destination, interest));
        let results = join_all(lookups).await;

        let report = RetrievalReport {
            destination: destination.to_string(),
            interests: results,
        };

        info!(
            destination = %destination,
            interests = report.interests.len(),
            places = report.total_places(),
            unavailable = report.unavailable_count(),
            "places retrieved"
        );

        report
    }

    async fn retrieve_interest(&self, destination: &str, interest: &str) -> InterestRetrieval {
        let Some(terms) = self.catalog.category_query(interest) else {
            return InterestRetrieval {
                interest: interest.to_string(),
                query: None,
                outcome: InterestOutcome::Unmapped,
            };
        };

        let query = format!("{} in {}", terms, destination);
        let searched = tokio::time::timeout(
            self.settings.timeout,
            self.search.search(&query, &self.settings.language),
        )
        .await
        .unwrap_or(Err(SearchError::Timeout(self.settings.timeout)));

        let outcome = match searched {
            Ok(hits) => {
                let names = hits
                    .into_iter()
                    .take(self.settings.per_interest_limit)
                    .map(|hit| hit.name)
                    .collect::<Vec<_>>();
                if names.is_empty() {
                    InterestOutcome::Empty
                } else {
                    InterestOutcome::Found(names)
                }
            }
            Err(error) => {
                warn!(
                    interest = %interest,
                    query = %query,
                    error = %error,
                    "interest retrieval unavailable"
                );
                InterestOutcome::Unavailable(error.to_string())
            }
        };

        InterestRetrieval {
            interest: interest.to_string(),
            query: Some(query),
            outcome,
        }
    }
}
