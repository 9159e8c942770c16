use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::{PlaceHit, PlaceSearch, SearchError};

const TEXT_SEARCH_URL: &str = "https://maps.googleapis.com/maps/api/place/textsearch/json";

#[derive(Debug, Deserialize)]
struct TextSearchResponse {
    #[serde(default)]
    results: Vec<TextSearchResult>,
    status: String,
    error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TextSearchResult {
    name: Option<String>,
    formatted_address: Option<String>,
    rating: Option<f32>,
}

/// Google Places text search.
#[derive(Debug, Clone)]
pub struct GooglePlacesClient {
    http: Client,
    api_key: String,
    endpoint: String,
}

impl GooglePlacesClient {
    pub fn new(api_key: impl Into<String>) -> Result<Self, SearchError> {
        let http = Client::builder()
            .connect_timeout(Duration::from_secs(6))
            .timeout(Duration::from_secs(20))
            .build()
            .map_err(|error| SearchError::Transport(error.to_string()))?;

        Ok(Self {
            http,
            api_key: api_key.into(),
            endpoint: TEXT_SEARCH_URL.to_string(),
        })
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }
}

#[async_trait]
impl PlaceSearch for GooglePlacesClient {
    fn provider_name(&self) -> &'static str {
        "google-places"
    }

    async fn search(&self, query: &str, language: &str) -> Result<Vec<PlaceHit>, SearchError> {
        let response = self
            .http
            .get(self.endpoint.as_str())
            .query(&[
                ("query", query),
                ("language", language),
                ("key", self.api_key.as_str()),
            ])
            .send()
            .await
            .map_err(|error| SearchError::Transport(error.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SearchError::Status {
                status: status.as_u16().to_string(),
                message: body,
            });
        }

        let body: TextSearchResponse = response
            .json()
            .await
            .map_err(|error| SearchError::Decode(error.to_string()))?;

        hits_from_response(body)
    }
}

fn hits_from_response(body: TextSearchResponse) -> Result<Vec<PlaceHit>, SearchError> {
    match body.status.as_str() {
        "OK" => {}
        "ZERO_RESULTS" => return Ok(Vec::new()),
        _ => {
            return Err(SearchError::Status {
                status: body.status,
                message: body.error_message.unwrap_or_default(),
            })
        }
    }

    let hits = body
        .results
        .into_iter()
        .filter_map(|result| {
            let name = result.name?.trim().to_string();
            (!name.is_empty()).then_some(PlaceHit {
                name,
                address: result.formatted_address,
                rating: result.rating,
            })
        })
        .collect::<Vec<_>>();

    debug!(hits = hits.len(), "google places text search parsed");
    Ok(hits)
}
