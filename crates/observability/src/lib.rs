use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use once_cell::sync::OnceCell;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

static TRACING_INIT: OnceCell<()> = OnceCell::new();

#[derive(Debug, Default)]
pub struct AppMetrics {
    requests_total: AtomicU64,
    places_retrieved_total: AtomicU64,
    interests_unavailable_total: AtomicU64,
    no_places_total: AtomicU64,
    provider_failures_total: AtomicU64,
    malformed_outputs_total: AtomicU64,
    itineraries_total: AtomicU64,
    total_latency_millis: AtomicU64,
}

#[derive(Debug, Clone, Serialize)]
pub struct MetricsSnapshot {
    pub requests_total: u64,
    pub places_retrieved_total: u64,
    pub interests_unavailable_total: u64,
    pub no_places_total: u64,
    pub provider_failures_total: u64,
    pub malformed_outputs_total: u64,
    pub itineraries_total: u64,
    pub avg_latency_millis: f64,
}

impl AppMetrics {
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn inc_request(&self) {
        self.requests_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn add_places_retrieved(&self, places: usize) {
        self.places_retrieved_total
            .fetch_add(places as u64, Ordering::Relaxed);
    }

    pub fn add_interests_unavailable(&self, interests: usize) {
        self.interests_unavailable_total
            .fetch_add(interests as u64, Ordering::Relaxed);
    }

    pub fn inc_no_places(&self) {
        self.no_places_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_provider_failure(&self) {
        self.provider_failures_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_malformed_output(&self) {
        self.malformed_outputs_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_itinerary(&self) {
        self.itineraries_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn observe_latency(&self, duration: Duration) {
        self.total_latency_millis
            .fetch_add(duration.as_millis() as u64, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        let requests = self.requests_total.load(Ordering::Relaxed);
        let latency = self.total_latency_millis.load(Ordering::Relaxed);

        MetricsSnapshot {
            requests_total: requests,
            places_retrieved_total: self.places_retrieved_total.load(Ordering::Relaxed),
            interests_unavailable_total: self.interests_unavailable_total.load(Ordering::Relaxed),
            no_places_total: self.no_places_total.load(Ordering::Relaxed),
            provider_failures_total: self.provider_failures_total.load(Ordering::Relaxed),
            malformed_outputs_total: self.malformed_outputs_total.load(Ordering::Relaxed),
            itineraries_total: self.itineraries_total.load(Ordering::Relaxed),
            avg_latency_millis: if requests == 0 {
                0.0
            } else {
                latency as f64 / requests as f64
            },
        }
    }
}

pub fn init_tracing(service_name: &str) {
    TRACING_INIT.get_or_init(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}=info,tripweave_agents=info,tripweave_retrieval=info",
                service_name
            ))
        });

        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_current_span(true)
            .with_span_list(true)
            .init();
    });
}
