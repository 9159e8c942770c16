mod rate_limit;

use std::env;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use axum::extract::rejection::JsonRejection;
use axum::extract::{Json, State};
use axum::http::{header, HeaderValue, Method, Request, StatusCode};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{body::Body, Router};
use serde::Serialize;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;
use tripweave_agents::RagPipeline;
use tripweave_core::{InterestEntry, PipelineError, ProviderSettings, TripRequest};
use tripweave_observability::AppMetrics;

pub use crate::rate_limit::{IpRateLimiter, RateDecision};

const DEFAULT_ALLOWED_ORIGINS: [&str; 4] = [
    "http://localhost:3000",
    "http://127.0.0.1:3000",
    "http://localhost:5500",
    "http://127.0.0.1:5500",
];

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub rate_limit_window: Duration,
    pub rate_limit_max: usize,
    pub allowed_origins: Vec<String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            rate_limit_window: Duration::from_secs(60),
            rate_limit_max: 30,
            allowed_origins: DEFAULT_ALLOWED_ORIGINS
                .iter()
                .map(|origin| origin.to_string())
                .collect(),
        }
    }
}

impl ApiConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let rate_limit_window = env::var("TRIPWEAVE_RATE_LIMIT_WINDOW_SECONDS")
            .ok()
            .and_then(|value| value.trim().parse::<u64>().ok())
            .map(Duration::from_secs)
            .unwrap_or(defaults.rate_limit_window);
        let rate_limit_max = env::var("TRIPWEAVE_RATE_LIMIT_MAX")
            .ok()
            .and_then(|value| value.trim().parse::<usize>().ok())
            .unwrap_or(defaults.rate_limit_max);
        let allowed_origins = env::var("TRIPWEAVE_ALLOWED_ORIGINS")
            .ok()
            .map(|value| {
                value
                    .split(',')
                    .map(|origin| origin.trim().trim_end_matches('/').to_string())
                    .filter(|origin| !origin.is_empty())
                    .collect::<Vec<_>>()
            })
            .filter(|origins| !origins.is_empty())
            .unwrap_or(defaults.allowed_origins);

        Self {
            rate_limit_window,
            rate_limit_max,
            allowed_origins,
        }
    }
}

#[derive(Clone)]
pub struct ApiState {
    pub pipeline: Arc<RagPipeline>,
    pub metrics: Arc<AppMetrics>,
    pub limiter: IpRateLimiter,
    pub allowed_origins: Arc<Vec<String>>,
}

impl ApiState {
    pub fn new(pipeline: RagPipeline, config: ApiConfig) -> Self {
        let metrics = pipeline.metrics().clone();
        Self {
            pipeline: Arc::new(pipeline),
            metrics,
            limiter: IpRateLimiter::new(config.rate_limit_window, config.rate_limit_max),
            allowed_origins: Arc::new(config.allowed_origins),
        }
    }
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    timestamp_utc: String,
    metrics: tripweave_observability::MetricsSnapshot,
    interests: Vec<&'static str>,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: &'static str,
    message: String,
}

/// Builds the router from environment settings. Missing provider keys fail here, before serving.
pub fn build_app() -> Result<Router> {
    let settings =
        ProviderSettings::from_env().context("provider configuration is incomplete")?;
    let metrics = AppMetrics::shared();
    let pipeline = RagPipeline::from_settings(&settings, metrics)?;

    tracing::info!(
        model = %settings.generation.model,
        language = %settings.retrieval.language,
        "planning pipeline configured"
    );

    Ok(build_router(ApiState::new(pipeline, ApiConfig::from_env())))
}

pub fn build_router(state: ApiState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/interests", get(interests))
        .route("/api/generate-rag-plan", post(generate_rag_plan))
        .layer(build_cors_layer(&state.allowed_origins))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            rate_limit_middleware,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(RequestBodyLimitLayer::new(64 * 1024))
        .with_state(state)
}

async fn health(State(state): State<ApiState>) -> impl IntoResponse {
    let payload = HealthResponse {
        status: "ok",
        timestamp_utc: chrono::Utc::now().to_rfc3339(),
        metrics: state.metrics.snapshot(),
        interests: state.pipeline.catalog().labels(),
    };
    (StatusCode::OK, Json(payload))
}

async fn interests(State(state): State<ApiState>) -> impl IntoResponse {
    let entries: Vec<InterestEntry> = state.pipeline.catalog().entries().to_vec();
    (StatusCode::OK, Json(entries))
}

async fn generate_rag_plan(
    State(state): State<ApiState>,
    payload: Result<Json<TripRequest>, JsonRejection>,
) -> Response {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            return error_response(
                StatusCode::BAD_REQUEST,
                "invalid_request",
                rejection.body_text(),
            )
        }
    };

    match state.pipeline.run(&request).await {
        Ok(itinerary) => (StatusCode::OK, Json(itinerary)).into_response(),
        Err(error) => pipeline_error_response(&error),
    }
}

fn pipeline_error_response(error: &PipelineError) -> Response {
    match error {
        PipelineError::InvalidRequest(_) => {
            error_response(StatusCode::BAD_REQUEST, "invalid_request", error.public_message())
        }
        PipelineError::NoPlacesFound => {
            error_response(StatusCode::BAD_REQUEST, "no_places_found", error.public_message())
        }
        PipelineError::Provider(_) | PipelineError::MalformedOutput(_) => error_response(
            StatusCode::BAD_GATEWAY,
            "plan_generation_failed",
            error.public_message(),
        ),
    }
}

fn error_response(status: StatusCode, error: &'static str, message: String) -> Response {
    (status, Json(ErrorBody { error, message })).into_response()
}

fn build_cors_layer(allowed_origins: &Arc<Vec<String>>) -> CorsLayer {
    let origins = allowed_origins
        .iter()
        .filter_map(|origin| HeaderValue::from_str(origin).ok())
        .collect::<Vec<_>>();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
}

async fn rate_limit_middleware(
    State(state): State<ApiState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    if request.method() == Method::OPTIONS || request.uri().path() == "/health" {
        return next.run(request).await;
    }

    let ip = request_ip(&request);
    match state.limiter.check(&ip) {
        RateDecision::Allowed => next.run(request).await,
        RateDecision::Limited { retry_after } => {
            tracing::warn!(ip = %ip, "rate limit exceeded");
            let mut response = error_response(
                StatusCode::TOO_MANY_REQUESTS,
                "rate_limited",
                "rate limit exceeded for this IP".to_string(),
            );
            let seconds = retry_after.as_secs().max(1).to_string();
            if let Ok(value) = HeaderValue::from_str(&seconds) {
                response.headers_mut().insert(header::RETRY_AFTER, value);
            }
            response
        }
    }
}

fn request_ip(request: &Request<Body>) -> String {
    request
        .headers()
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
        .map(|value| {
            value
                .split(',')
                .next()
                .unwrap_or("unknown")
                .trim()
                .to_string()
        })
        .unwrap_or_else(|| "local".to_string())
}
