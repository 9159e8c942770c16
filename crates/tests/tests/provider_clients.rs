use std::sync::Arc;

use serde_json::json;
use tripweave_agents::{GeminiClient, GenerationError, PlanGenerator, RagPipeline, TextGenerator};
use tripweave_core::{
    GenerationSettings, InterestCatalog, PipelineError, RetrievalSettings, TravelStyle,
    TripRequest,
};
use tripweave_observability::AppMetrics;
use tripweave_retrieval::{
    GooglePlacesClient, InterestOutcome, PlaceRetriever, PlaceSearch, SearchError,
};
use wiremock::matchers::{body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const GENERATE_PATH: &str = "/v1beta/models/gemini-1.5-flash:generateContent";

fn places_client(server: &MockServer) -> GooglePlacesClient {
    GooglePlacesClient::new("places-key")
        .unwrap()
        .with_endpoint(format!("{}/textsearch/json", server.uri()))
}

fn gemini_client(server: &MockServer) -> GeminiClient {
    GeminiClient::new(
        "gemini-key",
        GenerationSettings::for_model("gemini-1.5-flash"),
    )
    .unwrap()
    .with_api_base(format!("{}/v1beta", server.uri()))
}

fn retriever(server: &MockServer) -> PlaceRetriever {
    PlaceRetriever::new(
        Arc::new(places_client(server)),
        Arc::new(InterestCatalog::standard()),
        RetrievalSettings::default(),
    )
}

fn food_request(destination: &str) -> TripRequest {
    TripRequest {
        destination: destination.to_string(),
        duration: 1,
        person_count: 2,
        travel_style: TravelStyle {
            interests: vec!["food".to_string()],
            ..TravelStyle::default()
        },
    }
}

fn gemini_reply(text: &str) -> serde_json::Value {
    json!({
        "candidates": [
            { "content": { "role": "model", "parts": [ { "text": text } ] } }
        ]
    })
}

async fn mount_places(server: &MockServer, query: &str, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path("/textsearch/json"))
        .and(query_param("query", query))
        .and(query_param("language", "en"))
        .and(query_param("key", "places-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

#[tokio::test]
async fn places_search_sends_key_and_language_and_caps_results() {
    let server = MockServer::start().await;
    let results = ["A", "B", "C", "D", "E", "F", "G"]
        .iter()
        .map(|name| json!({ "name": name, "rating": 4.5 }))
        .collect::<Vec<_>>();
    mount_places(
        &server,
        "restaurant|cafe in Seoul",
        json!({ "status": "OK", "results": results }),
    )
    .await;

    let places = retriever(&server)
        .retrieve("Seoul", &["food".to_string()])
        .await;

    assert_eq!(
        places.get("food"),
        Some(&["A", "B", "C", "D", "E"].map(String::from)[..])
    );
}

#[tokio::test]
async fn places_zero_results_is_an_empty_interest() {
    let server = MockServer::start().await;
    mount_places(
        &server,
        "park|tourist_attraction in Reykjavik",
        json!({ "status": "ZERO_RESULTS", "results": [] }),
    )
    .await;

    let hits = places_client(&server)
        .search("park|tourist_attraction in Reykjavik", "en")
        .await
        .unwrap();
    assert!(hits.is_empty());

    let report = retriever(&server)
        .retrieve_report("Reykjavik", &["nature".to_string()])
        .await;
    assert_eq!(report.interests[0].outcome, InterestOutcome::Empty);
}

#[tokio::test]
async fn places_server_error_marks_interest_unavailable() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/textsearch/json"))
        .respond_with(ResponseTemplate::new(503).set_body_string("backend unavailable"))
        .mount(&server)
        .await;

    let error = places_client(&server)
        .search("restaurant|cafe in Lima", "en")
        .await
        .unwrap_err();
    assert_eq!(
        error,
        SearchError::Status {
            status: "503".to_string(),
            message: "backend unavailable".to_string(),
        }
    );

    let report = retriever(&server)
        .retrieve_report("Lima", &["food".to_string()])
        .await;
    assert!(matches!(
        report.interests[0].outcome,
        InterestOutcome::Unavailable(_)
    ));
    assert!(report.places().is_empty());
}

#[tokio::test]
async fn places_transport_failure_is_unavailable() {
    let server = MockServer::start().await;
    let client = places_client(&server);
    drop(server);

    let error = client
        .search("restaurant|cafe in Lima", "en")
        .await
        .unwrap_err();
    assert!(matches!(error, SearchError::Transport(_)));
}

#[tokio::test]
async fn gemini_posts_json_mode_request_with_api_key() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .and(header("x-goog-api-key", "gemini-key"))
        .and(body_partial_json(json!({
            "generationConfig": { "responseMimeType": "application/json" }
        })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(gemini_reply(r#"{"Day 1": ["Morning: A"]}"#)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let text = gemini_client(&server).complete("plan please").await.unwrap();
    assert_eq!(text, r#"{"Day 1": ["Morning: A"]}"#);
}

#[tokio::test]
async fn gemini_client_error_is_a_status_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(429).set_body_string("quota exceeded"))
        .mount(&server)
        .await;

    let error = gemini_client(&server)
        .complete("plan please")
        .await
        .unwrap_err();
    assert_eq!(
        error,
        GenerationError::Status {
            status: 429,
            message: "quota exceeded".to_string(),
        }
    );
}

#[tokio::test]
async fn pipeline_over_http_returns_generated_itinerary() {
    let server = MockServer::start().await;
    mount_places(
        &server,
        "restaurant|cafe in Lisbon",
        json!({ "status": "OK", "results": [ { "name": "Pasteis de Belem" } ] }),
    )
    .await;
    let plan = r#"{"Day 1":["Morning: Pasteis de Belem"]}"#;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(gemini_reply(plan)))
        .mount(&server)
        .await;

    let pipeline = RagPipeline::new(
        retriever(&server),
        PlanGenerator::new(Arc::new(gemini_client(&server))),
        AppMetrics::shared(),
    );

    let itinerary = pipeline.run(&food_request("Lisbon")).await.unwrap();
    assert_eq!(serde_json::to_string(&itinerary).unwrap(), plan);
}

#[tokio::test]
async fn generator_outage_over_http_is_a_provider_error() {
    let server = MockServer::start().await;
    mount_places(
        &server,
        "restaurant|cafe in Lisbon",
        json!({ "status": "OK", "results": [ { "name": "Pasteis de Belem" } ] }),
    )
    .await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let metrics = AppMetrics::shared();
    let pipeline = RagPipeline::new(
        retriever(&server),
        PlanGenerator::new(Arc::new(gemini_client(&server))),
        metrics.clone(),
    );

    let error = pipeline.run(&food_request("Lisbon")).await.unwrap_err();
    assert!(matches!(error, PipelineError::Provider(_)));
    assert_eq!(metrics.snapshot().provider_failures_total, 1);
}
