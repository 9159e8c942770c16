use std::sync::Arc;

use tripweave_core::{
    render_context, Itinerary, PipelineError, RetrievedPlaces, TravelStyle, TripRequest,
};
use tripweave_tests::{pipeline, StubGenerator, StubPlaces, StubReply};

fn request(destination: &str, interests: &[&str], duration: u32) -> TripRequest {
    TripRequest {
        destination: destination.to_string(),
        duration,
        person_count: 2,
        travel_style: TravelStyle {
            planning_style: "spontaneous".to_string(),
            pace: "fast".to_string(),
            interests: interests.iter().map(|value| value.to_string()).collect(),
            budget: "low".to_string(),
        },
    }
}

#[tokio::test]
async fn vienna_culture_plan_is_returned_unmodified() {
    let plan = r#"{"Day 1": ["Morning: Palace A", "Lunch: near Palace B", "Evening: Palace B"]}"#;
    let places = Arc::new(StubPlaces::default().with(
        "museum|art_gallery|historical_landmark in Vienna",
        &["Palace A", "Palace B"],
    ));
    let generator = Arc::new(StubGenerator::new(StubReply::Echo(plan.to_string())));

    let itinerary = pipeline(places, generator.clone())
        .run(&request("Vienna", &["culture"], 1))
        .await
        .unwrap();

    assert_eq!(itinerary, Itinerary::parse(plan).unwrap());
    assert!(generator
        .last_prompt()
        .unwrap()
        .contains("culture: Palace A, Palace B"));
}

#[tokio::test]
async fn partial_retrieval_still_generates() {
    let places = Arc::new(
        StubPlaces::default()
            .failing("museum|art_gallery|historical_landmark in Lisbon")
            .with("restaurant|cafe in Lisbon", &["Pasteis de Belem"]),
    );
    let generator = Arc::new(StubGenerator::new(StubReply::FollowDays));

    let itinerary = pipeline(places.clone(), generator.clone())
        .run(&request("Lisbon", &["culture", "food"], 2))
        .await
        .unwrap();

    assert_eq!(itinerary.len(), 2);
    assert_eq!(places.calls(), 2);

    let prompt = generator.last_prompt().unwrap();
    assert!(prompt.contains("food: Pasteis de Belem"));
    assert!(!prompt.contains("culture: "));
}

#[tokio::test]
async fn every_interest_empty_never_calls_generator() {
    let places = Arc::new(StubPlaces::default().failing("park|tourist_attraction in Oslo"));
    let generator = Arc::new(StubGenerator::new(StubReply::FollowDays));

    let error = pipeline(places, generator.clone())
        .run(&request("Oslo", &["nature", "shopping", "spa"], 2))
        .await
        .unwrap_err();

    assert_eq!(error, PipelineError::NoPlacesFound);
    assert_eq!(generator.calls(), 0);
}

#[tokio::test]
async fn duration_of_three_yields_three_days() {
    let places =
        Arc::new(StubPlaces::default().with("park|tourist_attraction in Kyoto", &["Arashiyama"]));
    let generator = Arc::new(StubGenerator::new(StubReply::FollowDays));

    let itinerary = pipeline(places, generator)
        .run(&request("Kyoto", &["nature"], 3))
        .await
        .unwrap();

    let labels = itinerary
        .days()
        .iter()
        .map(|day| day.label.as_str())
        .collect::<Vec<_>>();
    assert_eq!(labels, vec!["Day 1", "Day 2", "Day 3"]);
}

#[tokio::test]
async fn invalid_generator_text_is_malformed_not_a_panic() {
    let places = Arc::new(StubPlaces::default().with("restaurant|cafe in Paris", &["Cafe X"]));
    let generator = Arc::new(StubGenerator::new(StubReply::Echo("<<not json>>".to_string())));

    let error = pipeline(places, generator)
        .run(&request("Paris", &["food"], 1))
        .await
        .unwrap_err();

    assert!(matches!(error, PipelineError::MalformedOutput(_)));
}

#[test]
fn two_interest_context_renders_in_insertion_order() {
    let mut places = RetrievedPlaces::new();
    places.insert("food", vec!["Cafe X".to_string()]);
    places.insert("nature", vec!["Park Y".to_string()]);

    assert_eq!(render_context(&places), "food: Cafe X\nnature: Park Y");
}
