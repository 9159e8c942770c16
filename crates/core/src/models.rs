use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

use crate::error::PipelineError;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TravelStyle {
    #[serde(default)]
    pub planning_style: String,
    #[serde(default)]
    pub pace: String,
    #[serde(default)]
    pub interests: Vec<String>,
    #[serde(default)]
    pub budget: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TripRequest {
    pub destination: String,
    pub duration: u32,
    pub person_count: u32,
    #[serde(default)]
    pub travel_style: TravelStyle,
}

impl TripRequest {
    pub fn validate(&self) -> Result<(), PipelineError> {
        if self.destination.trim().is_empty() {
            return Err(PipelineError::InvalidRequest(
                "destination must not be empty".to_string(),
            ));
        }
        if self.duration < 1 {
            return Err(PipelineError::InvalidRequest(
                "duration must be at least 1 day".to_string(),
            ));
        }
        if self.person_count < 1 {
            return Err(PipelineError::InvalidRequest(
                "personCount must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterestPlaces {
    pub interest: String,
    pub places: Vec<String>,
}

/// Place names per interest, kept in the order interests were retrieved.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RetrievedPlaces {
    entries: Vec<InterestPlaces>,
}

impl RetrievedPlaces {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the places of an interest already present, otherwise appends it.
    pub fn insert(&mut self, interest: impl Into<String>, places: Vec<String>) {
        let interest = interest.into();
        match self
            .entries
            .iter_mut()
            .find(|entry| entry.interest == interest)
        {
            Some(entry) => entry.places = places,
            None => self.entries.push(InterestPlaces { interest, places }),
        }
    }

    pub fn get(&self, interest: &str) -> Option<&[String]> {
        self.entries
            .iter()
            .find(|entry| entry.interest == interest)
            .map(|entry| entry.places.as_slice())
    }

    pub fn iter(&self) -> impl Iterator<Item = &InterestPlaces> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn total_places(&self) -> usize {
        self.entries.iter().map(|entry| entry.places.len()).sum()
    }

    /// True when no interest contributed a single place.
    pub fn is_empty(&self) -> bool {
        self.total_places() == 0
    }
}

impl Serialize for RetrievedPlaces {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for entry in &self.entries {
            map.serialize_entry(&entry.interest, &entry.places)?;
        }
        map.end()
    }
}
