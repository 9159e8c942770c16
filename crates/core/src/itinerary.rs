use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;

use crate::error::PipelineError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItineraryDay {
    pub label: String,
    pub activities: Vec<String>,
}

/// Day-keyed activity lists, in the order the generator produced them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(try_from = "Value")]
pub struct Itinerary {
    days: Vec<ItineraryDay>,
}

impl Itinerary {
    pub fn new(days: Vec<ItineraryDay>) -> Self {
        Self { days }
    }

    pub fn days(&self) -> &[ItineraryDay] {
        &self.days
    }

    pub fn day(&self, label: &str) -> Option<&[String]> {
        self.days
            .iter()
            .find(|day| day.label == label)
            .map(|day| day.activities.as_slice())
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    /// Parses generator text. Anything that is not an object of string lists is rejected.
    pub fn parse(text: &str) -> Result<Self, PipelineError> {
        let value: Value = serde_json::from_str(text)
            .map_err(|error| PipelineError::MalformedOutput(format!("invalid JSON: {error}")))?;
        Self::try_from(value).map_err(PipelineError::MalformedOutput)
    }
}

impl TryFrom<Value> for Itinerary {
    type Error = String;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        let map = match value {
            Value::Object(map) => map,
            other => {
                return Err(format!(
                    "expected an object keyed by day, found {}",
                    value_kind(&other)
                ))
            }
        };

        let mut days = Vec::with_capacity(map.len());
        for (label, entry) in map {
            let items = match entry {
                Value::Array(items) => items,
                other => {
                    return Err(format!(
                        "day {label:?} should map to a list, found {}",
                        value_kind(&other)
                    ))
                }
            };

            let mut activities = Vec::with_capacity(items.len());
            for (index, item) in items.into_iter().enumerate() {
                match item {
                    Value::String(text) => activities.push(text),
                    other => {
                        return Err(format!(
                            "day {label:?} activity {index} should be a string, found {}",
                            value_kind(&other)
                        ))
                    }
                }
            }

            days.push(ItineraryDay { label, activities });
        }

        Ok(Self { days })
    }
}

impl Serialize for Itinerary {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.days.len()))?;
        for day in &self.days {
            map.serialize_entry(&day.label, &day.activities)?;
        }
        map.end()
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}
