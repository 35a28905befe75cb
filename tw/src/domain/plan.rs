//! The structured itinerary
//!
//! `Plan` is the exact JSON shape exchanged with the model: the itinerary
//! prompt asks for it and the adjustment prompt sends it back verbatim.

use serde::{Deserialize, Deserializer, Serialize};
use tracing::debug;

use super::selections::Selections;

/// Day-by-day itinerary plus an overall note
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plan {
    #[serde(default)]
    pub general_notes: String,
    pub itinerary_days: Vec<DayPlan>,
}

/// One itinerary entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayPlan {
    /// Free-form label such as "Day 1"; numbers from the model are accepted
    #[serde(deserialize_with = "string_or_number")]
    pub day_number: String,
    pub location: String,
    pub morning_activity: String,
    pub afternoon_activity: String,
    pub evening_meal: String,
    #[serde(default)]
    pub notes: String,
}

impl Plan {
    /// Summary built from the selections alone, used when structuring fails
    ///
    /// One entry per selected city, in selection order.
    pub fn fallback(selections: &Selections) -> Self {
        debug!(cities = selections.cities.len(), "Plan::fallback: called");
        let itinerary_days: Vec<DayPlan> = selections
            .cities
            .iter()
            .map(|city| {
                let attractions = selections.attractions_for(city);
                let morning = if attractions.is_empty() {
                    "Explore attractions: Not specified".to_string()
                } else {
                    format!("Explore attractions: {}", attractions.join(", "))
                };

                let restaurants = selections.restaurants_for(city);
                let evening = if selections.include_restaurants && !restaurants.is_empty() {
                    format!("Try local restaurants: {}", restaurants.join(", "))
                } else {
                    "Try local restaurants".to_string()
                };

                DayPlan {
                    day_number: format!("Focus on {}", city),
                    location: city.clone(),
                    morning_activity: morning,
                    afternoon_activity: "Further exploration or leisure".to_string(),
                    evening_meal: evening,
                    notes: "This is a basic outline. Adjust as needed.".to_string(),
                }
            })
            .collect();

        let general_notes = if itinerary_days.is_empty() {
            "No items selected to display in the plan."
        } else {
            "AI structuring failed. Here's a summary of your selections:"
        };

        Self {
            general_notes: general_notes.to_string(),
            itinerary_days,
        }
    }

    /// Serialize in the wire shape for the adjustment prompt
    pub fn to_wire_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Label {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(match Label::deserialize(deserializer)? {
        Label::Text(text) => text,
        Label::Number(n) => format!("Day {}", n),
    })
}
