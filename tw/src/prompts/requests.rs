//! Typed request records, one per template
//!
//! A record's fields are exactly the template's slots; its `Reply` is the JSON
//! shape the template asks the model for.

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::domain::{
    AttractionSuggestion, CityMap, CitySuggestion, Plan, RestaurantSuggestion, Selections, TripInputs,
    TripTypeSuggestion,
};

/// A request that renders through a named template
pub trait PromptRequest: Serialize {
    /// Template name (without .pmt extension)
    const TEMPLATE: &'static str;

    /// Shape the model must reply with
    type Reply: DeserializeOwned;
}

/// Substituted for an empty or placeholder trip-type description
const ANY_TRIP_TYPE: &str = "any";

/// Substituted for an empty initial city or attraction list
const NONE_GIVEN: &str = "None";

fn budget_label(inputs: &TripInputs, currency: &str) -> String {
    format!("{} {}", inputs.budget, currency)
}

fn or_none(text: &str) -> String {
    let text = text.trim();
    if text.is_empty() { NONE_GIVEN.to_string() } else { text.to_string() }
}

fn trip_type(selections: &Selections) -> String {
    selections.trip_type.clone().unwrap_or_else(|| ANY_TRIP_TYPE.to_string())
}

fn cities_json(selections: &Selections) -> String {
    serde_json::to_string(&selections.cities).unwrap_or_else(|_| "[]".to_string())
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TripTypeRequest {
    pub budget: String,
    pub start_date: String,
    pub end_date: String,
    pub adults: u32,
    pub children: u32,
    pub trip_idea: String,
    pub start_dest: String,
}

impl TripTypeRequest {
    pub fn new(inputs: &TripInputs, placeholder: &str, currency: &str) -> Self {
        debug!("TripTypeRequest::new: called");
        let trip_idea = if inputs.has_concrete_trip_type(placeholder) {
            inputs.trip_type_description.trim().to_string()
        } else {
            ANY_TRIP_TYPE.to_string()
        };

        Self {
            budget: budget_label(inputs, currency),
            start_date: inputs.start_date.to_string(),
            end_date: inputs.end_date.to_string(),
            adults: inputs.adults,
            children: inputs.children,
            trip_idea,
            start_dest: inputs.start_destination.clone(),
        }
    }
}

impl PromptRequest for TripTypeRequest {
    const TEMPLATE: &'static str = "trip-types";
    type Reply = Vec<TripTypeSuggestion>;
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CitiesRequest {
    pub budget: String,
    pub start_date: String,
    pub end_date: String,
    pub adults: u32,
    pub children: u32,
    pub start_dest: String,
    pub selected_trip_type: String,
    pub initial_cities: String,
}

impl CitiesRequest {
    pub fn new(inputs: &TripInputs, selections: &Selections, currency: &str) -> Self {
        debug!("CitiesRequest::new: called");
        Self {
            budget: budget_label(inputs, currency),
            start_date: inputs.start_date.to_string(),
            end_date: inputs.end_date.to_string(),
            adults: inputs.adults,
            children: inputs.children,
            start_dest: inputs.start_destination.clone(),
            selected_trip_type: trip_type(selections),
            initial_cities: or_none(&inputs.initial_cities),
        }
    }
}

impl PromptRequest for CitiesRequest {
    const TEMPLATE: &'static str = "cities";
    type Reply = Vec<CitySuggestion>;
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttractionsRequest {
    pub selected_trip_type: String,
    /// JSON array of city names
    pub selected_cities_list: String,
    pub adults: u32,
    pub children: u32,
    pub initial_attractions: String,
}

impl AttractionsRequest {
    pub fn new(inputs: &TripInputs, selections: &Selections) -> Self {
        debug!(cities = selections.cities.len(), "AttractionsRequest::new: called");
        Self {
            selected_trip_type: trip_type(selections),
            selected_cities_list: cities_json(selections),
            adults: inputs.adults,
            children: inputs.children,
            initial_attractions: or_none(&inputs.initial_attractions),
        }
    }
}

impl PromptRequest for AttractionsRequest {
    const TEMPLATE: &'static str = "attractions";
    type Reply = CityMap<AttractionSuggestion>;
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RestaurantsRequest {
    /// JSON array of city names
    pub selected_cities_list: String,
    pub selected_trip_type: String,
    pub budget: String,
    pub adults: u32,
    pub children: u32,
}

impl RestaurantsRequest {
    pub fn new(inputs: &TripInputs, selections: &Selections, currency: &str) -> Self {
        debug!(cities = selections.cities.len(), "RestaurantsRequest::new: called");
        Self {
            selected_cities_list: cities_json(selections),
            selected_trip_type: trip_type(selections),
            budget: budget_label(inputs, currency),
            adults: inputs.adults,
            children: inputs.children,
        }
    }
}

impl PromptRequest for RestaurantsRequest {
    const TEMPLATE: &'static str = "restaurants";
    type Reply = CityMap<RestaurantSuggestion>;
}

/// A user-chosen item as the itinerary prompt presents it
#[derive(Serialize)]
struct ChosenAttraction<'a> {
    attraction_name: &'a str,
    description: &'static str,
}

#[derive(Serialize)]
struct ChosenRestaurant<'a> {
    restaurant_name: &'a str,
    description: &'static str,
}

const USER_SELECTED: &str = "User selected";

/// Per-city data serialized as a JSON object in selection order
struct CityEntries<'a, T>(Vec<(&'a str, Vec<T>)>);

impl<T: Serialize> Serialize for CityEntries<'_, T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (city, items) in &self.0 {
            map.serialize_entry(city, items)?;
        }
        map.end()
    }
}

impl<T: Serialize> CityEntries<'_, T> {
    fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItineraryRequest {
    pub num_days: u32,
    pub start_date: String,
    pub end_date: String,
    /// JSON array of city names
    pub selected_cities_list: String,
    /// JSON object: city -> chosen attractions
    pub attractions_data: String,
    /// JSON object: city -> chosen restaurants; empty object when excluded
    pub restaurants_data: String,
    pub selected_trip_type: String,
    pub adults: u32,
    pub children: u32,
}

impl ItineraryRequest {
    /// Cities with nothing chosen are left out of the per-city data
    pub fn new(inputs: &TripInputs, selections: &Selections) -> Self {
        debug!(cities = selections.cities.len(), "ItineraryRequest::new: called");
        let mut attractions: CityEntries<'_, ChosenAttraction<'_>> = CityEntries(Vec::new());
        let mut restaurants: CityEntries<'_, ChosenRestaurant<'_>> = CityEntries(Vec::new());

        for city in &selections.cities {
            let chosen: Vec<ChosenAttraction<'_>> = selections
                .attractions_for(city)
                .iter()
                .map(|name| ChosenAttraction {
                    attraction_name: name,
                    description: USER_SELECTED,
                })
                .collect();
            if !chosen.is_empty() {
                attractions.0.push((city.as_str(), chosen));
            }

            if selections.include_restaurants {
                let chosen: Vec<ChosenRestaurant<'_>> = selections
                    .restaurants_for(city)
                    .iter()
                    .map(|name| ChosenRestaurant {
                        restaurant_name: name,
                        description: USER_SELECTED,
                    })
                    .collect();
                if !chosen.is_empty() {
                    restaurants.0.push((city.as_str(), chosen));
                }
            }
        }

        Self {
            num_days: inputs.trip_length(),
            start_date: inputs.start_date.to_string(),
            end_date: inputs.end_date.to_string(),
            selected_cities_list: cities_json(selections),
            attractions_data: attractions.to_json(),
            restaurants_data: restaurants.to_json(),
            selected_trip_type: trip_type(selections),
            adults: inputs.adults,
            children: inputs.children,
        }
    }
}

impl PromptRequest for ItineraryRequest {
    const TEMPLATE: &'static str = "itinerary";
    type Reply = Plan;
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AdjustPlanRequest {
    /// The plan in its wire shape
    pub current_plan_json: String,
    pub user_request: String,
}

impl AdjustPlanRequest {
    pub fn new(plan: &Plan, user_request: &str) -> serde_json::Result<Self> {
        debug!(days = plan.itinerary_days.len(), "AdjustPlanRequest::new: called");
        Ok(Self {
            current_plan_json: plan.to_wire_json()?,
            user_request: user_request.trim().to_string(),
        })
    }
}

impl PromptRequest for AdjustPlanRequest {
    const TEMPLATE: &'static str = "adjust-plan";
    type Reply = Plan;
}
