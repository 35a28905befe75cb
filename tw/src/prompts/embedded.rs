//! Embedded prompts
//!
//! These are compiled into the binary from .pmt files at build time.

use tracing::debug;

/// Suggest trip types from the initial inputs
pub const TRIP_TYPES: &str = include_str!("../../prompts/trip-types.pmt");

/// Suggest cities for the confirmed trip type
pub const CITIES: &str = include_str!("../../prompts/cities.pmt");

/// Suggest attractions per selected city
pub const ATTRACTIONS: &str = include_str!("../../prompts/attractions.pmt");

/// Suggest restaurants per selected city
pub const RESTAURANTS: &str = include_str!("../../prompts/restaurants.pmt");

/// Structure the selections into a day-by-day itinerary
pub const ITINERARY: &str = include_str!("../../prompts/itinerary.pmt");

/// Rewrite an itinerary according to a free-text request
pub const ADJUST_PLAN: &str = include_str!("../../prompts/adjust-plan.pmt");

/// Every template name, in wizard order
pub const TEMPLATE_NAMES: [&str; 6] = [
    "trip-types",
    "cities",
    "attractions",
    "restaurants",
    "itinerary",
    "adjust-plan",
];

/// Get the embedded prompt by name
pub fn get_embedded(name: &str) -> Option<&'static str> {
    debug!(%name, "get_embedded: called");
    let template = match name {
        "trip-types" => TRIP_TYPES,
        "cities" => CITIES,
        "attractions" => ATTRACTIONS,
        "restaurants" => RESTAURANTS,
        "itinerary" => ITINERARY,
        "adjust-plan" => ADJUST_PLAN,
        _ => {
            debug!("get_embedded: no match found");
            return None;
        }
    };
    Some(template)
}
