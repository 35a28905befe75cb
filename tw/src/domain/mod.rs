//! Domain types for a planning session
//!
//! Everything here is plain data owned by one wizard session:
//! - [`TripInputs`] - what the user typed on the first form
//! - [`Selections`] - choices confirmed by the user, carried forward
//! - [`Suggestions`] - the last successful model reply per stage, with its cache key
//! - [`Plan`] - the structured day-by-day itinerary (the model wire shape)

mod inputs;
mod plan;
mod selections;
mod suggestions;

pub use inputs::{TripInputs, split_list, trip_length_days};
pub use plan::{DayPlan, Plan};
pub use selections::{Selections, unique_in_order};
pub use suggestions::{
    AttractionSuggestion, Cached, CityMap, CitySuggestion, RestaurantSuggestion, Suggestions, TripTypeSuggestion,
    lookup_city,
};
