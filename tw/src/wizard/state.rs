//! Session state owned by one wizard walk

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::stage::Stage;
use crate::domain::{Plan, Selections, Suggestions, TripInputs};

/// Everything one planning session knows
///
/// Which aggregates are populated depends on `stage`: each stage owns the
/// suggestions and selections it produces, and [`WizardState::clear_from`]
/// drops them when the walk goes back past it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WizardState {
    pub stage: Stage,
    pub inputs: TripInputs,
    pub selections: Selections,
    pub suggestions: Suggestions,
    pub plan: Option<Plan>,
    /// Set when InitialInput carried a concrete trip type
    pub trip_type_skipped: bool,
    /// Pending free-text adjustment request
    pub adjustment: String,
}

impl WizardState {
    pub fn new(inputs: TripInputs) -> Self {
        Self {
            stage: Stage::InitialInput,
            inputs,
            selections: Selections::default(),
            suggestions: Suggestions::default(),
            plan: None,
            trip_type_skipped: false,
            adjustment: String::new(),
        }
    }

    /// Clear every aggregate owned by `stage` or a later stage
    ///
    /// `TripInputs` are never touched; the stage field is left to the caller.
    pub fn clear_from(&mut self, stage: Stage) {
        debug!(%stage, "WizardState::clear_from: called");
        if stage <= Stage::InitialInput {
            self.trip_type_skipped = false;
        }
        if stage <= Stage::SuggestTripType {
            self.suggestions.trip_types = None;
            self.selections.trip_type = None;
        }
        if stage <= Stage::SuggestCities {
            self.suggestions.cities = None;
            self.selections.cities.clear();
        }
        if stage <= Stage::SuggestAttractions {
            self.suggestions.attractions = None;
            self.selections.attractions.clear();
        }
        if stage <= Stage::SuggestRestaurants {
            self.suggestions.restaurants = None;
            self.selections.restaurants.clear();
            self.selections.include_restaurants = false;
        }
        self.plan = None;
        self.adjustment.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::WizardConfig;
    use crate::domain::{Cached, TripTypeSuggestion};
    use chrono::NaiveDate;

    fn populated() -> WizardState {
        let inputs = TripInputs::with_defaults(&WizardConfig::default(), NaiveDate::from_ymd_opt(2026, 3, 1).unwrap());
        let mut state = WizardState::new(inputs);
        state.stage = Stage::GeneratePlan;
        state.suggestions.trip_types = Some(vec![TripTypeSuggestion {
            name: "Beach".into(),
            explanation: "Sun".into(),
        }]);
        state.suggestions.cities = Some(Cached {
            key: "Beach".into(),
            value: vec![],
        });
        state.selections.trip_type = Some("Beach".into());
        state.selections.cities = vec!["Nice".into()];
        state.selections.attractions.insert("Nice".into(), vec!["Promenade".into()]);
        state.selections.include_restaurants = true;
        state.selections.restaurants.insert("Nice".into(), vec!["Chez Pipo".into()]);
        state.plan = Some(Plan::fallback(&state.selections));
        state.adjustment = "more beach".into();
        state
    }

    #[test]
    fn test_clear_from_attractions_keeps_earlier_stages() {
        let mut state = populated();
        state.clear_from(Stage::SuggestAttractions);

        assert_eq!(state.selections.cities, vec!["Nice".to_string()]);
        assert!(state.suggestions.cities.is_some());
        assert!(state.selections.attractions.is_empty());
        assert!(state.selections.restaurants.is_empty());
        assert!(!state.selections.include_restaurants);
        assert!(state.plan.is_none());
        assert!(state.adjustment.is_empty());
    }

    #[test]
    fn test_clear_from_initial_keeps_inputs() {
        let mut state = populated();
        let inputs = state.inputs.clone();
        state.trip_type_skipped = true;

        state.clear_from(Stage::InitialInput);

        assert_eq!(state.inputs, inputs);
        assert_eq!(state.selections, Selections::default());
        assert_eq!(state.suggestions, Suggestions::default());
        assert!(!state.trip_type_skipped);
    }

    #[test]
    fn test_clear_from_plan_only_drops_plan() {
        let mut state = populated();
        state.clear_from(Stage::GeneratePlan);

        assert!(state.plan.is_none());
        assert!(state.selections.include_restaurants);
        assert_eq!(state.selections.restaurants_for("Nice"), ["Chez Pipo".to_string()]);
    }
}
