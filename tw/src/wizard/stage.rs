//! Wizard stages

use std::fmt;

use serde::{Deserialize, Serialize};

/// One step of the wizard, in walk order
///
/// `Ord` follows the walk, so "this stage and every later one" is `>=`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    #[default]
    InitialInput,
    SuggestTripType,
    SuggestCities,
    SuggestAttractions,
    SuggestRestaurants,
    GeneratePlan,
}

impl Stage {
    pub const ALL: [Stage; 6] = [
        Stage::InitialInput,
        Stage::SuggestTripType,
        Stage::SuggestCities,
        Stage::SuggestAttractions,
        Stage::SuggestRestaurants,
        Stage::GeneratePlan,
    ];

    /// Heading shown above the stage's form
    pub fn title(&self) -> &'static str {
        match self {
            Stage::InitialInput => "Tell us about your dream trip",
            Stage::SuggestTripType => "Suggested trip types",
            Stage::SuggestCities => "Suggested cities to visit",
            Stage::SuggestAttractions => "Suggested attractions",
            Stage::SuggestRestaurants => "Restaurant suggestions (optional)",
            Stage::GeneratePlan => "Your travel plan",
        }
    }

    /// 1-based position in the walk
    pub fn number(&self) -> usize {
        Stage::ALL.iter().position(|s| s == self).map(|i| i + 1).unwrap_or(0)
    }

    /// Whether entering this stage may call the model
    pub fn uses_model(&self) -> bool {
        !matches!(self, Stage::InitialInput)
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::InitialInput => "initial_input",
            Stage::SuggestTripType => "suggest_trip_type",
            Stage::SuggestCities => "suggest_cities",
            Stage::SuggestAttractions => "suggest_attractions",
            Stage::SuggestRestaurants => "suggest_restaurants",
            Stage::GeneratePlan => "generate_plan",
        };
        write!(f, "{}", name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_follows_walk() {
        assert!(Stage::InitialInput < Stage::SuggestTripType);
        assert!(Stage::SuggestRestaurants < Stage::GeneratePlan);
        assert!(Stage::ALL.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_number_and_display() {
        assert_eq!(Stage::InitialInput.number(), 1);
        assert_eq!(Stage::GeneratePlan.number(), 6);
        assert_eq!(Stage::SuggestCities.to_string(), "suggest_cities");
        assert_eq!(serde_json::to_string(&Stage::SuggestCities).unwrap(), "\"suggest_cities\"");
    }
}
