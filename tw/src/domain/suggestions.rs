//! Model suggestions and their cache keys
//!
//! The struct field names are the JSON keys the prompts ask the model for.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

/// Per-city suggestion lists, keyed by the city name the model echoed back
pub type CityMap<T> = BTreeMap<String, Vec<T>>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TripTypeSuggestion {
    pub name: String,
    pub explanation: String,
}

impl TripTypeSuggestion {
    /// Option label: `name – explanation`
    pub fn label(&self) -> String {
        format!("{} – {}", self.name, self.explanation)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CitySuggestion {
    pub city_name: String,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttractionSuggestion {
    pub attraction_name: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RestaurantSuggestion {
    pub restaurant_name: String,
    pub cuisine_type: String,
    pub price_range: String,
    pub description: String,
}

impl RestaurantSuggestion {
    /// Option detail: `(cuisine, price) – description`
    pub fn detail(&self) -> String {
        format!("({}, {}) – {}", self.cuisine_type, self.price_range, self.description)
    }
}

/// A reply remembered together with the input it was requested for
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cached<K, V> {
    pub key: K,
    pub value: V,
}

impl<K: PartialEq, V> Cached<K, V> {
    /// The cached value, if it was requested for `key`
    pub fn get(&self, key: &K) -> Option<&V> {
        (self.key == *key).then_some(&self.value)
    }
}

/// Last successful model reply for each suggestion stage
///
/// `None` means "not fetched for the current walk"; an empty list is a
/// fetched-but-empty reply.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Suggestions {
    pub trip_types: Option<Vec<TripTypeSuggestion>>,
    /// Keyed by the selected trip type
    pub cities: Option<Cached<String, Vec<CitySuggestion>>>,
    /// Keyed by the set of selected cities
    pub attractions: Option<Cached<BTreeSet<String>, CityMap<AttractionSuggestion>>>,
    /// Keyed by the set of selected cities
    pub restaurants: Option<Cached<BTreeSet<String>, CityMap<RestaurantSuggestion>>>,
}

/// Entries for `city`: exact key first, then a case-insensitive match
pub fn lookup_city<'a, T>(map: &'a CityMap<T>, city: &str) -> &'a [T] {
    if let Some(items) = map.get(city) {
        return items;
    }
    let wanted = city.trim().to_lowercase();
    map.iter()
        .find(|(name, _)| name.trim().to_lowercase() == wanted)
        .map(|(_, items)| items.as_slice())
        .unwrap_or(&[])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trip_type_label() {
        let suggestion = TripTypeSuggestion {
            name: "City Break".into(),
            explanation: "Short and busy.".into(),
        };
        assert_eq!(suggestion.label(), "City Break – Short and busy.");
    }

    #[test]
    fn test_cached_get_checks_key() {
        let cached = Cached {
            key: BTreeSet::from(["Paris".to_string()]),
            value: 42,
        };
        assert_eq!(cached.get(&BTreeSet::from(["Paris".to_string()])), Some(&42));
        assert_eq!(cached.get(&BTreeSet::from(["Rome".to_string()])), None);
    }

    #[test]
    fn test_lookup_city_case_insensitive() {
        let mut map: CityMap<u8> = BTreeMap::new();
        map.insert("new york".into(), vec![1, 2]);

        assert_eq!(lookup_city(&map, "New York"), &[1, 2]);
        assert!(lookup_city(&map, "Boston").is_empty());
    }

    #[test]
    fn test_deserialize_restaurant_shape() {
        let json = r#"{"restaurant_name": "Da Enzo", "cuisine_type": "Roman", "price_range": "$$", "description": "Cozy."}"#;
        let restaurant: RestaurantSuggestion = serde_json::from_str(json).unwrap();
        assert_eq!(restaurant.detail(), "(Roman, $$) – Cozy.");

        let missing = r#"{"restaurant_name": "Da Enzo"}"#;
        assert!(serde_json::from_str::<RestaurantSuggestion>(missing).is_err());
    }
}
