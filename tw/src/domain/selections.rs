//! User-confirmed choices

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

/// Choices the user confirmed, carried into later stages
///
/// City lists keep selection order. Per-city maps are keyed by city name;
/// callers iterate them in `cities` order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Selections {
    pub trip_type: Option<String>,
    pub cities: Vec<String>,
    pub attractions: BTreeMap<String, Vec<String>>,
    pub include_restaurants: bool,
    pub restaurants: BTreeMap<String, Vec<String>>,
}

impl Selections {
    /// Attractions chosen for `city`
    pub fn attractions_for(&self, city: &str) -> &[String] {
        self.attractions.get(city).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Restaurants chosen for `city`
    pub fn restaurants_for(&self, city: &str) -> &[String] {
        self.restaurants.get(city).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Total attractions chosen across the currently selected cities
    pub fn attraction_count(&self) -> usize {
        self.cities.iter().map(|city| self.attractions_for(city).len()).sum()
    }

    /// Drop per-city entries for cities no longer selected
    pub fn retain_selected_cities(&mut self) {
        let selected: HashSet<&String> = self.cities.iter().collect();
        self.attractions.retain(|city, _| selected.contains(city));
        self.restaurants.retain(|city, _| selected.contains(city));
    }
}

/// Remove repeats, keeping the first occurrence of each item
pub fn unique_in_order<I>(items: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let mut seen = HashSet::new();
    items.into_iter().filter(|item| seen.insert(item.clone())).collect()
}
