//! Trip constraints entered on the first form

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::selections::unique_in_order;
use crate::config::WizardConfig;

/// Constraints for the trip
///
/// Only the InitialInput stage edits these.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripInputs {
    pub start_destination: String,
    pub budget: f64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub adults: u32,
    pub children: u32,
    /// Free text; equal to the configured placeholder when not yet specified
    pub trip_type_description: String,
    /// Comma-separated cities the user already wants to visit
    pub initial_cities: String,
    /// Comma-separated attractions the user already wants to visit
    pub initial_attractions: String,
}

impl TripInputs {
    /// Prefilled form values
    pub fn with_defaults(settings: &WizardConfig, today: NaiveDate) -> Self {
        debug!(%today, "TripInputs::with_defaults: called");
        let end_date = today
            .checked_add_days(Days::new(u64::from(settings.default_trip_days)))
            .unwrap_or(today);

        Self {
            start_destination: settings.default_start_destination.clone(),
            budget: settings.default_budget,
            start_date: today,
            end_date,
            adults: 1,
            children: 0,
            trip_type_description: settings.trip_type_placeholder.clone(),
            initial_cities: String::new(),
            initial_attractions: String::new(),
        }
    }

    /// Trip length in days, 0 for an inverted range
    pub fn trip_length(&self) -> u32 {
        trip_length_days(self.start_date, self.end_date)
    }

    /// Whether the user described a trip type of their own
    pub fn has_concrete_trip_type(&self, placeholder: &str) -> bool {
        let description = self.trip_type_description.trim();
        !description.is_empty() && description != placeholder.trim()
    }

    pub fn initial_city_list(&self) -> Vec<String> {
        split_list(&self.initial_cities)
    }

    pub fn initial_attraction_list(&self) -> Vec<String> {
        split_list(&self.initial_attractions)
    }
}

/// `(end - start).days + 1`, or 0 when `start > end`
pub fn trip_length_days(start: NaiveDate, end: NaiveDate) -> u32 {
    if start > end {
        return 0;
    }
    let days = (end - start).num_days() + 1;
    u32::try_from(days).unwrap_or(u32::MAX)
}

/// Split a comma-separated list, trimming entries and dropping blanks and repeats
pub fn split_list(text: &str) -> Vec<String> {
    unique_in_order(
        text.split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_trip_length_same_day() {
        assert_eq!(trip_length_days(date(2026, 5, 1), date(2026, 5, 1)), 1);
    }

    #[test]
    fn test_trip_length_week() {
        assert_eq!(trip_length_days(date(2026, 5, 1), date(2026, 5, 7)), 7);
    }

    #[test]
    fn test_trip_length_inverted_is_zero() {
        assert_eq!(trip_length_days(date(2026, 5, 7), date(2026, 5, 1)), 0);
    }

    #[test]
    fn test_trip_length_across_leap_day() {
        assert_eq!(trip_length_days(date(2028, 2, 28), date(2028, 3, 1)), 3);
    }

    #[test]
    fn test_split_list() {
        assert_eq!(split_list(" Paris, Rome ,,Paris, "), vec!["Paris", "Rome"]);
        assert!(split_list("").is_empty());
        assert!(split_list(" , ").is_empty());
    }

    #[test]
    fn test_with_defaults() {
        let settings = WizardConfig::default();
        let inputs = TripInputs::with_defaults(&settings, date(2026, 10, 18));

        assert_eq!(inputs.start_destination, "London, UK");
        assert_eq!(inputs.end_date, date(2026, 10, 25));
        assert_eq!(inputs.adults, 1);
        assert_eq!(inputs.children, 0);
        assert!(!inputs.has_concrete_trip_type(&settings.trip_type_placeholder));
    }

    #[test]
    fn test_has_concrete_trip_type() {
        let settings = WizardConfig::default();
        let mut inputs = TripInputs::with_defaults(&settings, date(2026, 1, 1));

        inputs.trip_type_description = "   ".to_string();
        assert!(!inputs.has_concrete_trip_type(&settings.trip_type_placeholder));

        inputs.trip_type_description = "Food tour".to_string();
        assert!(inputs.has_concrete_trip_type(&settings.trip_type_placeholder));
    }

    proptest! {
        #[test]
        fn prop_trip_length_matches_day_difference(start in 0i64..20_000, span in -400i64..400) {
            let base = date(1990, 1, 1);
            let start = base + chrono::Duration::days(start);
            let end = start + chrono::Duration::days(span);
            let expected = if span < 0 { 0 } else { (span + 1) as u32 };
            prop_assert_eq!(trip_length_days(start, end), expected);
        }

        #[test]
        fn prop_split_list_has_no_blanks_or_repeats(parts in proptest::collection::vec("[ a-c]{0,3}", 0..8)) {
            let list = split_list(&parts.join(","));
            let mut seen = std::collections::HashSet::new();
            for item in &list {
                prop_assert!(!item.is_empty());
                prop_assert_eq!(item.trim(), item.as_str());
                prop_assert!(seen.insert(item.clone()));
            }
        }
    }
}
