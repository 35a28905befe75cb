//! Structured edits sent by the presentation layer

use chrono::NaiveDate;

use super::error::WizardError;

/// One field change
///
/// The first group edits [`TripInputs`](crate::domain::TripInputs) and is only
/// accepted at InitialInput; the rest are selections for the stage that owns them.
#[derive(Debug, Clone, PartialEq)]
pub enum Edit {
    StartDestination(String),
    Budget(f64),
    StartDate(NaiveDate),
    EndDate(NaiveDate),
    Adults(u32),
    Children(u32),
    TripTypeDescription(String),
    InitialCities(String),
    InitialAttractions(String),

    /// Exact name of a suggested trip type
    ChooseTripType(String),
    /// Replaces the city selection; order is kept
    SelectCities(Vec<String>),
    SelectAttractions { city: String, attractions: Vec<String> },
    IncludeRestaurants(bool),
    SelectRestaurants { city: String, restaurants: Vec<String> },
    /// Free-text plan adjustment request
    Adjustment(String),
}

/// Keys accepted by [`Edit::from_field`], with their labels
pub const INPUT_FIELDS: [(&str, &str); 9] = [
    ("destination", "Starting destination"),
    ("budget", "Budget"),
    ("start", "Trip start date"),
    ("end", "Trip end date"),
    ("adults", "Number of adults"),
    ("children", "Number of children"),
    ("trip-type", "Ideal type of trip"),
    ("cities", "Cities you want to visit"),
    ("attractions", "Attractions you want to visit"),
];

impl Edit {
    /// Parse a `key=value` form edit for the InitialInput stage
    pub fn from_field(key: &str, value: &str) -> Result<Self, WizardError> {
        let value = value.trim();
        let edit = match key.trim().to_lowercase().as_str() {
            "destination" => Edit::StartDestination(value.to_string()),
            "budget" => Edit::Budget(
                value
                    .parse()
                    .map_err(|_| WizardError::invalid(format!("Budget must be a number, got '{}'", value)))?,
            ),
            "start" => Edit::StartDate(parse_date(value)?),
            "end" => Edit::EndDate(parse_date(value)?),
            "adults" => Edit::Adults(parse_count("adults", value)?),
            "children" => Edit::Children(parse_count("children", value)?),
            "trip-type" => Edit::TripTypeDescription(value.to_string()),
            "cities" => Edit::InitialCities(value.to_string()),
            "attractions" => Edit::InitialAttractions(value.to_string()),
            other => {
                let known: Vec<&str> = INPUT_FIELDS.iter().map(|(k, _)| *k).collect();
                return Err(WizardError::invalid(format!(
                    "Unknown field '{}'. Fields: {}",
                    other,
                    known.join(", ")
                )));
            }
        };
        Ok(edit)
    }
}

fn parse_date(value: &str) -> Result<NaiveDate, WizardError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| WizardError::invalid(format!("Dates use YYYY-MM-DD, got '{}'", value)))
}

fn parse_count(name: &str, value: &str) -> Result<u32, WizardError> {
    value
        .parse()
        .map_err(|_| WizardError::invalid(format!("Number of {} must be a whole number, got '{}'", name, value)))
}
