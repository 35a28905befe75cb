//! The wizard state machine

use std::collections::BTreeSet;

use chrono::NaiveDate;
use tracing::{debug, info, warn};

use super::edit::Edit;
use super::error::WizardError;
use super::stage::Stage;
use super::state::WizardState;
use super::view::StageView;
use crate::config::WizardConfig;
use crate::domain::{
    AttractionSuggestion, Cached, CitySuggestion, Plan, RestaurantSuggestion, TripInputs, TripTypeSuggestion,
    lookup_city, unique_in_order,
};
use crate::model::ModelClient;
use crate::prompts::{
    AdjustPlanRequest, AttractionsRequest, CitiesRequest, ItineraryRequest, PromptLoader, PromptRequest,
    RestaurantsRequest, TripTypeRequest,
};

/// Result of preparing the current stage's model data
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StageStatus {
    /// Nothing to fetch, or the cached reply still matches its inputs
    Ready,
    /// A fresh reply was fetched and stored
    Fetched,
    /// Itinerary structuring failed; the plan was built from the selections
    FallbackPlan { reason: String },
}

/// Drives one planning session
///
/// The presentation layer sends [`Edit`]s and navigation signals, calls
/// [`Wizard::prepare`] after every stage change, and renders [`Wizard::view`].
/// At most one model call happens per call into the wizard. A failed call
/// leaves the state exactly as it was.
pub struct Wizard {
    state: WizardState,
    model: ModelClient,
    prompts: PromptLoader,
    settings: WizardConfig,
}

impl Wizard {
    /// Fresh session with the form prefilled from `settings`
    pub fn new(model: ModelClient, prompts: PromptLoader, settings: WizardConfig, today: NaiveDate) -> Self {
        debug!(%today, model = %model.name(), "Wizard::new: called");
        let state = WizardState::new(TripInputs::with_defaults(&settings, today));
        Self::with_state(model, prompts, settings, state)
    }

    pub fn with_state(model: ModelClient, prompts: PromptLoader, settings: WizardConfig, state: WizardState) -> Self {
        Self {
            state,
            model,
            prompts,
            settings,
        }
    }

    pub fn state(&self) -> &WizardState {
        &self.state
    }

    pub fn stage(&self) -> Stage {
        self.state.stage
    }

    pub fn settings(&self) -> &WizardConfig {
        &self.settings
    }

    pub fn model(&self) -> &ModelClient {
        &self.model
    }

    /// Trip length in days; 0 when the dates are inverted
    pub fn trip_length(&self) -> u32 {
        self.state.inputs.trip_length()
    }

    /// What the presentation layer should render
    pub fn view(&self) -> StageView {
        StageView::build(self)
    }

    /// The whole state as pretty JSON, for debugging
    pub fn state_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&self.state)
    }

    // ---- edits ----

    /// Apply one form edit belonging to the current stage
    pub fn apply_edit(&mut self, edit: Edit) -> Result<(), WizardError> {
        debug!(stage = %self.state.stage, ?edit, "Wizard::apply_edit: called");
        match edit {
            Edit::StartDestination(value) => {
                self.require_stage(Stage::InitialInput, "the starting destination")?;
                self.state.inputs.start_destination = value.trim().to_string();
            }
            Edit::Budget(value) => {
                self.require_stage(Stage::InitialInput, "the budget")?;
                if !value.is_finite() || value < 0.0 {
                    return Err(WizardError::invalid("Budget must be zero or more."));
                }
                self.state.inputs.budget = value;
            }
            Edit::StartDate(date) => {
                self.require_stage(Stage::InitialInput, "the start date")?;
                self.state.inputs.start_date = date;
            }
            Edit::EndDate(date) => {
                self.require_stage(Stage::InitialInput, "the end date")?;
                self.state.inputs.end_date = date;
            }
            Edit::Adults(count) => {
                self.require_stage(Stage::InitialInput, "the number of adults")?;
                if count == 0 {
                    return Err(WizardError::invalid("At least one adult must travel."));
                }
                self.state.inputs.adults = count;
            }
            Edit::Children(count) => {
                self.require_stage(Stage::InitialInput, "the number of children")?;
                self.state.inputs.children = count;
            }
            Edit::TripTypeDescription(text) => {
                self.require_stage(Stage::InitialInput, "the trip type")?;
                self.state.inputs.trip_type_description = text;
            }
            Edit::InitialCities(text) => {
                self.require_stage(Stage::InitialInput, "the initial cities")?;
                self.state.inputs.initial_cities = text;
            }
            Edit::InitialAttractions(text) => {
                self.require_stage(Stage::InitialInput, "the initial attractions")?;
                self.state.inputs.initial_attractions = text;
            }
            Edit::ChooseTripType(name) => {
                self.require_stage(Stage::SuggestTripType, "the trip type choice")?;
                let name = name.trim();
                if !self.trip_type_options().iter().any(|t| t.name == name) {
                    return Err(WizardError::invalid(format!("'{}' is not one of the suggested trip types.", name)));
                }
                self.state.selections.trip_type = Some(name.to_string());
            }
            Edit::SelectCities(cities) => {
                self.require_stage(Stage::SuggestCities, "the city selection")?;
                let cities = checked_choices(cities, &self.city_options(), "city")?;
                self.state.selections.cities = cities;
                self.state.selections.retain_selected_cities();
            }
            Edit::SelectAttractions { city, attractions } => {
                self.require_stage(Stage::SuggestAttractions, "the attraction selection")?;
                let city = self.selected_city(&city)?;
                let attractions = checked_choices(attractions, &self.attraction_options(&city), "attraction")?;
                self.state.selections.attractions.insert(city, attractions);
            }
            Edit::IncludeRestaurants(include) => {
                self.require_stage(Stage::SuggestRestaurants, "restaurant inclusion")?;
                self.state.selections.include_restaurants = include;
            }
            Edit::SelectRestaurants { city, restaurants } => {
                self.require_stage(Stage::SuggestRestaurants, "the restaurant selection")?;
                if !self.state.selections.include_restaurants {
                    return Err(WizardError::invalid("Turn on restaurant suggestions first."));
                }
                let city = self.selected_city(&city)?;
                let restaurants = checked_choices(restaurants, &self.restaurant_options(&city), "restaurant")?;
                self.state.selections.restaurants.insert(city, restaurants);
            }
            Edit::Adjustment(text) => {
                self.require_stage(Stage::GeneratePlan, "the adjustment request")?;
                self.state.adjustment = text;
            }
        }
        Ok(())
    }

    fn require_stage(&self, stage: Stage, what: &str) -> Result<(), WizardError> {
        if self.state.stage == stage {
            Ok(())
        } else {
            Err(WizardError::invalid(format!(
                "{} can only be changed at step {} ({}).",
                capitalize(what),
                stage.number(),
                stage.title()
            )))
        }
    }

    fn selected_city(&self, city: &str) -> Result<String, WizardError> {
        let wanted = city.trim();
        self.state
            .selections
            .cities
            .iter()
            .find(|c| c.as_str() == wanted || c.eq_ignore_ascii_case(wanted))
            .cloned()
            .ok_or_else(|| WizardError::invalid(format!("'{}' is not a selected city.", wanted)))
    }

    // ---- navigation ----

    /// Where [`Wizard::advance`] would go, or why it cannot
    pub fn next_stage(&self) -> Result<Stage, WizardError> {
        let inputs = &self.state.inputs;
        let selections = &self.state.selections;
        match self.state.stage {
            Stage::InitialInput => {
                if inputs.start_destination.trim().is_empty() {
                    return Err(WizardError::invalid("Please enter a starting destination."));
                }
                if inputs.start_date > inputs.end_date {
                    return Err(WizardError::invalid(
                        "Trip end date must be after or the same as the start date.",
                    ));
                }
                if inputs.has_concrete_trip_type(&self.settings.trip_type_placeholder) {
                    Ok(Stage::SuggestCities)
                } else {
                    Ok(Stage::SuggestTripType)
                }
            }
            Stage::SuggestTripType => {
                let options = self.trip_type_options();
                if options.is_empty() {
                    return Err(WizardError::invalid(
                        "No trip type suggestions yet. Use /retry, or go back and describe your own trip type.",
                    ));
                }
                match &selections.trip_type {
                    Some(name) if options.iter().any(|t| &t.name == name) => Ok(Stage::SuggestCities),
                    _ => Err(WizardError::invalid("Please choose a trip type.")),
                }
            }
            Stage::SuggestCities => {
                if selections.cities.is_empty() {
                    Err(WizardError::invalid("Please select at least one city to proceed."))
                } else {
                    Ok(Stage::SuggestAttractions)
                }
            }
            Stage::SuggestAttractions => {
                if selections.attraction_count() > 0 || !self.has_attraction_options() {
                    Ok(Stage::SuggestRestaurants)
                } else {
                    Err(WizardError::invalid("Please select at least one attraction overall."))
                }
            }
            Stage::SuggestRestaurants => Ok(Stage::GeneratePlan),
            Stage::GeneratePlan => Err(WizardError::invalid(
                "This is the last stage. Adjust the plan, go back, or start over.",
            )),
        }
    }

    /// Move forward one stage
    ///
    /// Does not call the model; call [`Wizard::prepare`] afterwards.
    pub fn advance(&mut self) -> Result<Stage, WizardError> {
        let from = self.state.stage;
        let to = self.next_stage()?;
        debug!(%from, %to, "Wizard::advance: called");

        match from {
            Stage::InitialInput => {
                self.state.clear_from(Stage::SuggestTripType);
                if to == Stage::SuggestCities {
                    let trip_type = self.state.inputs.trip_type_description.trim().to_string();
                    info!(%trip_type, "Using the trip type from the initial inputs");
                    self.state.selections.trip_type = Some(trip_type);
                    self.state.trip_type_skipped = true;
                }
            }
            Stage::SuggestCities => self.state.selections.retain_selected_cities(),
            Stage::SuggestRestaurants => {
                self.state.plan = None;
                self.state.adjustment.clear();
            }
            _ => {}
        }

        self.state.stage = to;
        info!(%from, %to, "Stage transition");
        Ok(to)
    }

    /// Where [`Wizard::go_back`] would go
    pub fn back_target(&self) -> Option<Stage> {
        match self.state.stage {
            Stage::InitialInput => None,
            Stage::SuggestTripType => Some(Stage::InitialInput),
            Stage::SuggestCities if self.state.trip_type_skipped => Some(Stage::InitialInput),
            Stage::SuggestCities => Some(Stage::SuggestTripType),
            Stage::SuggestAttractions => Some(Stage::SuggestCities),
            Stage::SuggestRestaurants => Some(Stage::SuggestAttractions),
            Stage::GeneratePlan => Some(Stage::SuggestRestaurants),
        }
    }

    /// Move back one stage, clearing everything the target and later stages own
    ///
    /// Going back to InitialInput keeps the typed inputs.
    pub fn go_back(&mut self) -> Result<Stage, WizardError> {
        let from = self.state.stage;
        let to = self
            .back_target()
            .ok_or_else(|| WizardError::invalid("Already at the first stage."))?;

        self.state.clear_from(to);
        self.state.stage = to;
        info!(%from, %to, "Stage transition (back)");
        Ok(to)
    }

    /// Discard the whole session, inputs included
    pub fn start_over(&mut self, today: NaiveDate) {
        info!("Starting over");
        self.state = WizardState::new(TripInputs::with_defaults(&self.settings, today));
    }

    // ---- model-backed stages ----

    /// Make sure the current stage has its model data
    ///
    /// Fetches only when nothing is cached for the current inputs. On
    /// GeneratePlan a structuring failure degrades to a fallback plan.
    pub async fn prepare(&mut self) -> Result<StageStatus, WizardError> {
        debug!(stage = %self.state.stage, "Wizard::prepare: called");
        self.prepare_stage(false).await
    }

    /// Repeat the current stage's model request
    ///
    /// The previous reply stays in place unless the new one succeeds.
    pub async fn retry(&mut self) -> Result<StageStatus, WizardError> {
        debug!(stage = %self.state.stage, "Wizard::retry: called");
        if !self.state.stage.uses_model() {
            return Err(WizardError::invalid("Nothing to retry at this stage."));
        }
        self.prepare_stage(true).await
    }

    async fn prepare_stage(&mut self, force: bool) -> Result<StageStatus, WizardError> {
        match self.state.stage {
            Stage::InitialInput => Ok(StageStatus::Ready),
            Stage::SuggestTripType => self.load_trip_types(force).await,
            Stage::SuggestCities => self.load_cities(force).await,
            Stage::SuggestAttractions => self.load_attractions(force).await,
            Stage::SuggestRestaurants => self.load_restaurants(force).await,
            Stage::GeneratePlan => self.load_plan(force).await,
        }
    }

    async fn request<R: PromptRequest>(&self, request: &R) -> Result<R::Reply, WizardError> {
        let prompt = self.prompts.render_request(request)?;
        info!(template = R::TEMPLATE, "Requesting from model");
        Ok(self.model.invoke_json::<R::Reply>(&prompt).await?)
    }

    async fn load_trip_types(&mut self, force: bool) -> Result<StageStatus, WizardError> {
        if !force && self.state.suggestions.trip_types.is_some() {
            self.select_default_trip_type();
            return Ok(StageStatus::Ready);
        }

        let request = TripTypeRequest::new(
            &self.state.inputs,
            &self.settings.trip_type_placeholder,
            &self.settings.currency,
        );
        let trip_types = self.request(&request).await?;
        if trip_types.is_empty() {
            return Err(WizardError::MalformedResponse {
                reason: "no trip types were suggested".to_string(),
                cleaned: "[]".to_string(),
            });
        }

        info!(count = trip_types.len(), "Trip types suggested");
        self.state.suggestions.trip_types = Some(trip_types);
        self.select_default_trip_type();
        Ok(StageStatus::Fetched)
    }

    /// Keep a chosen trip type if an option still starts with it, else pick the first
    fn select_default_trip_type(&mut self) {
        let chosen = {
            let options = self.trip_type_options();
            self.state
                .selections
                .trip_type
                .as_deref()
                .and_then(|stored| options.iter().find(|t| t.label().starts_with(stored)))
                .or_else(|| options.first())
                .map(|t| t.name.clone())
        };
        debug!(?chosen, "Wizard::select_default_trip_type: selected");
        self.state.selections.trip_type = chosen;
    }

    async fn load_cities(&mut self, force: bool) -> Result<StageStatus, WizardError> {
        let trip_type = self
            .state
            .selections
            .trip_type
            .clone()
            .ok_or_else(|| WizardError::invalid("No trip type selected or provided. Please go back."))?;

        let cached = self.state.suggestions.cities.as_ref().and_then(|c| c.get(&trip_type));
        if !force && cached.is_some() {
            return Ok(StageStatus::Ready);
        }

        let request = CitiesRequest::new(&self.state.inputs, &self.state.selections, &self.settings.currency);
        let cities = self.request(&request).await?;
        info!(count = cities.len(), %trip_type, "Cities suggested");
        self.state.suggestions.cities = Some(Cached {
            key: trip_type,
            value: cities,
        });
        self.drop_unoffered_cities();
        Ok(StageStatus::Fetched)
    }

    async fn load_attractions(&mut self, force: bool) -> Result<StageStatus, WizardError> {
        if self.state.selections.cities.is_empty() {
            return Err(WizardError::invalid("No cities selected. Please go back."));
        }

        let key = self.city_key();
        let cached = self.state.suggestions.attractions.as_ref().and_then(|c| c.get(&key));
        if !force && cached.is_some() {
            return Ok(StageStatus::Ready);
        }

        let request = AttractionsRequest::new(&self.state.inputs, &self.state.selections);
        let attractions = self.request(&request).await?;
        info!(cities = attractions.len(), "Attractions suggested");
        self.state.suggestions.attractions = Some(Cached { key, value: attractions });
        self.drop_unoffered_attractions();
        Ok(StageStatus::Fetched)
    }

    async fn load_restaurants(&mut self, force: bool) -> Result<StageStatus, WizardError> {
        if !self.state.selections.include_restaurants {
            debug!("Wizard::load_restaurants: restaurants not included");
            return Ok(StageStatus::Ready);
        }
        if self.state.selections.cities.is_empty() {
            return Err(WizardError::invalid("No cities selected for restaurant suggestions. Please go back."));
        }

        let key = self.city_key();
        let cached = self.state.suggestions.restaurants.as_ref().and_then(|c| c.get(&key));
        if !force && cached.is_some() {
            return Ok(StageStatus::Ready);
        }

        let request = RestaurantsRequest::new(&self.state.inputs, &self.state.selections, &self.settings.currency);
        let restaurants = self.request(&request).await?;
        info!(cities = restaurants.len(), "Restaurants suggested");
        self.state.suggestions.restaurants = Some(Cached {
            key,
            value: restaurants,
        });
        self.drop_unoffered_restaurants();
        Ok(StageStatus::Fetched)
    }

    /// Keep only selected cities that are still offered
    fn drop_unoffered_cities(&mut self) {
        let options = self.city_options();
        let selections = &mut self.state.selections;
        let before = selections.cities.len();
        selections.cities.retain(|city| options.contains(city));
        if selections.cities.len() != before {
            info!(dropped = before - selections.cities.len(), "Dropped cities no longer offered");
            selections.retain_selected_cities();
        }
    }

    /// Keep only selected attractions that are still offered for their city
    fn drop_unoffered_attractions(&mut self) {
        let offered: Vec<(String, Vec<String>)> = self
            .state
            .selections
            .cities
            .iter()
            .map(|city| (city.clone(), self.attraction_options(city)))
            .collect();
        for (city, options) in offered {
            if let Some(chosen) = self.state.selections.attractions.get_mut(&city) {
                chosen.retain(|name| options.contains(name));
            }
        }
    }

    /// Keep only selected restaurants that are still offered for their city
    fn drop_unoffered_restaurants(&mut self) {
        let offered: Vec<(String, Vec<String>)> = self
            .state
            .selections
            .cities
            .iter()
            .map(|city| (city.clone(), self.restaurant_options(city)))
            .collect();
        for (city, options) in offered {
            if let Some(chosen) = self.state.selections.restaurants.get_mut(&city) {
                chosen.retain(|name| options.contains(name));
            }
        }
    }

    async fn load_plan(&mut self, force: bool) -> Result<StageStatus, WizardError> {
        if self.trip_length() == 0 {
            return Err(WizardError::invalid(
                "Invalid time frame. Please go back and correct the dates.",
            ));
        }
        if !force && self.state.plan.is_some() {
            return Ok(StageStatus::Ready);
        }

        let request = ItineraryRequest::new(&self.state.inputs, &self.state.selections);
        match self.request(&request).await {
            Ok(plan) => {
                info!(days = plan.itinerary_days.len(), "Itinerary structured");
                self.state.plan = Some(plan);
                Ok(StageStatus::Fetched)
            }
            Err(e) => {
                warn!(error = %e, "Itinerary structuring failed, using a plan built from the selections");
                self.state.plan = Some(Plan::fallback(&self.state.selections));
                Ok(StageStatus::FallbackPlan { reason: e.to_string() })
            }
        }
    }

    /// Send the pending adjustment request
    ///
    /// A well-formed reply replaces the whole plan and clears the request;
    /// anything else leaves both untouched.
    pub async fn adjust_plan(&mut self) -> Result<(), WizardError> {
        debug!("Wizard::adjust_plan: called");
        self.require_stage(Stage::GeneratePlan, "the plan")?;

        let text = self.state.adjustment.trim();
        if text.is_empty() {
            return Err(WizardError::invalid("Please enter an adjustment request."));
        }
        let plan = self
            .state
            .plan
            .as_ref()
            .ok_or_else(|| WizardError::invalid("No current plan to adjust. Please generate a plan first."))?;

        let request = AdjustPlanRequest::new(plan, text).map_err(|e| WizardError::Template(e.to_string()))?;
        let adjusted = self.request(&request).await?;

        info!(days = adjusted.itinerary_days.len(), "Plan adjusted");
        self.state.plan = Some(adjusted);
        self.state.adjustment.clear();
        Ok(())
    }

    // ---- options ----

    pub fn trip_type_options(&self) -> &[TripTypeSuggestion] {
        self.state.suggestions.trip_types.as_deref().unwrap_or(&[])
    }

    /// City suggestions fetched for the current trip type
    pub fn city_suggestions(&self) -> &[CitySuggestion] {
        let Some(trip_type) = &self.state.selections.trip_type else {
            return &[];
        };
        self.state
            .suggestions
            .cities
            .as_ref()
            .and_then(|c| c.get(trip_type))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Initial cities first, then suggested ones not already listed
    pub fn city_options(&self) -> Vec<String> {
        let suggested = self.city_suggestions().iter().map(|c| c.city_name.trim().to_string());
        unique_in_order(
            self.state
                .inputs
                .initial_city_list()
                .into_iter()
                .chain(suggested)
                .filter(|c| !c.is_empty()),
        )
    }

    fn city_key(&self) -> BTreeSet<String> {
        self.state.selections.cities.iter().cloned().collect()
    }

    pub fn attraction_suggestions(&self, city: &str) -> &[AttractionSuggestion] {
        let key = self.city_key();
        self.state
            .suggestions
            .attractions
            .as_ref()
            .and_then(|c| c.get(&key))
            .map(|map| lookup_city(map, city))
            .unwrap_or(&[])
    }

    /// Initial attractions first (offered for every city), then the city's suggestions
    pub fn attraction_options(&self, city: &str) -> Vec<String> {
        let suggested = self
            .attraction_suggestions(city)
            .iter()
            .map(|a| a.attraction_name.trim().to_string());
        unique_in_order(
            self.state
                .inputs
                .initial_attraction_list()
                .into_iter()
                .chain(suggested)
                .filter(|a| !a.is_empty()),
        )
    }

    fn has_attraction_options(&self) -> bool {
        self.state
            .selections
            .cities
            .iter()
            .any(|city| !self.attraction_options(city).is_empty())
    }

    pub fn restaurant_suggestions(&self, city: &str) -> &[RestaurantSuggestion] {
        let key = self.city_key();
        self.state
            .suggestions
            .restaurants
            .as_ref()
            .and_then(|c| c.get(&key))
            .map(|map| lookup_city(map, city))
            .unwrap_or(&[])
    }

    pub fn restaurant_options(&self, city: &str) -> Vec<String> {
        unique_in_order(
            self.restaurant_suggestions(city)
                .iter()
                .map(|r| r.restaurant_name.trim().to_string())
                .filter(|r| !r.is_empty()),
        )
    }
}

/// Trim, dedupe, and check every choice against `options`
fn checked_choices(choices: Vec<String>, options: &[String], kind: &str) -> Result<Vec<String>, WizardError> {
    let choices = unique_in_order(choices.into_iter().map(|c| c.trim().to_string()));
    if let Some(unknown) = choices.iter().find(|c| !options.contains(c)) {
        return Err(WizardError::invalid(format!("'{}' is not one of the {} options.", unknown, kind)));
    }
    Ok(choices)
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
