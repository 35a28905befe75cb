//! Render-ready description of the current stage

use serde::Serialize;

use super::edit::INPUT_FIELDS;
use super::machine::Wizard;
use super::stage::Stage;
use crate::domain::DayPlan;

/// Everything a front end needs to draw one stage
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StageView {
    pub stage: Stage,
    pub title: &'static str,
    /// Short status line, such as the trip type carried over from the form
    pub notice: Option<String>,
    /// Editable form values (InitialInput only)
    pub fields: Vec<FieldView>,
    pub groups: Vec<ChoiceGroup>,
    /// Restaurant opt-in toggle (SuggestRestaurants only)
    pub include_restaurants: Option<bool>,
    pub overview: Option<PlanOverview>,
    /// Pending adjustment text (GeneratePlan only)
    pub adjustment: Option<String>,
    /// Why advancing is not possible right now
    pub blocker: Option<String>,
    pub back_to: Option<Stage>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldView {
    pub key: &'static str,
    pub label: String,
    pub value: String,
}

/// A set of options the user picks from
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChoiceGroup {
    pub heading: String,
    /// City the choices belong to, for per-city stages
    pub city: Option<String>,
    /// Whether several options may be selected
    pub multi: bool,
    pub options: Vec<ChoiceView>,
    /// Shown instead of an empty option list
    pub empty_note: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChoiceView {
    pub value: String,
    pub detail: Option<String>,
    pub selected: bool,
}

/// Header and days of the final plan
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlanOverview {
    pub trip_type: String,
    pub num_days: u32,
    pub start_date: String,
    pub end_date: String,
    pub adults: u32,
    pub children: u32,
    pub cities: String,
    pub general_notes: String,
    pub days: Vec<DayPlan>,
}

const LONG_DATE: &str = "%B %d, %Y";

impl StageView {
    pub fn build(wizard: &Wizard) -> Self {
        let stage = wizard.stage();
        let mut view = Self {
            stage,
            title: stage.title(),
            notice: None,
            fields: Vec::new(),
            groups: Vec::new(),
            include_restaurants: None,
            overview: None,
            adjustment: None,
            blocker: wizard.next_stage().err().map(|e| e.to_string()),
            back_to: wizard.back_target(),
        };

        match stage {
            Stage::InitialInput => view.fields = input_fields(wizard),
            Stage::SuggestTripType => view.groups.push(trip_type_group(wizard)),
            Stage::SuggestCities => {
                let state = wizard.state();
                if state.trip_type_skipped
                    && let Some(trip_type) = &state.selections.trip_type
                {
                    view.notice = Some(format!("Using your trip type: {}", trip_type));
                }
                view.groups.push(city_group(wizard));
            }
            Stage::SuggestAttractions => view.groups = attraction_groups(wizard),
            Stage::SuggestRestaurants => {
                let include = wizard.state().selections.include_restaurants;
                view.include_restaurants = Some(include);
                if include {
                    view.groups = restaurant_groups(wizard);
                }
            }
            Stage::GeneratePlan => {
                view.overview = plan_overview(wizard);
                view.adjustment = Some(wizard.state().adjustment.clone());
            }
        }
        view
    }
}

fn input_fields(wizard: &Wizard) -> Vec<FieldView> {
    let inputs = &wizard.state().inputs;
    INPUT_FIELDS
        .iter()
        .map(|&(key, label)| {
            let value = match key {
                "destination" => inputs.start_destination.clone(),
                "budget" => format!("{:.2}", inputs.budget),
                "start" => inputs.start_date.to_string(),
                "end" => inputs.end_date.to_string(),
                "adults" => inputs.adults.to_string(),
                "children" => inputs.children.to_string(),
                "trip-type" => inputs.trip_type_description.clone(),
                "cities" => inputs.initial_cities.clone(),
                "attractions" => inputs.initial_attractions.clone(),
                _ => String::new(),
            };
            let label = if key == "budget" {
                format!("{} ({})", label, wizard.settings().currency)
            } else {
                label.to_string()
            };
            FieldView { key, label, value }
        })
        .collect()
}

fn trip_type_group(wizard: &Wizard) -> ChoiceGroup {
    let chosen = wizard.state().selections.trip_type.as_deref();
    ChoiceGroup {
        heading: "Choose your preferred trip type".to_string(),
        city: None,
        multi: false,
        options: wizard
            .trip_type_options()
            .iter()
            .map(|t| ChoiceView {
                value: t.name.clone(),
                detail: Some(t.explanation.clone()),
                selected: chosen == Some(t.name.as_str()),
            })
            .collect(),
        empty_note: Some("No trip types suggested yet.".to_string()),
    }
}

fn city_group(wizard: &Wizard) -> ChoiceGroup {
    let selected = &wizard.state().selections.cities;
    let suggestions = wizard.city_suggestions();
    ChoiceGroup {
        heading: "Select cities you'd like to visit".to_string(),
        city: None,
        multi: true,
        options: wizard
            .city_options()
            .into_iter()
            .map(|city| ChoiceView {
                detail: suggestions
                    .iter()
                    .find(|s| s.city_name.trim() == city)
                    .map(|s| s.reason.clone()),
                selected: selected.contains(&city),
                value: city,
            })
            .collect(),
        empty_note: Some("No cities suggested, and no initial cities provided.".to_string()),
    }
}

fn attraction_groups(wizard: &Wizard) -> Vec<ChoiceGroup> {
    let selections = &wizard.state().selections;
    selections
        .cities
        .iter()
        .map(|city| {
            let suggestions = wizard.attraction_suggestions(city);
            let chosen = selections.attractions_for(city);
            ChoiceGroup {
                heading: format!("Attractions in {}", city),
                city: Some(city.clone()),
                multi: true,
                options: wizard
                    .attraction_options(city)
                    .into_iter()
                    .map(|name| ChoiceView {
                        detail: suggestions
                            .iter()
                            .find(|s| s.attraction_name.trim() == name)
                            .map(|s| s.description.clone()),
                        selected: chosen.contains(&name),
                        value: name,
                    })
                    .collect(),
                empty_note: Some(format!("No specific attractions suggested for {}.", city)),
            }
        })
        .collect()
}

fn restaurant_groups(wizard: &Wizard) -> Vec<ChoiceGroup> {
    let selections = &wizard.state().selections;
    selections
        .cities
        .iter()
        .map(|city| {
            let chosen = selections.restaurants_for(city);
            ChoiceGroup {
                heading: format!("Restaurants in {}", city),
                city: Some(city.clone()),
                multi: true,
                options: wizard
                    .restaurant_suggestions(city)
                    .iter()
                    .map(|r| ChoiceView {
                        value: r.restaurant_name.trim().to_string(),
                        detail: Some(r.detail()),
                        selected: chosen.iter().any(|c| c == r.restaurant_name.trim()),
                    })
                    .collect(),
                empty_note: Some(format!("No specific restaurants suggested for {}.", city)),
            }
        })
        .collect()
}

fn plan_overview(wizard: &Wizard) -> Option<PlanOverview> {
    let state = wizard.state();
    let plan = state.plan.as_ref()?;
    Some(PlanOverview {
        trip_type: state
            .selections
            .trip_type
            .clone()
            .unwrap_or_else(|| "Not specified".to_string()),
        num_days: wizard.trip_length(),
        start_date: state.inputs.start_date.format(LONG_DATE).to_string(),
        end_date: state.inputs.end_date.format(LONG_DATE).to_string(),
        adults: state.inputs.adults,
        children: state.inputs.children,
        cities: state.selections.cities.join(", "),
        general_notes: plan.general_notes.clone(),
        days: plan.itinerary_days.clone(),
    })
}
