//! Turns typed lines into wizard edits

use crate::wizard::{ChoiceGroup, Edit, Stage, StageView, WizardError};

/// Parse one non-command line typed at the current stage
///
/// Options are picked by their 1-based number in the rendered list.
/// `-` or `none` clears a multi-select.
pub fn parse_line(view: &StageView, line: &str) -> Result<Edit, WizardError> {
    let line = line.trim();
    match view.stage {
        Stage::InitialInput => {
            let (key, value) = line
                .split_once('=')
                .ok_or_else(|| WizardError::invalid("Enter fields as key=value, for example destination=Lisbon"))?;
            Edit::from_field(key, value)
        }
        Stage::SuggestTripType => {
            let group = first_group(view)?;
            match line.parse::<usize>() {
                Ok(_) => {
                    let picks = pick(group, line)?;
                    match picks.as_slice() {
                        [one] => Ok(Edit::ChooseTripType(one.clone())),
                        _ => Err(WizardError::invalid("Choose exactly one trip type.")),
                    }
                }
                Err(_) => Ok(Edit::ChooseTripType(line.to_string())),
            }
        }
        Stage::SuggestCities => Ok(Edit::SelectCities(pick(first_group(view)?, line)?)),
        Stage::SuggestAttractions => {
            let (group, picks) = city_picks(view, line)?;
            Ok(Edit::SelectAttractions {
                city: group.city.clone().unwrap_or_default(),
                attractions: pick(group, picks)?,
            })
        }
        Stage::SuggestRestaurants => {
            if let Some((key, value)) = line.split_once('=')
                && key.trim().eq_ignore_ascii_case("include")
            {
                return parse_yes_no(value).map(Edit::IncludeRestaurants);
            }
            if view.include_restaurants != Some(true) {
                return Err(WizardError::invalid(
                    "Type include=yes to get restaurant suggestions, or /next to skip.",
                ));
            }
            let (group, picks) = city_picks(view, line)?;
            Ok(Edit::SelectRestaurants {
                city: group.city.clone().unwrap_or_default(),
                restaurants: pick(group, picks)?,
            })
        }
        Stage::GeneratePlan => Ok(Edit::Adjustment(line.to_string())),
    }
}

fn first_group(view: &StageView) -> Result<&ChoiceGroup, WizardError> {
    view.groups
        .first()
        .ok_or_else(|| WizardError::invalid("Nothing to choose from yet. Try /retry."))
}

/// Split `City=1,2` into its group and picks; a bare list works when there is one city
fn city_picks<'a>(view: &'a StageView, line: &'a str) -> Result<(&'a ChoiceGroup, &'a str), WizardError> {
    match line.split_once('=') {
        Some((city, picks)) => {
            let city = city.trim();
            let group = view
                .groups
                .iter()
                .find(|g| g.city.as_deref().is_some_and(|c| c.eq_ignore_ascii_case(city)))
                .ok_or_else(|| WizardError::invalid(format!("'{}' is not a selected city.", city)))?;
            Ok((group, picks))
        }
        None => match view.groups.as_slice() {
            [only] => Ok((only, line)),
            _ => Err(WizardError::invalid("Pick per city, for example Paris=1,3")),
        },
    }
}

/// Resolve a list of option numbers to option values
fn pick(group: &ChoiceGroup, text: &str) -> Result<Vec<String>, WizardError> {
    let text = text.trim();
    if text == "-" || text.eq_ignore_ascii_case("none") {
        return Ok(Vec::new());
    }

    text.split(|c: char| c == ',' || c.is_whitespace())
        .filter(|t| !t.is_empty())
        .map(|token| {
            let index: usize = token
                .parse()
                .map_err(|_| WizardError::invalid(format!("'{}' is not an option number.", token)))?;
            index
                .checked_sub(1)
                .and_then(|i| group.options.get(i))
                .map(|o| o.value.clone())
                .ok_or_else(|| {
                    WizardError::invalid(format!("Option {} does not exist (1-{}).", index, group.options.len()))
                })
        })
        .collect()
}

fn parse_yes_no(value: &str) -> Result<bool, WizardError> {
    match value.trim().to_lowercase().as_str() {
        "yes" | "y" | "true" | "on" => Ok(true),
        "no" | "n" | "false" | "off" => Ok(false),
        other => Err(WizardError::invalid(format!("Expected yes or no, got '{}'", other))),
    }
}
