//! Text rendering of a stage view

use std::fmt::Write;

use colored::Colorize;

use crate::wizard::{ChoiceGroup, PlanOverview, Stage, StageView};

/// Render the whole stage: header, form or options, and what to do next
pub fn render_view(view: &StageView) -> String {
    let mut out = String::new();
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "{} {}",
        format!("[{}/{}]", view.stage.number(), Stage::ALL.len()).dimmed(),
        view.title.bright_cyan().bold()
    );
    if let Some(notice) = &view.notice {
        let _ = writeln!(out, "{}", notice.green());
    }

    for field in &view.fields {
        let _ = writeln!(
            out,
            "  {:14} {:32} {}",
            field.key.yellow(),
            field.label,
            field.value.bright_white()
        );
    }

    if let Some(include) = view.include_restaurants {
        let _ = writeln!(
            out,
            "  {:14} Include restaurant suggestions: {}",
            "include".yellow(),
            if include { "yes" } else { "no" }
        );
    }

    for group in &view.groups {
        render_group(&mut out, group);
    }

    if let Some(overview) = &view.overview {
        render_overview(&mut out, overview);
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "{}", hint(view).dimmed());
    if let Some(blocker) = &view.blocker
        && view.stage != Stage::GeneratePlan
    {
        let _ = writeln!(out, "{} {}", "!".yellow(), blocker);
    }
    out
}

fn render_group(out: &mut String, group: &ChoiceGroup) {
    let _ = writeln!(out);
    let _ = writeln!(out, "{}", group.heading.bright_blue());
    if group.options.is_empty() {
        if let Some(note) = &group.empty_note {
            let _ = writeln!(out, "  {}", note.dimmed());
        }
        return;
    }
    for (i, option) in group.options.iter().enumerate() {
        let mark = match (group.multi, option.selected) {
            (true, true) => "[x]",
            (true, false) => "[ ]",
            (false, true) => "(*)",
            (false, false) => "( )",
        };
        let _ = match &option.detail {
            Some(detail) => writeln!(out, "  {:>2}. {} {} {}", i + 1, mark, option.value, detail.dimmed()),
            None => writeln!(out, "  {:>2}. {} {}", i + 1, mark, option.value),
        };
    }
}

fn render_overview(out: &mut String, overview: &PlanOverview) {
    let _ = writeln!(out);
    let _ = writeln!(out, "{}", "Trip Overview".bright_cyan());
    let _ = writeln!(out, "  Trip type: {}", overview.trip_type);
    let _ = writeln!(
        out,
        "  Duration:  {} days ({} to {})",
        overview.num_days, overview.start_date, overview.end_date
    );
    let _ = writeln!(
        out,
        "  Travelers: {} adults, {} children",
        overview.adults, overview.children
    );
    let _ = writeln!(out, "  Cities:    {}", overview.cities);
    if !overview.general_notes.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "{} {}", "Notes:".bright_blue(), overview.general_notes);
    }

    for day in &overview.days {
        let _ = writeln!(out);
        let _ = writeln!(out, "{}", format!("{}: {}", day.day_number, day.location).bold());
        let _ = writeln!(out, "  Morning:   {}", day.morning_activity);
        let _ = writeln!(out, "  Afternoon: {}", day.afternoon_activity);
        let _ = writeln!(out, "  Evening:   {}", day.evening_meal);
        if !day.notes.is_empty() {
            let _ = writeln!(out, "  Notes:     {}", day.notes.italic());
        }
    }
}

fn hint(view: &StageView) -> String {
    let action = match view.stage {
        Stage::InitialInput => "Edit with key=value, then /next.",
        Stage::SuggestTripType => "Pick a trip type by number, then /next.",
        Stage::SuggestCities => "Pick cities by number (e.g. 1,3), then /next.",
        Stage::SuggestAttractions => "Pick per city (e.g. Paris=1,2), then /next.",
        Stage::SuggestRestaurants if view.include_restaurants == Some(true) => {
            "Pick per city (e.g. Paris=1), or include=no, then /next."
        }
        Stage::SuggestRestaurants => "Type include=yes for suggestions, or /next to skip.",
        Stage::GeneratePlan => "Type an adjustment request, /back to change selections, or /restart.",
    };
    match view.back_to {
        Some(_) if view.stage != Stage::GeneratePlan => format!("{} /back goes to the previous step.", action),
        _ => action.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DayPlan;
    use crate::wizard::{ChoiceView, FieldView};

    fn base(stage: Stage) -> StageView {
        colored::control::set_override(false);
        StageView {
            stage,
            title: stage.title(),
            notice: None,
            fields: Vec::new(),
            groups: Vec::new(),
            include_restaurants: None,
            overview: None,
            adjustment: None,
            blocker: None,
            back_to: None,
        }
    }

    #[test]
    fn test_render_fields_and_blocker() {
        let mut view = base(Stage::InitialInput);
        view.fields.push(FieldView {
            key: "destination",
            label: "Starting destination".into(),
            value: "Oslo".into(),
        });
        view.blocker = Some("Please enter a starting destination.".into());

        let out = render_view(&view);
        assert!(out.contains("[1/6] Tell us about your dream trip"));
        assert!(out.contains("Oslo"));
        assert!(out.contains("! Please enter a starting destination."));
    }

    #[test]
    fn test_render_options_with_marks() {
        let mut view = base(Stage::SuggestCities);
        view.groups.push(ChoiceGroup {
            heading: "Select cities".into(),
            city: None,
            multi: true,
            options: vec![
                ChoiceView {
                    value: "Rome".into(),
                    detail: Some("Ruins".into()),
                    selected: true,
                },
                ChoiceView {
                    value: "Lyon".into(),
                    detail: None,
                    selected: false,
                },
            ],
            empty_note: None,
        });

        let out = render_view(&view);
        assert!(out.contains(" 1. [x] Rome Ruins"));
        assert!(out.contains(" 2. [ ] Lyon"));
    }

    #[test]
    fn test_render_overview() {
        let mut view = base(Stage::GeneratePlan);
        view.overview = Some(PlanOverview {
            trip_type: "Food tour".into(),
            num_days: 3,
            start_date: "June 01, 2026".into(),
            end_date: "June 03, 2026".into(),
            adults: 2,
            children: 0,
            cities: "Lyon".into(),
            general_notes: "Eat well.".into(),
            days: vec![DayPlan {
                day_number: "Day 1".into(),
                location: "Lyon".into(),
                morning_activity: "Market".into(),
                afternoon_activity: "Old town".into(),
                evening_meal: "Bouchon".into(),
                notes: String::new(),
            }],
        });

        let out = render_view(&view);
        assert!(out.contains("Duration:  3 days (June 01, 2026 to June 03, 2026)"));
        assert!(out.contains("Day 1: Lyon"));
        assert!(out.contains("Evening:   Bouchon"));
        assert!(!out.contains("Notes:     "));
    }
}
