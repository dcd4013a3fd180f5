// src/layout.rs

use anyhow::{anyhow, Result};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{info, warn};

use crate::{
    chart::FigurePair,
    context::DashboardContext,
    filter::FilterParams,
    handler::update_charts,
};

/// Static page description: controls seeded from the table, plus the
/// unfiltered charts shown before the first update.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardLayout {
    pub title: String,
    pub name_input: TextInput,
    pub sex_checklist: Checklist,
    pub year_slider: RangeSlider,
    pub department_dropdown: Dropdown,
    pub figures: FigurePair,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextInput {
    pub id: &'static str,
    pub placeholder: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Checklist {
    pub id: &'static str,
    pub options: Vec<String>,
    pub value: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RangeSlider {
    pub id: &'static str,
    pub min: i32,
    pub max: i32,
    pub step: i32,
    pub value: [i32; 2],
    pub marks: BTreeMap<i32, String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dropdown {
    pub id: &'static str,
    pub options: Vec<String>,
    pub multi: bool,
    pub placeholder: String,
}

impl DashboardLayout {
    pub fn build(ctx: &DashboardContext) -> Result<Self> {
        let table = ctx.table();
        let settings = ctx.settings();
        let (min, max) = table
            .year_bounds()
            .ok_or_else(|| anyhow!("name table is empty; cannot seed the year slider"))?;

        let sex_options = table.sex_labels()?;
        let missing: Vec<&String> = settings
            .default_sexes
            .iter()
            .filter(|s| !sex_options.contains(s))
            .collect();
        if !missing.is_empty() {
            warn!(
                ?missing,
                options = ?sex_options,
                "default sex selection names labels absent from the data"
            );
        }

        let step = usize::try_from(settings.year_mark_step.max(1))?;
        let marks = (min..=max)
            .step_by(step)
            .map(|year| (year, year.to_string()))
            .collect();

        let departments = table.departments()?;
        let figures = update_charts(ctx, &FilterParams::default())?.figures(ctx);
        info!(
            years = ?(min, max),
            sexes = sex_options.len(),
            departments = departments.len(),
            "built dashboard layout"
        );

        Ok(Self {
            title: settings.title.clone(),
            name_input: TextInput {
                id: "input-prenom",
                placeholder: "Enter a first name".to_string(),
            },
            sex_checklist: Checklist {
                id: "radio-sexe",
                options: sex_options,
                value: settings.default_sexes.clone(),
            },
            year_slider: RangeSlider {
                id: "range-slider-annee",
                min,
                max,
                step: 1,
                value: [min, max],
                marks,
            },
            department_dropdown: Dropdown {
                id: "dropdown-departement",
                options: departments,
                multi: true,
                placeholder: "Select Departement(s)".to_string(),
            },
            figures,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DashboardSettings;
    use crate::data::NameTable;
    use crate::fixtures::{context_with, sample_boundaries, sample_context, sample_table};

    #[test]
    fn test_controls_seeded_from_table() {
        let layout = DashboardLayout::build(&sample_context()).unwrap();

        assert_eq!(layout.title, "France First Name Dashboard");
        assert_eq!(layout.sex_checklist.options, vec!["Man", "Woman"]);
        assert_eq!(layout.sex_checklist.value, vec!["Homme"]);
        assert_eq!(layout.year_slider.value, [1950, 2001]);
        assert_eq!(layout.year_slider.step, 1);
        assert_eq!(layout.department_dropdown.options, vec!["01", "75", "2A"]);
        assert!(layout.department_dropdown.multi);
    }

    #[test]
    fn test_marks_every_five_years_from_min() {
        let layout = DashboardLayout::build(&sample_context()).unwrap();
        let marks: Vec<i32> = layout.year_slider.marks.keys().copied().collect();
        assert_eq!(marks.first(), Some(&1950));
        assert_eq!(marks.last(), Some(&2000));
        assert_eq!(marks.len(), 11);
        assert_eq!(layout.year_slider.marks[&1955], "1955");
    }

    #[test]
    fn test_initial_figures_are_unfiltered() {
        let layout = DashboardLayout::build(&sample_context()).unwrap();
        let x = layout.figures.line["data"][0]["x"].as_array().unwrap().len();
        assert_eq!(x, 3);
        let z = layout.figures.map["data"][0]["z"].as_array().unwrap().len();
        assert_eq!(z, 3);
    }

    #[test]
    fn test_default_sexes_are_configurable() {
        let settings = DashboardSettings {
            default_sexes: vec!["Man".into()],
            ..Default::default()
        };
        let ctx = DashboardContext::new(sample_table(), sample_boundaries(), settings);
        let layout = DashboardLayout::build(&ctx).unwrap();
        assert_eq!(layout.sex_checklist.value, vec!["Man"]);
    }

    #[test]
    fn test_empty_table_is_an_error() {
        let ctx = context_with(NameTable::from_records(&[]).unwrap());
        assert!(DashboardLayout::build(&ctx).is_err());
    }

    #[test]
    fn test_layout_serialises_control_ids() {
        let layout = DashboardLayout::build(&sample_context()).unwrap();
        let json = serde_json::to_value(&layout).unwrap();
        assert_eq!(json["sex_checklist"]["id"], "radio-sexe");
        assert_eq!(json["year_slider"]["marks"]["1950"], "1950");
        assert_eq!(json["department_dropdown"]["options"][2], "2A");
    }
}
