//! # Calculation Report
//!
//! Human-readable breakdown of an egress calculation: numbered steps for
//! display and a plain-text summary for export. Nothing here feeds back into
//! the calculation.
//!
//! ## Example
//!
//! ```rust
//! use egress_core::calculations::egress::{calculate, EgressInput};
//! use egress_core::report::{calculation_steps, format_width};
//! use egress_core::tables::{CodeVersion, Occupancy};
//! use egress_core::units::UnitSystem;
//!
//! let input = EgressInput {
//!     jurisdiction: Some("Ohio".to_string()),
//!     code_version: Some(CodeVersion::Ibc2021),
//!     occupancy: Some(Occupancy::Business),
//!     floor_area: Some(1000.0),
//!     sprinklered: Some(false),
//!     ..Default::default()
//! };
//! let result = calculate(&input, UnitSystem::Imperial).unwrap();
//!
//! let steps = calculation_steps(&input, &result);
//! assert_eq!(steps.len(), 3);
//! assert_eq!(steps[1].result, "3 inches");
//! assert_eq!(format_width(32, UnitSystem::Metric), "813 mm");
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::calculations::{EgressInput, EgressResult};
use crate::tables::{code_notice, CodeReference, EgressFactorSet, MIN_DOOR_WIDTH_IN};
use crate::units::{Inches, Millimeters, UnitSystem};

/// One numbered step of the calculation breakdown
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportStep {
    pub number: usize,
    pub title: String,
    pub formula: String,
    pub result: String,
    pub note: String,
}

/// Where the calculation sits within its project
#[derive(Debug, Clone, PartialEq)]
pub struct ReportContext {
    pub project_name: String,
    /// 1-based
    pub building_number: usize,
    pub building_count: usize,
    pub date: DateTime<Utc>,
}

/// Insert thousands separators into the integer part of a formatted number.
fn group_thousands(formatted: &str) -> String {
    let (sign, rest) = match formatted.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", formatted),
    };
    let (int_part, frac_part) = match rest.find('.') {
        Some(pos) => rest.split_at(pos),
        None => (rest, ""),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    format!("{}{}{}", sign, grouped, frac_part)
}

/// Width for display: "36 inches" or "914 mm".
pub fn format_width(inches: u32, units: UnitSystem) -> String {
    match units {
        UnitSystem::Imperial => format!("{} inches", inches),
        UnitSystem::Metric => {
            let mm = Millimeters::from(Inches(f64::from(inches))).value().round();
            format!("{} mm", group_thousands(&format!("{:.0}", mm)))
        }
    }
}

/// Area for display with two decimals: "1,000.00 sq. ft."
pub fn format_area(value: f64, units: UnitSystem) -> String {
    format!("{} {}", group_thousands(&format!("{:.2}", value)), units.area_label())
}

/// Code sections that apply to a result
pub fn references_for(result: &EgressResult) -> Vec<CodeReference> {
    let mut refs = vec![CodeReference::OccupantLoad, CodeReference::EgressWidth];
    if result.door_width.is_some() {
        refs.push(CodeReference::ExitAccess);
        refs.push(CodeReference::DoorWidth);
    }
    refs
}

/// Numbered calculation steps for a result.
pub fn calculation_steps(input: &EgressInput, result: &EgressResult) -> Vec<ReportStep> {
    let units = result.units;
    let sprinklered = input.sprinklered.unwrap_or(false);
    let factors = EgressFactorSet::for_sprinklers(sprinklered);
    let sprinkler_note = if sprinklered {
        "Reduced factors for a building with an automatic sprinkler system"
    } else {
        "Factors for a building without an automatic sprinkler system"
    };

    let area_note = input
        .occupancy
        .map(|o| o.area_type().hint().to_string())
        .unwrap_or_default();

    let mut steps = vec![
        ReportStep {
            number: 1,
            title: "Occupant Load".to_string(),
            formula: format!(
                "ceil({} ÷ {:.2})",
                group_thousands(&format!("{:.2}", input.floor_area.unwrap_or_default())),
                result.occupant_load_factor
            ),
            result: format!("{} occupants", result.occupant_load),
            note: area_note,
        },
        ReportStep {
            number: 2,
            title: "Stair Width".to_string(),
            formula: format!("{} × {}", result.occupant_load, factors.stairs),
            result: format_width(result.stair_width, units),
            note: sprinkler_note.to_string(),
        },
        ReportStep {
            number: 3,
            title: "Other Components Width".to_string(),
            formula: format!("{} × {}", result.occupant_load, factors.other),
            result: format_width(result.other_width, units),
            note: sprinkler_note.to_string(),
        },
    ];

    if let (Some(door), Some(total), Some(doors)) =
        (result.door_width, result.total_width, input.exit_doors)
    {
        steps.push(ReportStep {
            number: 4,
            title: "Door Width (per door)".to_string(),
            formula: format!("{} ÷ {}", total, doors),
            result: format_width(door, units),
            note: format!("Not less than {} inches per {}", MIN_DOOR_WIDTH_IN, CodeReference::DoorWidth.section()),
        });
    }

    steps
}

fn yes_no(value: Option<bool>) -> &'static str {
    match value {
        Some(true) => "Yes",
        Some(false) => "No",
        None => "-",
    }
}

/// Plain-text summary for export.
pub fn render_summary(context: &ReportContext, input: &EgressInput, result: &EgressResult) -> String {
    let units = result.units;
    let mut lines: Vec<String> = Vec::new();

    lines.push("PROJECT SUMMARY".to_string());
    lines.push(format!("Project: {}", context.project_name));
    lines.push(format!(
        "Building: {} of {}",
        context.building_number, context.building_count
    ));
    lines.push(format!("Date: {}", context.date.format("%Y-%m-%d %H:%M:%S")));
    lines.push(format!("Units: {}", units.display_name()));
    lines.push(String::new());

    lines.push("INPUT PARAMETERS".to_string());
    lines.push(format!(
        "• State/Jurisdiction: {}",
        input.jurisdiction.as_deref().unwrap_or("-")
    ));
    lines.push(format!(
        "• IBC Code Version: {}",
        input.code_version.map(|v| v.code()).unwrap_or("-")
    ));
    lines.push(format!(
        "• Occupancy Classification: {}",
        input.occupancy.map(|o| o.display_name()).unwrap_or("-")
    ));
    lines.push(format!(
        "• Floor Area: {}",
        format_area(input.floor_area.unwrap_or_default(), units)
    ));
    lines.push(format!(
        "• Occupant Load Factor: {:.2} {}/occupant",
        result.occupant_load_factor,
        units.area_label()
    ));
    lines.push(format!("• Automatic Sprinkler System: {}", yes_no(input.sprinklered)));
    if let Some(distance) = input.travel_distance.filter(|d| *d > 0.0) {
        lines.push(format!(
            "• Max Travel Distance: {} {}",
            distance,
            units.distance_label()
        ));
    }
    if let Some(doors) = input.exit_doors {
        lines.push(format!("• Number of Exit Doors: {}", doors));
    }
    lines.push(String::new());

    lines.push("CALCULATION PROCESS".to_string());
    for step in calculation_steps(input, result) {
        lines.push(format!(
            "{}. {} = {} = {}",
            step.number, step.title, step.formula, step.result
        ));
    }
    lines.push(String::new());

    lines.push("RESULTS".to_string());
    lines.push(format!("• Occupant Load: {} occupants", result.occupant_load));
    lines.push(format!(
        "• Required Stair Width: {}",
        format_width(result.stair_width, units)
    ));
    lines.push(format!(
        "• Required Other Components Width: {}",
        format_width(result.other_width, units)
    ));
    if let Some(door) = result.door_width {
        lines.push(format!("• Minimum Door Width: {}", format_width(door, units)));
    }
    if let Some(total) = result.total_width {
        lines.push(format!(
            "• Total Required Exit Width: {}",
            format_width(total, units)
        ));
    }
    lines.push(String::new());

    lines.push("CODE REFERENCES".to_string());
    for reference in references_for(result) {
        lines.push(format!("• {} ({})", reference.citation(), reference.link()));
    }
    lines.push(String::new());

    lines.push(code_notice(input.jurisdiction.as_deref().unwrap_or_default()).to_string());
    lines.push(String::new());

    lines.join("\n")
}
