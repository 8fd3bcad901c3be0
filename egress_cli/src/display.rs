//! Terminal rendering of results, buildings and history.

use std::io::{self, Write};

use egress_core::calculations::{EgressInput, EgressResult};
use egress_core::history::History;
use egress_core::report::{calculation_steps, format_width, references_for};
use egress_core::tables::code_notice;
use egress_core::Session;

const RULE: &str = "═══════════════════════════════════════";

/// Number of history entries listed
pub const HISTORY_SHOWN: usize = 10;

pub fn write_result<W: Write>(out: &mut W, input: &EgressInput, result: &EgressResult) -> io::Result<()> {
    let units = result.units;
    let widths = result.widths();

    writeln!(out, "{}", RULE)?;
    writeln!(out, "  EGRESS CALCULATION RESULTS")?;
    writeln!(out, "{}", RULE)?;
    writeln!(out)?;
    writeln!(out, "  Occupant Load:          {} occupants", result.occupant_load)?;
    writeln!(out, "  Stair Width:            {}", format_width(widths.stairs, units))?;
    writeln!(out, "  Other Components Width: {}", format_width(widths.other, units))?;
    if let Some(door) = result.door_width {
        writeln!(out, "  Min Door Width (each):  {}", format_width(door, units))?;
    }
    if let Some(total) = result.total_width {
        writeln!(out, "  Total Exit Width:       {}", format_width(total, units))?;
    }
    writeln!(out)?;

    writeln!(out, "Calculation:")?;
    for step in calculation_steps(input, result) {
        writeln!(out, "  {}. {} = {} = {}", step.number, step.title, step.formula, step.result)?;
    }
    writeln!(out)?;

    writeln!(out, "References:")?;
    for reference in references_for(result) {
        writeln!(out, "  {}", reference.citation())?;
    }
    writeln!(out)?;
    writeln!(out, "{}", code_notice(input.jurisdiction.as_deref().unwrap_or_default()))?;
    writeln!(out, "{}", RULE)?;
    Ok(())
}

/// Project name, building position and unit system
pub fn write_status<W: Write>(out: &mut W, session: &Session) -> io::Result<()> {
    let project = session.project();
    write!(out, "Project: {} | Units: {}", project.display_name(), session.units())?;
    match session.current_building() {
        Some(building) => writeln!(
            out,
            " | {} ({} of {}, {} calculated){}",
            building.name,
            session.current_index() + 1,
            project.building_count(),
            project.calculated_count(),
            if building.is_calculated() { "" } else { " - not calculated" }
        ),
        None => writeln!(out, " | no buildings - type 'add' to start"),
    }
}

pub fn write_history<W: Write>(out: &mut W, history: &History) -> io::Result<()> {
    if history.is_empty() {
        return writeln!(out, "History is empty.");
    }
    writeln!(
        out,
        "Showing {} of {} calculation(s):",
        history.len().min(HISTORY_SHOWN),
        history.len()
    )?;
    for entry in history.recent(HISTORY_SHOWN) {
        writeln!(out, "- {}", entry.title())?;
        writeln!(
            out,
            "    {} | {} occupants | sprinklers: {} | stairs {} | other {}",
            entry
                .inputs
                .occupancy
                .map(|o| o.display_name())
                .unwrap_or("-"),
            entry.results.occupant_load,
            match entry.inputs.sprinklered {
                Some(true) => "yes",
                Some(false) => "no",
                None => "-",
            },
            format_width(entry.results.stair_width, entry.units),
            format_width(entry.results.other_width, entry.units),
        )?;
    }
    Ok(())
}
