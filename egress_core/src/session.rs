//! # Session State
//!
//! `Session` is the single-owner application state for one interactive
//! client: the open project, which building is selected, the unit system and
//! the calculation history. A front end calls one handler per user action.
//!
//! Invariant: when the project has buildings, `current_index()` is a valid
//! index into them; when it has none, `current_index()` is 0 and
//! `current_building()` is `None`.
//!
//! Handlers that fail leave the session exactly as it was.
//!
//! ## Example
//!
//! ```rust
//! use egress_core::calculations::EgressInput;
//! use egress_core::session::Session;
//! use egress_core::settings::SessionSettings;
//! use egress_core::tables::{CodeVersion, Occupancy};
//!
//! let mut session = Session::new(SessionSettings::default());
//! session.add_building();
//!
//! let input = EgressInput {
//!     jurisdiction: Some("Ohio".to_string()),
//!     code_version: Some(CodeVersion::Ibc2021),
//!     occupancy: Some(Occupancy::Educational),
//!     floor_area: Some(2000.0),
//!     sprinklered: Some(true),
//!     ..Default::default()
//! };
//! let result = session.calculate_current(input).unwrap();
//! assert_eq!(result.occupant_load, 100);
//! assert_eq!(session.history().len(), 1);
//! ```

use std::path::Path;

use chrono::Utc;

use crate::calculations::{calculate, EgressInput, EgressResult};
use crate::errors::{CalcError, CalcResult};
use crate::file_io;
use crate::history::{History, HistoryEntry};
use crate::project::{Building, Project, SCHEMA_VERSION};
use crate::report::{render_summary, ReportContext};
use crate::settings::SessionSettings;
use crate::units::UnitSystem;

/// Interactive session state
#[derive(Debug, Clone)]
pub struct Session {
    project: Project,
    current_index: usize,
    units: UnitSystem,
    show_advanced: bool,
    history: History,
    settings: SessionSettings,
}

impl Session {
    /// Start a session with an empty, unnamed project.
    pub fn new(settings: SessionSettings) -> Self {
        Session {
            project: Project::default(),
            current_index: 0,
            units: settings.default_units,
            show_advanced: settings.show_advanced,
            history: History::new(settings.history_limit),
            settings,
        }
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    pub fn project(&self) -> &Project {
        &self.project
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn current_building(&self) -> Option<&Building> {
        self.project.building(self.current_index)
    }

    pub fn units(&self) -> UnitSystem {
        self.units
    }

    pub fn show_advanced(&self) -> bool {
        self.show_advanced
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn settings(&self) -> &SessionSettings {
        &self.settings
    }

    // ------------------------------------------------------------------
    // Project and building management
    // ------------------------------------------------------------------

    /// Discard the open project. History and unit system are kept.
    pub fn new_project(&mut self) {
        self.project = Project::default();
        self.current_index = 0;
        tracing::info!("started new project");
    }

    pub fn set_project_name(&mut self, name: impl Into<String>) {
        self.project.name = name.into();
    }

    /// Append a building and select it. Returns its index.
    pub fn add_building(&mut self) -> usize {
        let index = self.project.add_building();
        self.current_index = index;
        tracing::debug!(index, "building added");
        index
    }

    /// Remove a building, keeping the selection on a valid building.
    pub fn remove_building(&mut self, index: usize) -> CalcResult<Building> {
        let removed = self
            .project
            .remove_building(index)
            .ok_or_else(|| self.index_error(index))?;

        let count = self.project.building_count();
        if count == 0 {
            self.current_index = 0;
        } else if self.current_index > index || self.current_index >= count {
            self.current_index = self.current_index.saturating_sub(1).min(count - 1);
        }

        tracing::debug!(index, remaining = count, "building removed");
        Ok(removed)
    }

    /// Select a building by index.
    pub fn select_building(&mut self, index: usize) -> CalcResult<()> {
        if index >= self.project.building_count() {
            return Err(self.index_error(index));
        }
        self.current_index = index;
        Ok(())
    }

    /// Move to the next building; no-op on the last one.
    pub fn next_building(&mut self) -> usize {
        if self.current_index + 1 < self.project.building_count() {
            self.current_index += 1;
        }
        self.current_index
    }

    /// Move to the previous building; no-op on the first one.
    pub fn previous_building(&mut self) -> usize {
        self.current_index = self.current_index.saturating_sub(1);
        self.current_index
    }

    fn index_error(&self, index: usize) -> CalcError {
        CalcError::invalid_input(
            "building",
            (index + 1).to_string(),
            format!("Project has {} building(s)", self.project.building_count()),
        )
    }

    // ------------------------------------------------------------------
    // Settings toggles
    // ------------------------------------------------------------------

    /// Switch between imperial and metric. Stored results keep the unit
    /// system they were calculated in.
    pub fn toggle_units(&mut self) -> UnitSystem {
        self.units = self.units.toggled();
        self.units
    }

    pub fn set_show_advanced(&mut self, show: bool) {
        self.show_advanced = show;
    }

    // ------------------------------------------------------------------
    // Calculation
    // ------------------------------------------------------------------

    /// Calculate the selected building and record the result.
    ///
    /// When advanced inputs are hidden, travel distance and exit doors are
    /// dropped before calculating. On success the building's inputs and
    /// results are replaced and a history entry is added; on failure nothing
    /// changes.
    pub fn calculate_current(&mut self, mut input: EgressInput) -> CalcResult<EgressResult> {
        let index = self.current_index;
        if self.project.building(index).is_none() {
            tracing::warn!("calculate requested with no building");
            return Err(CalcError::NoBuilding);
        }

        if !self.show_advanced {
            input.travel_distance = None;
            input.exit_doors = None;
        }

        let result = calculate(&input, self.units).map_err(|e| {
            tracing::warn!(error = %e, "calculation rejected");
            e
        })?;

        let entry = HistoryEntry::new(self.project.display_name(), index + 1, &input, &result);
        self.history.push(entry);

        let building = self
            .project
            .building_mut(index)
            .ok_or(CalcError::NoBuilding)?;
        building.inputs = input;
        building.results = Some(result.clone());

        Ok(result)
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    // ------------------------------------------------------------------
    // Import / export
    // ------------------------------------------------------------------

    /// Project document as written on export: the name defaults to
    /// "Untitled Project" and the creation date is now.
    pub fn export_document(&self) -> Project {
        Project {
            name: self.project.display_name().to_string(),
            buildings: self.project.buildings.clone(),
            created_date: Utc::now(),
            version: SCHEMA_VERSION.to_string(),
        }
    }

    /// Export the project as pretty JSON.
    pub fn export_project(&self) -> CalcResult<String> {
        let json = file_io::project_to_json(&self.export_document())?;
        tracing::info!(
            name = %self.project.display_name(),
            buildings = self.project.building_count(),
            "project exported"
        );
        Ok(json)
    }

    /// Replace the open project with an imported document.
    ///
    /// On failure the session is untouched.
    pub fn import_project(&mut self, json: &str) -> CalcResult<&Project> {
        let project = file_io::parse_project(json).map_err(|e| {
            tracing::warn!(error = %e, "project import rejected");
            e
        })?;
        Ok(self.replace_project(project))
    }

    /// Save the export document to disk.
    pub fn save_to(&self, path: &Path) -> CalcResult<()> {
        file_io::save_project(&self.export_document(), path)
    }

    /// Load a project file, replacing the open project on success.
    pub fn load_from(&mut self, path: &Path) -> CalcResult<&Project> {
        let project = file_io::load_project(path).map_err(|e| {
            tracing::warn!(error = %e, "project load rejected");
            e
        })?;
        Ok(self.replace_project(project))
    }

    fn replace_project(&mut self, project: Project) -> &Project {
        tracing::info!(
            name = %project.name,
            buildings = project.building_count(),
            "project imported"
        );
        self.project = project;
        self.current_index = 0;
        &self.project
    }

    /// Plain-text summary for the selected building.
    pub fn export_report(&self) -> CalcResult<String> {
        let building = self.current_building().ok_or(CalcError::NoBuilding)?;
        let result = building.results.as_ref().ok_or_else(|| {
            CalcError::invalid_input(
                "building",
                building.name.clone(),
                "Building has not been calculated yet",
            )
        })?;

        let context = ReportContext {
            project_name: self.project.display_name().to_string(),
            building_number: self.current_index + 1,
            building_count: self.project.building_count(),
            date: Utc::now(),
        };
        Ok(render_summary(&context, &building.inputs, result))
    }
}

impl Default for Session {
    fn default() -> Self {
        Session::new(SessionSettings::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tables::{CodeVersion, Occupancy};

    fn valid_input() -> EgressInput {
        EgressInput {
            jurisdiction: Some("Texas".to_string()),
            code_version: Some(CodeVersion::Ibc2021),
            occupancy: Some(Occupancy::Business),
            floor_area: Some(1000.0),
            sprinklered: Some(true),
            travel_distance: Some(200.0),
            exit_doors: Some(2),
        }
    }

    #[test]
    fn test_new_session_uses_settings() {
        let settings = SessionSettings {
            default_units: UnitSystem::Metric,
            show_advanced: true,
            history_limit: 5,
            default_exit_doors: 3,
        };
        let session = Session::new(settings);
        assert_eq!(session.units(), UnitSystem::Metric);
        assert!(session.show_advanced());
        assert_eq!(session.history().limit(), 5);
        assert!(session.current_building().is_none());
    }

    #[test]
    fn test_add_and_navigate_buildings() {
        let mut session = Session::default();
        assert_eq!(session.add_building(), 0);
        assert_eq!(session.add_building(), 1);
        assert_eq!(session.add_building(), 2);
        assert_eq!(session.current_index(), 2);

        assert_eq!(session.next_building(), 2);
        assert_eq!(session.previous_building(), 1);
        assert_eq!(session.previous_building(), 0);
        assert_eq!(session.previous_building(), 0);

        session.select_building(2).unwrap();
        assert_eq!(session.current_building().unwrap().name, "Building 3");
        assert!(session.select_building(3).is_err());
        assert_eq!(session.current_index(), 2);
    }

    #[test]
    fn test_remove_building_keeps_index_in_bounds() {
        let mut session = Session::default();
        session.add_building();
        session.add_building();
        session.add_building();

        // Remove the selected last building
        session.remove_building(2).unwrap();
        assert_eq!(session.current_index(), 1);

        // Remove one before the selection; selection follows its building
        let selected_id = session.current_building().unwrap().id;
        session.remove_building(0).unwrap();
        assert_eq!(session.current_index(), 0);
        assert_eq!(session.current_building().unwrap().id, selected_id);

        session.remove_building(0).unwrap();
        assert_eq!(session.current_index(), 0);
        assert!(session.current_building().is_none());

        assert!(session.remove_building(0).is_err());
    }

    #[test]
    fn test_remove_after_selection_keeps_selection() {
        let mut session = Session::default();
        session.add_building();
        session.add_building();
        session.add_building();
        session.select_building(0).unwrap();

        session.remove_building(2).unwrap();
        assert_eq!(session.current_index(), 0);
    }

    #[test]
    fn test_calculate_without_building() {
        let mut session = Session::default();
        assert_eq!(
            session.calculate_current(valid_input()).unwrap_err(),
            CalcError::NoBuilding
        );
        assert!(session.history().is_empty());
    }

    #[test]
    fn test_calculate_stores_result_and_history() {
        let mut session = Session::default();
        session.set_show_advanced(true);
        session.set_project_name("Harbor Point");
        session.add_building();

        let result = session.calculate_current(valid_input()).unwrap();
        assert_eq!(result.occupant_load, 7);
        assert_eq!(result.door_width, Some(32));

        let building = session.current_building().unwrap();
        assert_eq!(building.results.as_ref(), Some(&result));
        assert_eq!(building.inputs.exit_doors, Some(2));

        let entry = session.history().get(0).unwrap();
        assert_eq!(entry.project_name, "Harbor Point");
        assert_eq!(entry.building_index, 1);
        assert_eq!(entry.results.occupant_load, 7);
    }

    #[test]
    fn test_advanced_inputs_dropped_when_hidden() {
        let mut session = Session::default();
        session.add_building();

        let result = session.calculate_current(valid_input()).unwrap();
        assert_eq!(result.door_width, None);
        assert_eq!(session.current_building().unwrap().inputs.travel_distance, None);
    }

    #[test]
    fn test_failed_calculation_changes_nothing() {
        let mut session = Session::default();
        session.add_building();
        session.calculate_current(valid_input()).unwrap();
        let before = session.current_building().unwrap().clone();

        let mut input = valid_input();
        input.occupancy = None;
        let err = session.calculate_current(input).unwrap_err();
        assert_eq!(err, CalcError::missing_field("occupancy"));

        assert_eq!(session.current_building().unwrap(), &before);
        assert_eq!(session.history().len(), 1);
    }

    #[test]
    fn test_history_capped_through_session() {
        let mut session = Session::default();
        session.add_building();
        for area in 1..=60 {
            let mut input = valid_input();
            input.floor_area = Some(area as f64 * 100.0);
            session.calculate_current(input).unwrap();
        }
        assert_eq!(session.history().len(), 50);
        // Most recent first: 6000 / 150 = 40
        assert_eq!(session.history().get(0).unwrap().results.occupant_load, 40);

        session.clear_history();
        assert!(session.history().is_empty());
    }

    #[test]
    fn test_oversized_history_limit_still_capped() {
        let settings = SessionSettings {
            history_limit: 200,
            ..SessionSettings::default()
        };
        let mut session = Session::new(settings);
        session.add_building();
        for _ in 0..60 {
            session.calculate_current(valid_input()).unwrap();
        }
        assert_eq!(session.history().len(), 50);
    }

    #[test]
    fn test_toggle_units_affects_next_calculation() {
        let mut session = Session::default();
        session.add_building();
        assert_eq!(session.toggle_units(), UnitSystem::Metric);

        let mut input = valid_input();
        input.floor_area = Some(92.903);
        let result = session.calculate_current(input).unwrap();
        assert_eq!(result.units, UnitSystem::Metric);
        assert_eq!(result.occupant_load, 7);

        assert_eq!(session.toggle_units(), UnitSystem::Imperial);
        let stored = session.current_building().unwrap().results.as_ref().unwrap();
        assert_eq!(stored.units, UnitSystem::Metric);
    }

    #[test]
    fn test_export_import_roundtrip() {
        let mut session = Session::default();
        session.set_show_advanced(true);
        session.set_project_name("Harbor Point");
        session.add_building();
        session.calculate_current(valid_input()).unwrap();
        session.add_building();

        let json = session.export_project().unwrap();

        let mut other = Session::default();
        let imported = other.import_project(&json).unwrap();
        assert_eq!(imported.name, "Harbor Point");
        assert_eq!(imported.buildings, session.project().buildings);
        assert_eq!(imported.version, SCHEMA_VERSION);
        assert_eq!(other.current_index(), 0);
    }

    #[test]
    fn test_export_names_untitled_project() {
        let mut session = Session::default();
        session.add_building();
        let json = session.export_project().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["name"], "Untitled Project");
        assert_eq!(value["version"], "2.0");
        assert_eq!(value["buildings"][0]["inputs"], serde_json::json!({}));
    }

    #[test]
    fn test_failed_import_leaves_session_unchanged() {
        let mut session = Session::default();
        session.set_project_name("Keep Me");
        session.add_building();
        session.add_building();
        let before = session.project().clone();

        assert!(session.import_project("{ broken").is_err());

        let wrong_version = r#"{"name":"Old","buildings":[],"created_date":"2024-01-01T00:00:00Z","version":"1.0"}"#;
        assert_eq!(
            session.import_project(wrong_version).unwrap_err().error_code(),
            "VERSION_MISMATCH"
        );

        assert_eq!(session.project(), &before);
        assert_eq!(session.current_index(), 1);
    }

    #[test]
    fn test_new_project_keeps_history_and_units() {
        let mut session = Session::default();
        session.add_building();
        session.calculate_current(valid_input()).unwrap();
        session.toggle_units();

        session.new_project();
        assert_eq!(session.project().building_count(), 0);
        assert_eq!(session.project().name, "");
        assert_eq!(session.history().len(), 1);
        assert_eq!(session.units(), UnitSystem::Metric);
    }

    #[test]
    fn test_export_report() {
        let mut session = Session::default();
        assert_eq!(session.export_report().unwrap_err(), CalcError::NoBuilding);

        session.add_building();
        assert_eq!(session.export_report().unwrap_err().error_code(), "INVALID_INPUT");

        session.calculate_current(valid_input()).unwrap();
        let report = session.export_report().unwrap();
        assert!(report.contains("Project: Untitled Project"));
        assert!(report.contains("Building: 1 of 1"));
        assert!(report.contains("• Occupant Load: 7 occupants"));
    }
}
