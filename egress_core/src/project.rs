//! # Project Data Structures
//!
//! The `Project` struct is the root container saved to and loaded from
//! project JSON files.
//!
//! ## Structure
//!
//! ```text
//! Project
//! ├── name: String
//! ├── buildings: Vec<Building> (insertion order is stable)
//! │   └── Building { id, name, inputs: EgressInput, results: Option<EgressResult> }
//! ├── created_date: ISO-8601 timestamp
//! └── version: schema version ("2.0")
//! ```
//!
//! ## Example
//!
//! ```rust
//! use egress_core::project::Project;
//!
//! let mut project = Project::new("Riverside Offices");
//! project.add_building();
//! project.add_building();
//!
//! assert_eq!(project.buildings[1].name, "Building 2");
//!
//! let json = serde_json::to_string_pretty(&project).unwrap();
//! assert!(json.contains("Riverside Offices"));
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::calculations::{EgressInput, EgressResult};

/// Current schema version for project files
pub const SCHEMA_VERSION: &str = "2.0";

/// Name used in files and reports when the project has none
pub const UNTITLED_PROJECT: &str = "Untitled Project";

/// Root project container.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    /// Project name (may be empty while editing)
    pub name: String,

    /// Buildings in the order they were added
    pub buildings: Vec<Building>,

    /// When this document was created or exported
    pub created_date: DateTime<Utc>,

    /// Schema version (for migration compatibility)
    pub version: String,
}

impl Project {
    /// Create a new empty project.
    pub fn new(name: impl Into<String>) -> Self {
        Project {
            name: name.into(),
            buildings: Vec::new(),
            created_date: Utc::now(),
            version: SCHEMA_VERSION.to_string(),
        }
    }

    /// Name for display and export, falling back to "Untitled Project"
    pub fn display_name(&self) -> &str {
        let name = self.name.trim();
        if name.is_empty() {
            UNTITLED_PROJECT
        } else {
            name
        }
    }

    /// Append a building named "Building {n}" and return its index.
    pub fn add_building(&mut self) -> usize {
        let name = format!("Building {}", self.buildings.len() + 1);
        self.buildings.push(Building::new(name));
        self.buildings.len() - 1
    }

    /// Remove a building by index, keeping the order of the rest.
    pub fn remove_building(&mut self, index: usize) -> Option<Building> {
        if index < self.buildings.len() {
            Some(self.buildings.remove(index))
        } else {
            None
        }
    }

    /// Get a building by index.
    pub fn building(&self, index: usize) -> Option<&Building> {
        self.buildings.get(index)
    }

    /// Get a mutable reference to a building by index.
    pub fn building_mut(&mut self, index: usize) -> Option<&mut Building> {
        self.buildings.get_mut(index)
    }

    pub fn building_count(&self) -> usize {
        self.buildings.len()
    }

    /// Number of buildings with a stored result
    pub fn calculated_count(&self) -> usize {
        self.buildings.iter().filter(|b| b.results.is_some()).count()
    }
}

impl Default for Project {
    fn default() -> Self {
        Project::new("")
    }
}

/// One building within a project.
///
/// Holds at most one input/result pair; the result is replaced on every
/// recalculation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Building {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub inputs: EgressInput,
    #[serde(default)]
    pub results: Option<EgressResult>,
}

impl Building {
    /// Create an uncalculated building with a fresh id.
    pub fn new(name: impl Into<String>) -> Self {
        Building {
            id: Uuid::new_v4(),
            name: name.into(),
            inputs: EgressInput::default(),
            results: None,
        }
    }

    pub fn is_calculated(&self) -> bool {
        self.results.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tables::{CodeVersion, Occupancy};

    #[test]
    fn test_project_creation() {
        let project = Project::new("Riverside");
        assert_eq!(project.name, "Riverside");
        assert_eq!(project.version, SCHEMA_VERSION);
        assert!(project.buildings.is_empty());
    }

    #[test]
    fn test_display_name_fallback() {
        assert_eq!(Project::new("").display_name(), "Untitled Project");
        assert_eq!(Project::new("   ").display_name(), "Untitled Project");
        assert_eq!(Project::new("Depot").display_name(), "Depot");
    }

    #[test]
    fn test_add_remove_building() {
        let mut project = Project::new("Campus");
        assert_eq!(project.add_building(), 0);
        assert_eq!(project.add_building(), 1);
        assert_eq!(project.add_building(), 2);

        let second_id = project.buildings[1].id;
        let removed = project.remove_building(0).unwrap();
        assert_eq!(removed.name, "Building 1");
        assert_eq!(project.building_count(), 2);
        assert_eq!(project.buildings[0].id, second_id);

        assert!(project.remove_building(5).is_none());
    }

    #[test]
    fn test_new_building_serializes_empty_inputs() {
        let building = Building::new("Building 1");
        let json = serde_json::to_value(&building).unwrap();
        assert_eq!(json["inputs"], serde_json::json!({}));
        assert!(json["results"].is_null());
    }

    #[test]
    fn test_project_serialization() {
        let mut project = Project::new("Harbor Point");
        project.add_building();
        if let Some(building) = project.building_mut(0) {
            building.inputs.code_version = Some(CodeVersion::Ibc2015);
            building.inputs.occupancy = Some(Occupancy::Mercantile);
        }

        let json = serde_json::to_string_pretty(&project).unwrap();
        assert!(json.contains("\"created_date\""));
        assert!(json.contains("\"2015\""));
        assert!(json.contains("\"Mercantile\""));

        // Roundtrip
        let roundtrip: Project = serde_json::from_str(&json).unwrap();
        assert_eq!(roundtrip, project);
        assert_eq!(roundtrip.calculated_count(), 0);
    }
}
