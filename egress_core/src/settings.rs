//! # Session Settings
//!
//! Defaults applied when a session starts. Settings serialize to JSON; any
//! field missing from a settings file takes its default.
//!
//! ```json
//! {
//!   "default_units": "metric",
//!   "show_advanced": true,
//!   "history_limit": 50,
//!   "default_exit_doors": 2
//! }
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};
use crate::history::DEFAULT_HISTORY_LIMIT;
use crate::units::UnitSystem;

/// Session-wide defaults
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionSettings {
    /// Unit system for new sessions
    pub default_units: UnitSystem,

    /// Whether travel distance and exit-door inputs are offered
    pub show_advanced: bool,

    /// Maximum history entries kept (1 to 50)
    pub history_limit: usize,

    /// Exit-door count pre-filled when advanced inputs are shown
    pub default_exit_doors: u32,
}

impl Default for SessionSettings {
    fn default() -> Self {
        SessionSettings {
            default_units: UnitSystem::Imperial,
            show_advanced: false,
            history_limit: DEFAULT_HISTORY_LIMIT,
            default_exit_doors: 2,
        }
    }
}

impl SessionSettings {
    /// Load settings from a JSON file.
    pub fn load(path: &Path) -> CalcResult<Self> {
        let contents = fs::read_to_string(path).map_err(|e| {
            CalcError::file_error("read settings", path.display().to_string(), e.to_string())
        })?;
        let settings: SessionSettings =
            serde_json::from_str(&contents).map_err(|e| CalcError::SerializationError {
                reason: format!("Invalid settings in {}: {}", path.display(), e),
            })?;
        settings.validate()?;
        Ok(settings)
    }

    /// Reject values the session cannot honor.
    pub fn validate(&self) -> CalcResult<()> {
        if !(1..=DEFAULT_HISTORY_LIMIT).contains(&self.history_limit) {
            return Err(CalcError::invalid_input(
                "history_limit",
                self.history_limit.to_string(),
                format!("History limit must be between 1 and {}", DEFAULT_HISTORY_LIMIT),
            ));
        }
        if self.default_exit_doors == 0 {
            return Err(CalcError::invalid_input(
                "default_exit_doors",
                "0",
                "Default exit door count must be at least 1",
            ));
        }
        Ok(())
    }
}
