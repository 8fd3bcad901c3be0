//! # Calculation History
//!
//! Append-only log of past results, most recent first. The log is capped;
//! once full, each new entry evicts the oldest.
//!
//! ## Example
//!
//! ```rust
//! use egress_core::history::History;
//!
//! let history = History::new(50);
//! assert!(history.is_empty());
//! ```

use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::calculations::{EgressInput, EgressResult};
use crate::units::UnitSystem;

/// Default number of entries kept
pub const DEFAULT_HISTORY_LIMIT: usize = 50;

/// Result figures captured in a history snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultSnapshot {
    pub occupant_load: u32,
    pub stair_width: u32,
    pub other_width: u32,
    pub door_width: Option<u32>,
    pub total_width: Option<u32>,
}

impl From<&EgressResult> for ResultSnapshot {
    fn from(result: &EgressResult) -> Self {
        ResultSnapshot {
            occupant_load: result.occupant_load,
            stair_width: result.stair_width,
            other_width: result.other_width,
            door_width: result.door_width,
            total_width: result.total_width,
        }
    }
}

/// One past calculation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: Uuid,
    pub date: DateTime<Utc>,
    pub project_name: String,
    /// 1-based position of the building at calculation time
    pub building_index: usize,
    pub inputs: EgressInput,
    pub results: ResultSnapshot,
    pub units: UnitSystem,
}

impl HistoryEntry {
    /// Snapshot a calculation taken now.
    pub fn new(
        project_name: impl Into<String>,
        building_index: usize,
        inputs: &EgressInput,
        result: &EgressResult,
    ) -> Self {
        HistoryEntry {
            id: Uuid::new_v4(),
            date: Utc::now(),
            project_name: project_name.into(),
            building_index,
            inputs: inputs.clone(),
            results: ResultSnapshot::from(result),
            units: result.units,
        }
    }

    /// One-line heading ("Project - Building 2 (2026-10-19 14:03)")
    pub fn title(&self) -> String {
        format!(
            "{} - Building {} ({})",
            self.project_name,
            self.building_index,
            self.date.format("%Y-%m-%d %H:%M")
        )
    }
}

/// Most-recent-first bounded history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct History {
    entries: VecDeque<HistoryEntry>,
    limit: usize,
}

impl History {
    /// Create an empty history holding at most `limit` entries, clamped to
    /// `1..=DEFAULT_HISTORY_LIMIT`.
    pub fn new(limit: usize) -> Self {
        let limit = limit.clamp(1, DEFAULT_HISTORY_LIMIT);
        History {
            entries: VecDeque::with_capacity(limit),
            limit,
        }
    }

    /// Insert at the front, evicting the oldest entry when over the limit.
    ///
    /// Returns the evicted entry, if any.
    pub fn push(&mut self, entry: HistoryEntry) -> Option<HistoryEntry> {
        self.entries.push_front(entry);
        if self.entries.len() > self.limit {
            self.entries.pop_back()
        } else {
            None
        }
    }

    /// Entries, most recent first
    pub fn entries(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter()
    }

    /// The `n` most recent entries
    pub fn recent(&self, n: usize) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter().take(n)
    }

    pub fn get(&self, index: usize) -> Option<&HistoryEntry> {
        self.entries.get(index)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl Default for History {
    fn default() -> Self {
        History::new(DEFAULT_HISTORY_LIMIT)
    }
}
