//! # egress_core - Egress & Occupant Load Calculation Engine
//!
//! `egress_core` computes occupant load, egress widths and door widths from
//! IBC code tables, and carries the project/session model around them. All
//! inputs and outputs are JSON-serializable.
//!
//! ## Design Philosophy
//!
//! - **Stateless core**: The calculator is pure functions over typed inputs
//! - **Closed tables**: Code editions and occupancies are enums, so every lookup is total
//! - **Explicit state**: Session state is a value the front end owns, not a global
//! - **Rich Errors**: Structured error types, not just strings
//!
//! ## Quick Start
//!
//! ```rust
//! use egress_core::calculations::{egress_widths, occupant_load};
//! use egress_core::tables::{factor, CodeVersion, Occupancy};
//! use egress_core::units::UnitSystem;
//!
//! let f = factor(CodeVersion::Ibc2021, Occupancy::Business, UnitSystem::Imperial);
//! let load = occupant_load(1000.0, f);
//! assert_eq!(load, 7);
//!
//! let widths = egress_widths(load, true);
//! assert_eq!((widths.stairs, widths.other), (2, 2));
//! ```
//!
//! ## Modules
//!
//! - [`tables`] - IBC load factors, egress factors, jurisdictions, references
//! - [`units`] - Imperial/metric conversion
//! - [`calculations`] - Occupant load and egress width calculator
//! - [`report`] - Step breakdown and plain-text summary
//! - [`project`] - Project and building containers
//! - [`history`] - Bounded calculation history
//! - [`session`] - Interactive session state and handlers
//! - [`settings`] - Session defaults
//! - [`file_io`] - Project files with atomic saves
//! - [`errors`] - Structured error types

pub mod calculations;
pub mod errors;
pub mod file_io;
pub mod history;
pub mod project;
pub mod report;
pub mod session;
pub mod settings;
pub mod tables;
pub mod units;

// Re-export commonly used types at crate root for convenience
pub use calculations::{EgressInput, EgressResult};
pub use errors::{CalcError, CalcResult};
pub use file_io::{load_project, save_project};
pub use project::{Building, Project};
pub use session::Session;
pub use settings::SessionSettings;
pub use units::UnitSystem;
