//! # Calculations
//!
//! Each calculation follows the pattern:
//!
//! - `*Input` - Input parameters (JSON-serializable)
//! - `*Result` - Calculation results (JSON-serializable)
//! - `calculate(input, units) -> Result<*Result, CalcError>` - Pure calculation function
//!
//! ## Available Calculations
//!
//! - [`egress`] - Occupant load, egress widths and door width (IBC 1004/1005)

pub mod egress;

// Re-export commonly used types
pub use egress::{
    calculate, door_width, egress_widths, occupant_load, EgressInput, EgressParams, EgressResult,
    EgressWidths,
};
