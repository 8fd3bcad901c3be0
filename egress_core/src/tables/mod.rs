//! # Code Tables
//!
//! Static IBC lookup data used by the calculator:
//!
//! - **Occupant load factors**: (code edition, occupancy) -> sq. ft. per occupant
//! - **Egress width factors**: sprinkler presence -> inches per occupant for
//!   stairs and other egress components
//! - **Jurisdictions** and compliance notices
//! - **Code references** for IBC Chapter 10
//!
//! Tables are stored in imperial units. [`factor`] converts to the session's
//! unit system on the way out.
//!
//! ## Example
//!
//! ```rust
//! use egress_core::tables::{factor, CodeVersion, Occupancy};
//! use egress_core::units::UnitSystem;
//!
//! let f = factor(CodeVersion::Ibc2021, Occupancy::Business, UnitSystem::Imperial);
//! assert_eq!(f, 150.0);
//!
//! let m = factor(CodeVersion::Ibc2021, Occupancy::Business, UnitSystem::Metric);
//! assert!((m - 13.93545).abs() < 1e-9);
//! ```

pub mod jurisdiction;
pub mod occupancy;
pub mod references;

pub use jurisdiction::{code_notice, find_state, US_STATES};
pub use occupancy::{load_factor_sqft, AreaType, CodeVersion, Occupancy};
pub use references::CodeReference;

use serde::{Deserialize, Serialize};

use crate::errors::CalcResult;
use crate::units::{convert, Direction, QuantityKind, UnitSystem};

/// Minimum clear door width in inches (IBC 1010.1.1)
pub const MIN_DOOR_WIDTH_IN: u32 = 32;

/// Egress width factors in inches per occupant (IBC 1005.3)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EgressFactorSet {
    /// Stairways
    pub stairs: f64,
    /// Doors, ramps, corridors and other egress components
    pub other: f64,
}

/// Factors for buildings with an automatic sprinkler system
pub const SPRINKLERED: EgressFactorSet = EgressFactorSet {
    stairs: 0.2,
    other: 0.15,
};

/// Factors for buildings without an automatic sprinkler system
pub const UNSPRINKLERED: EgressFactorSet = EgressFactorSet {
    stairs: 0.3,
    other: 0.2,
};

impl EgressFactorSet {
    /// Select the factor pair for sprinkler presence
    pub fn for_sprinklers(sprinklered: bool) -> Self {
        if sprinklered {
            SPRINKLERED
        } else {
            UNSPRINKLERED
        }
    }
}

/// Occupant load factor for the unit system: sq. ft. per occupant for
/// imperial, sq. m per occupant for metric.
pub fn factor(version: CodeVersion, occupancy: Occupancy, units: UnitSystem) -> f64 {
    let base = load_factor_sqft(version, occupancy);
    match Direction::from_imperial_into(units) {
        Some(direction) => convert(base, QuantityKind::Area, direction),
        None => base,
    }
}

/// String-keyed lookup for callers holding raw option values.
///
/// Fails with `UnknownLookupKey` when either key is not in the table.
pub fn factor_by_name(version: &str, occupancy: &str, units: UnitSystem) -> CalcResult<f64> {
    let version = CodeVersion::from_str_flexible(version)?;
    let occupancy = Occupancy::from_str_flexible(occupancy)?;
    Ok(factor(version, occupancy, units))
}
