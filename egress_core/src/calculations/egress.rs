//! # Egress & Occupant Load Calculation
//!
//! Occupant load per IBC 1004 and egress capacity per IBC 1005.
//!
//! ## Method
//!
//! 1. Occupant load = ceil(floor area / load factor)
//! 2. Stair width = ceil(occupant load x stair factor)
//! 3. Other components width = ceil(occupant load x other factor)
//! 4. Door width per door = max(ceil(other width / exit doors), 32 in)
//!
//! Widths are always in inches. The floor area and load factor share the
//! session's unit system, so the occupant load is the same either way.
//!
//! ## Example
//!
//! ```rust
//! use egress_core::calculations::egress::{calculate, EgressInput};
//! use egress_core::tables::{CodeVersion, Occupancy};
//! use egress_core::units::UnitSystem;
//!
//! let input = EgressInput {
//!     jurisdiction: Some("Texas".to_string()),
//!     code_version: Some(CodeVersion::Ibc2021),
//!     occupancy: Some(Occupancy::Business),
//!     floor_area: Some(1000.0),
//!     sprinklered: Some(true),
//!     travel_distance: None,
//!     exit_doors: Some(2),
//! };
//!
//! let result = calculate(&input, UnitSystem::Imperial).unwrap();
//! assert_eq!(result.occupant_load, 7);
//! assert_eq!(result.stair_width, 2);
//! assert_eq!(result.door_width, Some(32));
//! ```

use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};
use crate::tables::{self, CodeVersion, EgressFactorSet, Occupancy, MIN_DOOR_WIDTH_IN};
use crate::units::UnitSystem;

/// Inputs for one building, as entered on the form.
///
/// Every field is optional so a building that has not been calculated yet
/// serializes as `{}`. [`EgressInput::validate`] enforces the required ones.
///
/// ## JSON Example
///
/// ```json
/// {
///   "jurisdiction": "Texas",
///   "code_version": "2021",
///   "occupancy": "Business",
///   "floor_area": 1000.0,
///   "sprinklered": true,
///   "exit_doors": 2
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EgressInput {
    /// State or local jurisdiction
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jurisdiction: Option<String>,

    /// IBC edition
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code_version: Option<CodeVersion>,

    /// Occupancy classification
    #[serde(skip_serializing_if = "Option::is_none")]
    pub occupancy: Option<Occupancy>,

    /// Floor area in the session's unit system (sq. ft. or sq. m)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub floor_area: Option<f64>,

    /// Automatic sprinkler system present
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sprinklered: Option<bool>,

    /// Maximum travel distance (ft or m). Recorded and reported only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub travel_distance: Option<f64>,

    /// Number of exit doors for the per-door width
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exit_doors: Option<u32>,
}

/// Validated inputs with every required field present.
#[derive(Debug, Clone, PartialEq)]
pub struct EgressParams {
    pub jurisdiction: String,
    pub code_version: CodeVersion,
    pub occupancy: Occupancy,
    pub floor_area: f64,
    pub sprinklered: bool,
    pub travel_distance: Option<f64>,
    pub exit_doors: Option<u32>,
}

impl EgressInput {
    /// Check required fields and ranges.
    ///
    /// Required fields are checked in form order; the first missing one is
    /// reported.
    pub fn validate(&self) -> CalcResult<EgressParams> {
        let jurisdiction = self
            .jurisdiction
            .as_deref()
            .map(str::trim)
            .filter(|j| !j.is_empty())
            .ok_or_else(|| CalcError::missing_field("jurisdiction"))?;
        let code_version = self
            .code_version
            .ok_or_else(|| CalcError::missing_field("code_version"))?;
        let occupancy = self
            .occupancy
            .ok_or_else(|| CalcError::missing_field("occupancy"))?;
        let floor_area = self
            .floor_area
            .ok_or_else(|| CalcError::missing_field("floor_area"))?;
        let sprinklered = self
            .sprinklered
            .ok_or_else(|| CalcError::missing_field("sprinklered"))?;

        if !floor_area.is_finite() || floor_area <= 0.0 {
            return Err(CalcError::invalid_input(
                "floor_area",
                floor_area.to_string(),
                "Floor area must be positive",
            ));
        }
        if let Some(distance) = self.travel_distance {
            if !distance.is_finite() || distance < 0.0 {
                return Err(CalcError::invalid_input(
                    "travel_distance",
                    distance.to_string(),
                    "Travel distance cannot be negative",
                ));
            }
        }
        if self.exit_doors == Some(0) {
            return Err(CalcError::invalid_input(
                "exit_doors",
                "0",
                "At least one exit door is required",
            ));
        }

        Ok(EgressParams {
            jurisdiction: jurisdiction.to_string(),
            code_version,
            occupancy,
            floor_area,
            sprinklered,
            travel_distance: self.travel_distance,
            exit_doors: self.exit_doors,
        })
    }
}

/// Required egress widths in inches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EgressWidths {
    pub stairs: u32,
    pub other: u32,
}

/// Results from an egress calculation.
///
/// ## JSON Example
///
/// ```json
/// {
///   "occupant_load": 7,
///   "occupant_load_factor": 150.0,
///   "stair_width": 2,
///   "other_width": 2,
///   "door_width": 32,
///   "total_width": 2,
///   "units": "imperial"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EgressResult {
    /// Design occupant load (people)
    pub occupant_load: u32,

    /// Load factor used, in the result's unit system (area per occupant)
    pub occupant_load_factor: f64,

    /// Required stair width (in)
    pub stair_width: u32,

    /// Required width of doors, ramps and corridors (in)
    pub other_width: u32,

    /// Minimum width per exit door (in), when a door count was given
    #[serde(default)]
    pub door_width: Option<u32>,

    /// Total required exit width (in), when a door count was given
    #[serde(default)]
    pub total_width: Option<u32>,

    /// Unit system the floor area and load factor were entered in
    pub units: UnitSystem,
}

impl EgressResult {
    pub fn widths(&self) -> EgressWidths {
        EgressWidths {
            stairs: self.stair_width,
            other: self.other_width,
        }
    }
}

/// Ceiling that ignores floating-point noise below 1e-9.
///
/// `7.0 * 0.2` is `1.4000000000000001` and `10.0 * 0.3` is
/// `3.0000000000000004`; the second must round to 3, not 4.
fn ceil_to_count(x: f64) -> u32 {
    let snapped = (x * 1e9).round() / 1e9;
    snapped.ceil() as u32
}

/// Occupant load = ceil(area / factor).
///
/// `factor` must be positive; [`calculate`] guarantees this for table factors.
/// Loads beyond `u32::MAX` saturate; [`calculate`] rejects them first.
pub fn occupant_load(area: f64, factor: f64) -> u32 {
    (area / factor).ceil() as u32
}

/// Reject a floor area whose occupant load does not fit in a `u32`.
fn check_load_range(area: f64, factor: f64) -> CalcResult<()> {
    if (area / factor).ceil() > f64::from(u32::MAX) {
        return Err(CalcError::invalid_input(
            "floor_area",
            area.to_string(),
            format!("Occupant load exceeds {}", u32::MAX),
        ));
    }
    Ok(())
}

/// Stair and other-component widths, each rounded up independently.
pub fn egress_widths(occupant_load: u32, sprinklered: bool) -> EgressWidths {
    let factors = EgressFactorSet::for_sprinklers(sprinklered);
    let load = f64::from(occupant_load);
    EgressWidths {
        stairs: ceil_to_count(load * factors.stairs),
        other: ceil_to_count(load * factors.other),
    }
}

/// Minimum width per exit door: the other-components width split across
/// `num_exits` doors, never below 32 inches.
///
/// `num_exits` must be at least 1.
pub fn door_width(occupant_load: u32, num_exits: u32, sprinklered: bool) -> u32 {
    let total = egress_widths(occupant_load, sprinklered).other;
    total.div_ceil(num_exits).max(MIN_DOOR_WIDTH_IN)
}

/// Run the full calculation for one building.
///
/// # Errors
///
/// * `MissingField` - a required input is absent; nothing is computed
/// * `InvalidInput` - non-positive area, negative travel distance, zero doors,
///   or an area whose occupant load does not fit in a `u32`
pub fn calculate(input: &EgressInput, units: UnitSystem) -> CalcResult<EgressResult> {
    let params = input.validate()?;

    let factor = tables::factor(params.code_version, params.occupancy, units);
    check_load_range(params.floor_area, factor)?;
    let load = occupant_load(params.floor_area, factor);
    let widths = egress_widths(load, params.sprinklered);

    let (door, total) = match params.exit_doors {
        Some(doors) => (
            Some(door_width(load, doors, params.sprinklered)),
            Some(widths.other),
        ),
        None => (None, None),
    };

    tracing::debug!(
        code_version = %params.code_version,
        occupancy = %params.occupancy,
        floor_area = params.floor_area,
        factor,
        occupant_load = load,
        stair_width = widths.stairs,
        other_width = widths.other,
        "egress calculation complete"
    );

    Ok(EgressResult {
        occupant_load: load,
        occupant_load_factor: factor,
        stair_width: widths.stairs,
        other_width: widths.other,
        door_width: door,
        total_width: total,
        units,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn business_input() -> EgressInput {
        EgressInput {
            jurisdiction: Some("Ohio".to_string()),
            code_version: Some(CodeVersion::Ibc2021),
            occupancy: Some(Occupancy::Business),
            floor_area: Some(1000.0),
            sprinklered: Some(true),
            travel_distance: None,
            exit_doors: None,
        }
    }

    #[test]
    fn test_occupant_load_rounds_up() {
        // 1000 / 150 = 6.67
        assert_eq!(occupant_load(1000.0, 150.0), 7);
        assert_eq!(occupant_load(300.0, 15.0), 20);
        assert_eq!(occupant_load(1.0, 200.0), 1);
    }

    #[test]
    fn test_occupant_load_never_rounds_down() {
        // quotient is 1.0000000004
        assert_eq!(occupant_load(150.00000006, 150.0), 2);
        assert_eq!(occupant_load(150.0, 150.0), 1);
    }

    #[test]
    fn test_oversized_area_rejected() {
        let mut input = business_input();
        input.occupancy = Some(Occupancy::AssemblyStandingSpace);
        input.floor_area = Some(1e12);
        let err = calculate(&input, UnitSystem::Imperial).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_INPUT");

        // 5 * u32::MAX sq. ft. is exactly the largest load that fits
        input.floor_area = Some(5.0 * f64::from(u32::MAX));
        let result = calculate(&input, UnitSystem::Imperial).unwrap();
        assert_eq!(result.occupant_load, u32::MAX);
    }

    #[test]
    fn test_occupant_load_monotonic_in_area() {
        for version in CodeVersion::ALL {
            for occupancy in Occupancy::ALL {
                for units in [UnitSystem::Imperial, UnitSystem::Metric] {
                    let f = tables::factor(version, occupancy, units);
                    let mut previous = 0;
                    for step in 1..=400 {
                        let area = step as f64 * 7.5;
                        let load = occupant_load(area, f);
                        assert!(load >= previous, "{} {} area={}", version, occupancy, area);
                        assert!(f64::from(load) >= (area / f).ceil());
                        previous = load;
                    }
                }
            }
        }
    }

    #[test]
    fn test_egress_widths_sprinklered() {
        assert_eq!(egress_widths(7, true), EgressWidths { stairs: 2, other: 2 });
    }

    #[test]
    fn test_egress_widths_unsprinklered() {
        assert_eq!(egress_widths(7, false), EgressWidths { stairs: 3, other: 2 });
    }

    #[test]
    fn test_exact_products_do_not_round_up() {
        // 10 * 0.3 is 3.0000000000000004 in f64
        assert_eq!(egress_widths(10, false).stairs, 3);
        assert_eq!(egress_widths(20, true).other, 3);
        assert_eq!(egress_widths(100, false), EgressWidths { stairs: 30, other: 20 });
    }

    #[test]
    fn test_door_width_minimum() {
        // other = ceil(50 * 0.15) = 8, 8 / 2 = 4, clamped to 32
        assert_eq!(door_width(50, 2, true), 32);
    }

    #[test]
    fn test_door_width_above_minimum() {
        // other = ceil(500 * 0.2) = 100, 100 / 3 = 33.3 -> 34
        assert_eq!(door_width(500, 3, false), 34);
        assert_eq!(door_width(500, 1, true), 75);
    }

    #[test]
    fn test_calculate_full() {
        let mut input = business_input();
        input.exit_doors = Some(2);
        let result = calculate(&input, UnitSystem::Imperial).unwrap();

        assert_eq!(result.occupant_load, 7);
        assert_eq!(result.occupant_load_factor, 150.0);
        assert_eq!(result.stair_width, 2);
        assert_eq!(result.other_width, 2);
        assert_eq!(result.door_width, Some(32));
        assert_eq!(result.total_width, Some(2));
        assert_eq!(result.units, UnitSystem::Imperial);
    }

    #[test]
    fn test_calculate_without_doors_skips_door_width() {
        let result = calculate(&business_input(), UnitSystem::Imperial).unwrap();
        assert_eq!(result.door_width, None);
        assert_eq!(result.total_width, None);
    }

    #[test]
    fn test_calculate_metric_matches_imperial_load() {
        let mut input = business_input();
        input.floor_area = Some(92.903); // 1000 sq. ft.
        let result = calculate(&input, UnitSystem::Metric).unwrap();
        assert_eq!(result.occupant_load, 7);
        assert_eq!(result.units, UnitSystem::Metric);
        assert!((result.occupant_load_factor - 13.93545).abs() < 1e-9);
    }

    #[test]
    fn test_missing_fields_reported_in_form_order() {
        let err = calculate(&EgressInput::default(), UnitSystem::Imperial).unwrap_err();
        assert_eq!(err, CalcError::missing_field("jurisdiction"));

        let mut input = business_input();
        input.jurisdiction = Some("   ".to_string());
        assert_eq!(
            calculate(&input, UnitSystem::Imperial).unwrap_err(),
            CalcError::missing_field("jurisdiction")
        );

        let mut input = business_input();
        input.occupancy = None;
        input.sprinklered = None;
        assert_eq!(
            calculate(&input, UnitSystem::Imperial).unwrap_err(),
            CalcError::missing_field("occupancy")
        );

        let mut input = business_input();
        input.sprinklered = None;
        assert_eq!(
            calculate(&input, UnitSystem::Imperial).unwrap_err(),
            CalcError::missing_field("sprinklered")
        );
    }

    #[test]
    fn test_invalid_values_rejected() {
        let mut input = business_input();
        input.floor_area = Some(0.0);
        assert_eq!(calculate(&input, UnitSystem::Imperial).unwrap_err().error_code(), "INVALID_INPUT");

        let mut input = business_input();
        input.exit_doors = Some(0);
        assert_eq!(calculate(&input, UnitSystem::Imperial).unwrap_err().error_code(), "INVALID_INPUT");

        let mut input = business_input();
        input.travel_distance = Some(-10.0);
        assert!(calculate(&input, UnitSystem::Imperial).is_err());
    }

    #[test]
    fn test_empty_input_serializes_as_empty_object() {
        let json = serde_json::to_string(&EgressInput::default()).unwrap();
        assert_eq!(json, "{}");

        let parsed: EgressInput = serde_json::from_str("{}").unwrap();
        assert_eq!(parsed, EgressInput::default());
    }
}
