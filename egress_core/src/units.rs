//! # Unit Conversion
//!
//! Imperial/metric conversion for the three quantity kinds the calculator
//! displays: floor area, travel distance (length) and egress width.
//!
//! Two entry points share the same constants:
//!
//! - [`convert`] / [`convert_named`] - scalar conversion by kind and direction.
//!   Zero values and unrecognized keys are returned unchanged.
//! - Newtype wrappers (`SqFt`, `SqM`, `Feet`, `Meters`, `Inches`,
//!   `Millimeters`) that convert with `From`.
//!
//! Code tables are stored in imperial units; metric values are derived.
//!
//! ## Example
//!
//! ```rust
//! use egress_core::units::{convert, Direction, QuantityKind, SqFt, SqM};
//!
//! let sqm = convert(1000.0, QuantityKind::Area, Direction::ToMetric);
//! assert!((sqm - 92.903).abs() < 1e-9);
//!
//! let area: SqM = SqFt(1000.0).into();
//! assert!((area.0 - 92.903).abs() < 1e-9);
//! ```

use serde::{Deserialize, Serialize};
use std::ops::{Add, Div, Mul, Sub};

// ============================================================================
// Conversion Constants
// ============================================================================

/// Square feet to square meters
pub const SQFT_TO_SQM: f64 = 0.092903;
/// Square meters to square feet
pub const SQM_TO_SQFT: f64 = 10.7639;
/// Feet to meters
pub const FT_TO_M: f64 = 0.3048;
/// Meters to feet
pub const M_TO_FT: f64 = 3.28084;
/// Inches to millimeters
pub const IN_TO_MM: f64 = 25.4;
/// Millimeters to inches
pub const MM_TO_IN: f64 = 0.0393701;

// ============================================================================
// Unit System
// ============================================================================

/// Measurement system selected for the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitSystem {
    #[default]
    Imperial,
    Metric,
}

impl UnitSystem {
    /// The other system
    pub fn toggled(self) -> Self {
        match self {
            UnitSystem::Imperial => UnitSystem::Metric,
            UnitSystem::Metric => UnitSystem::Imperial,
        }
    }

    pub fn is_metric(self) -> bool {
        self == UnitSystem::Metric
    }

    /// Area label ("sq. ft." / "sq. m")
    pub fn area_label(self) -> &'static str {
        match self {
            UnitSystem::Imperial => "sq. ft.",
            UnitSystem::Metric => "sq. m",
        }
    }

    /// Distance label ("ft" / "m")
    pub fn distance_label(self) -> &'static str {
        match self {
            UnitSystem::Imperial => "ft",
            UnitSystem::Metric => "m",
        }
    }

    /// Width label ("inches" / "mm")
    pub fn width_label(self) -> &'static str {
        match self {
            UnitSystem::Imperial => "inches",
            UnitSystem::Metric => "mm",
        }
    }

    /// Title-case name for reports
    pub fn display_name(self) -> &'static str {
        match self {
            UnitSystem::Imperial => "Imperial",
            UnitSystem::Metric => "Metric",
        }
    }
}

impl std::fmt::Display for UnitSystem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

// ============================================================================
// Scalar Conversion
// ============================================================================

/// Kind of quantity being converted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuantityKind {
    /// sq. ft. <-> sq. m
    Area,
    /// ft <-> m
    Length,
    /// inches <-> mm
    Width,
}

impl QuantityKind {
    /// Parse the lowercase key ("area", "length", "width")
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "area" => Some(QuantityKind::Area),
            "length" => Some(QuantityKind::Length),
            "width" => Some(QuantityKind::Width),
            _ => None,
        }
    }

    /// Multiplier for the given direction
    pub fn factor(self, direction: Direction) -> f64 {
        match (self, direction) {
            (QuantityKind::Area, Direction::ToMetric) => SQFT_TO_SQM,
            (QuantityKind::Area, Direction::ToImperial) => SQM_TO_SQFT,
            (QuantityKind::Length, Direction::ToMetric) => FT_TO_M,
            (QuantityKind::Length, Direction::ToImperial) => M_TO_FT,
            (QuantityKind::Width, Direction::ToMetric) => IN_TO_MM,
            (QuantityKind::Width, Direction::ToImperial) => MM_TO_IN,
        }
    }
}

/// Conversion direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    ToMetric,
    ToImperial,
}

impl Direction {
    /// Parse the snake_case key ("to_metric", "to_imperial")
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "to_metric" => Some(Direction::ToMetric),
            "to_imperial" => Some(Direction::ToImperial),
            _ => None,
        }
    }

    /// Direction that takes imperial values into `units`, if any conversion is needed
    pub fn from_imperial_into(units: UnitSystem) -> Option<Self> {
        units.is_metric().then_some(Direction::ToMetric)
    }
}

/// Convert `value` by a fixed multiplier for the kind/direction pair.
///
/// Zero is returned unchanged.
pub fn convert(value: f64, kind: QuantityKind, direction: Direction) -> f64 {
    if value == 0.0 {
        return value;
    }
    value * kind.factor(direction)
}

/// String-keyed variant of [`convert`].
///
/// Unrecognized `kind` or `direction` keys pass the value through unchanged
/// rather than failing.
///
/// ```rust
/// use egress_core::units::convert_named;
///
/// assert_eq!(convert_named(12.0, "volume", "to_metric"), 12.0);
/// assert!((convert_named(10.0, "width", "to_metric") - 254.0).abs() < 1e-9);
/// ```
pub fn convert_named(value: f64, kind: &str, direction: &str) -> f64 {
    match (QuantityKind::from_name(kind), Direction::from_name(direction)) {
        (Some(kind), Some(direction)) => convert(value, kind, direction),
        _ => value,
    }
}

// ============================================================================
// Typed Quantities
// ============================================================================

/// Area in square feet
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SqFt(pub f64);

/// Area in square meters
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SqM(pub f64);

/// Length in feet
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Feet(pub f64);

/// Length in meters
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Meters(pub f64);

/// Width in inches
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Inches(pub f64);

/// Width in millimeters
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Millimeters(pub f64);

macro_rules! impl_conversion {
    ($imperial:ty, $metric:ty, $kind:expr) => {
        impl From<$imperial> for $metric {
            fn from(v: $imperial) -> Self {
                Self(convert(v.0, $kind, Direction::ToMetric))
            }
        }

        impl From<$metric> for $imperial {
            fn from(v: $metric) -> Self {
                Self(convert(v.0, $kind, Direction::ToImperial))
            }
        }
    };
}

impl_conversion!(SqFt, SqM, QuantityKind::Area);
impl_conversion!(Feet, Meters, QuantityKind::Length);
impl_conversion!(Inches, Millimeters, QuantityKind::Width);

// ============================================================================
// Arithmetic Implementations (macro to reduce boilerplate)
// ============================================================================

macro_rules! impl_arithmetic {
    ($type:ty) => {
        impl Add for $type {
            type Output = Self;
            fn add(self, rhs: Self) -> Self::Output {
                Self(self.0 + rhs.0)
            }
        }

        impl Sub for $type {
            type Output = Self;
            fn sub(self, rhs: Self) -> Self::Output {
                Self(self.0 - rhs.0)
            }
        }

        impl Mul<f64> for $type {
            type Output = Self;
            fn mul(self, rhs: f64) -> Self::Output {
                Self(self.0 * rhs)
            }
        }

        impl Div<f64> for $type {
            type Output = Self;
            fn div(self, rhs: f64) -> Self::Output {
                Self(self.0 / rhs)
            }
        }

        impl $type {
            /// Get the raw f64 value
            pub fn value(self) -> f64 {
                self.0
            }

            /// Create from raw f64 value
            pub fn new(value: f64) -> Self {
                Self(value)
            }
        }
    };
}

impl_arithmetic!(SqFt);
impl_arithmetic!(SqM);
impl_arithmetic!(Feet);
impl_arithmetic!(Meters);
impl_arithmetic!(Inches);
impl_arithmetic!(Millimeters);
