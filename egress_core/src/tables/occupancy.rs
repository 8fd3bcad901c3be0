//! IBC Occupant Load Factors (IBC Table 1004.5)
//!
//! Area per occupant in square feet, by code edition and occupancy
//! classification. Only the editions and classifications offered by the
//! calculator are tabulated; both keys are closed enums so every lookup is
//! total.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};

/// IBC code edition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CodeVersion {
    #[serde(rename = "2012")]
    Ibc2012,
    #[serde(rename = "2015")]
    Ibc2015,
    #[serde(rename = "2018")]
    Ibc2018,
    #[serde(rename = "2021")]
    Ibc2021,
}

impl CodeVersion {
    /// All editions, newest first (the order offered to the user)
    pub const ALL: [CodeVersion; 4] = [
        CodeVersion::Ibc2021,
        CodeVersion::Ibc2018,
        CodeVersion::Ibc2015,
        CodeVersion::Ibc2012,
    ];

    /// Edition year as used in file keys (e.g., "2021")
    pub fn code(&self) -> &'static str {
        match self {
            CodeVersion::Ibc2012 => "2012",
            CodeVersion::Ibc2015 => "2015",
            CodeVersion::Ibc2018 => "2018",
            CodeVersion::Ibc2021 => "2021",
        }
    }

    /// Parse "2021", "IBC 2021", "ibc2021", ...
    pub fn from_str_flexible(s: &str) -> CalcResult<Self> {
        let normalized = s.trim().to_uppercase().replace([' ', '-', '_'], "");
        let year = normalized.strip_prefix("IBC").unwrap_or(&normalized);
        CodeVersion::ALL
            .into_iter()
            .find(|v| v.code() == year)
            .ok_or_else(|| CalcError::unknown_key("code version", s))
    }

    /// Get display name
    pub fn display_name(&self) -> String {
        format!("IBC {}", self.code())
    }
}

impl std::fmt::Display for CodeVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Occupancy classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Occupancy {
    #[serde(rename = "Assembly (Less Concentrated)")]
    AssemblyLessConcentrated,
    #[serde(rename = "Assembly (Standing Space)")]
    AssemblyStandingSpace,
    Business,
    Educational,
    Mercantile,
    Residential,
}

impl Occupancy {
    /// All occupancies in option-list order
    pub const ALL: [Occupancy; 6] = [
        Occupancy::AssemblyLessConcentrated,
        Occupancy::AssemblyStandingSpace,
        Occupancy::Business,
        Occupancy::Educational,
        Occupancy::Mercantile,
        Occupancy::Residential,
    ];

    /// Get display name (also the persisted key)
    pub fn display_name(&self) -> &'static str {
        match self {
            Occupancy::AssemblyLessConcentrated => "Assembly (Less Concentrated)",
            Occupancy::AssemblyStandingSpace => "Assembly (Standing Space)",
            Occupancy::Business => "Business",
            Occupancy::Educational => "Educational",
            Occupancy::Mercantile => "Mercantile",
            Occupancy::Residential => "Residential",
        }
    }

    /// Whether the load factor applies to net or gross floor area
    pub fn area_type(&self) -> AreaType {
        match self {
            Occupancy::AssemblyLessConcentrated
            | Occupancy::AssemblyStandingSpace
            | Occupancy::Educational => AreaType::Net,
            Occupancy::Business | Occupancy::Mercantile | Occupancy::Residential => AreaType::Gross,
        }
    }

    /// Parse from display names and short forms ("business", "assembly-standing", ...)
    pub fn from_str_flexible(s: &str) -> CalcResult<Self> {
        OCCUPANCY_BY_NAME
            .get(normalize_key(s).as_str())
            .copied()
            .ok_or_else(|| CalcError::unknown_key("occupancy", s))
    }
}

impl std::fmt::Display for Occupancy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

fn normalize_key(s: &str) -> String {
    s.chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect::<String>()
        .to_lowercase()
}

/// Occupancy lookup index keyed by normalized name
static OCCUPANCY_BY_NAME: Lazy<HashMap<String, Occupancy>> = Lazy::new(|| {
    let mut index: HashMap<String, Occupancy> = Occupancy::ALL
        .iter()
        .map(|o| (normalize_key(o.display_name()), *o))
        .collect();

    for (alias, occupancy) in [
        ("assembly-less-concentrated", Occupancy::AssemblyLessConcentrated),
        ("assembly-less", Occupancy::AssemblyLessConcentrated),
        ("assembly-standing", Occupancy::AssemblyStandingSpace),
        ("standing", Occupancy::AssemblyStandingSpace),
        ("a", Occupancy::AssemblyLessConcentrated),
        ("b", Occupancy::Business),
        ("e", Occupancy::Educational),
        ("m", Occupancy::Mercantile),
        ("r", Occupancy::Residential),
    ] {
        index.insert(normalize_key(alias), occupancy);
    }
    index
});

/// Floor area basis for an occupant load factor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AreaType {
    Net,
    Gross,
}

impl AreaType {
    /// Explanation shown next to the floor-area field
    pub fn hint(&self) -> &'static str {
        match self {
            AreaType::Net => {
                "Net area excludes non-occupiable spaces like mechanical rooms, stairs, and walls."
            }
            AreaType::Gross => "Gross area includes the entire floor area within the exterior walls.",
        }
    }
}

impl std::fmt::Display for AreaType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AreaType::Net => write!(f, "Net"),
            AreaType::Gross => write!(f, "Gross"),
        }
    }
}

/// Base occupant load factor in sq. ft. per occupant.
///
/// Business dropped from 100 to 150 sq. ft. per occupant in the 2018 edition;
/// every other row is unchanged across the tabulated editions.
pub fn load_factor_sqft(version: CodeVersion, occupancy: Occupancy) -> f64 {
    match occupancy {
        Occupancy::AssemblyLessConcentrated => 15.0,
        Occupancy::AssemblyStandingSpace => 5.0,
        Occupancy::Business => match version {
            CodeVersion::Ibc2018 | CodeVersion::Ibc2021 => 150.0,
            CodeVersion::Ibc2012 | CodeVersion::Ibc2015 => 100.0,
        },
        Occupancy::Educational => 20.0,
        Occupancy::Mercantile => 60.0,
        Occupancy::Residential => 200.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_business_factor_by_edition() {
        assert_eq!(load_factor_sqft(CodeVersion::Ibc2021, Occupancy::Business), 150.0);
        assert_eq!(load_factor_sqft(CodeVersion::Ibc2018, Occupancy::Business), 150.0);
        assert_eq!(load_factor_sqft(CodeVersion::Ibc2015, Occupancy::Business), 100.0);
        assert_eq!(load_factor_sqft(CodeVersion::Ibc2012, Occupancy::Business), 100.0);
    }

    #[test]
    fn test_all_factors_positive() {
        for version in CodeVersion::ALL {
            for occupancy in Occupancy::ALL {
                assert!(load_factor_sqft(version, occupancy) > 0.0);
            }
        }
    }

    #[test]
    fn test_area_types() {
        assert_eq!(Occupancy::Educational.area_type(), AreaType::Net);
        assert_eq!(Occupancy::AssemblyStandingSpace.area_type(), AreaType::Net);
        assert_eq!(Occupancy::Mercantile.area_type(), AreaType::Gross);
        assert!(AreaType::Net.hint().starts_with("Net area"));
    }

    #[test]
    fn test_code_version_parsing() {
        assert_eq!(CodeVersion::from_str_flexible("2018").unwrap(), CodeVersion::Ibc2018);
        assert_eq!(CodeVersion::from_str_flexible("IBC 2015").unwrap(), CodeVersion::Ibc2015);
        assert_eq!(CodeVersion::from_str_flexible("ibc-2012").unwrap(), CodeVersion::Ibc2012);

        let err = CodeVersion::from_str_flexible("2009").unwrap_err();
        assert_eq!(err.error_code(), "UNKNOWN_LOOKUP_KEY");
    }

    #[test]
    fn test_occupancy_parsing() {
        assert_eq!(
            Occupancy::from_str_flexible("Assembly (Standing Space)").unwrap(),
            Occupancy::AssemblyStandingSpace
        );
        assert_eq!(Occupancy::from_str_flexible("business").unwrap(), Occupancy::Business);
        assert_eq!(
            Occupancy::from_str_flexible("assembly-less").unwrap(),
            Occupancy::AssemblyLessConcentrated
        );
        assert!(Occupancy::from_str_flexible("Hazardous").is_err());
    }

    #[test]
    fn test_serialization_uses_display_keys() {
        let json = serde_json::to_string(&Occupancy::AssemblyLessConcentrated).unwrap();
        assert_eq!(json, "\"Assembly (Less Concentrated)\"");
        assert_eq!(serde_json::to_string(&CodeVersion::Ibc2021).unwrap(), "\"2021\"");

        let parsed: CodeVersion = serde_json::from_str("\"2015\"").unwrap();
        assert_eq!(parsed, CodeVersion::Ibc2015);
    }
}
