//! IBC Chapter 10 (Means of Egress) references cited alongside results.

use serde::{Deserialize, Serialize};

const CHAPTER_10_URL: &str =
    "https://codes.iccsafe.org/content/IBC2021P1/chapter-10-means-of-egress";

/// Code section backing one of the calculator's results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CodeReference {
    /// IBC 1004 - Occupant Load
    OccupantLoad,
    /// IBC 1005 - Egress Width
    EgressWidth,
    /// IBC 1017 - Exit Access Travel Distance
    ExitAccess,
    /// IBC 1010.1.1 - Door Width
    DoorWidth,
}

impl CodeReference {
    pub const ALL: [CodeReference; 4] = [
        CodeReference::OccupantLoad,
        CodeReference::EgressWidth,
        CodeReference::ExitAccess,
        CodeReference::DoorWidth,
    ];

    /// Section number without the "IBC" prefix
    fn section_number(&self) -> &'static str {
        match self {
            CodeReference::OccupantLoad => "1004",
            CodeReference::EgressWidth => "1005",
            CodeReference::ExitAccess => "1017",
            CodeReference::DoorWidth => "1010.1.1",
        }
    }

    /// Section label (e.g., "IBC 1004")
    pub fn section(&self) -> String {
        format!("IBC {}", self.section_number())
    }

    pub fn description(&self) -> &'static str {
        match self {
            CodeReference::OccupantLoad => "Occupant Load",
            CodeReference::EgressWidth => "Egress Width",
            CodeReference::ExitAccess => "Exit Access Travel Distance",
            CodeReference::DoorWidth => "Door Width",
        }
    }

    /// Deep link into the ICC online code
    pub fn link(&self) -> String {
        format!("{}#IBC2021P1_Ch10_Sec{}", CHAPTER_10_URL, self.section_number())
    }

    /// Format the reference for display in reports
    pub fn citation(&self) -> String {
        format!("{} - {}", self.section(), self.description())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_citations() {
        assert_eq!(CodeReference::OccupantLoad.citation(), "IBC 1004 - Occupant Load");
        assert_eq!(CodeReference::DoorWidth.section(), "IBC 1010.1.1");
    }

    #[test]
    fn test_links() {
        assert!(CodeReference::EgressWidth
            .link()
            .ends_with("#IBC2021P1_Ch10_Sec1005"));
        assert!(CodeReference::DoorWidth
            .link()
            .ends_with("#IBC2021P1_Ch10_Sec1010.1.1"));
    }
}
