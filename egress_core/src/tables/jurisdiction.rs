//! Jurisdictions offered for selection and the compliance notice shown with
//! each result.

/// US states in option-list order (Texas first, then alphabetical)
pub const US_STATES: [&str; 50] = [
    "Texas", "Alabama", "Alaska", "Arizona", "Arkansas", "California", "Colorado",
    "Connecticut", "Delaware", "Florida", "Georgia", "Hawaii", "Idaho", "Illinois",
    "Indiana", "Iowa", "Kansas", "Kentucky", "Louisiana", "Maine", "Maryland",
    "Massachusetts", "Michigan", "Minnesota", "Mississippi", "Missouri", "Montana",
    "Nebraska", "Nevada", "New Hampshire", "New Jersey", "New Mexico", "New York",
    "North Carolina", "North Dakota", "Ohio", "Oklahoma", "Oregon", "Pennsylvania",
    "Rhode Island", "South Carolina", "South Dakota", "Tennessee", "Utah", "Vermont",
    "Virginia", "Washington", "West Virginia", "Wisconsin", "Wyoming",
];

/// Canonical spelling of a listed state, matched case-insensitively
pub fn find_state(name: &str) -> Option<&'static str> {
    let name = name.trim();
    US_STATES.iter().copied().find(|s| s.eq_ignore_ascii_case(name))
}

/// Jurisdiction-specific compliance notice.
pub fn code_notice(jurisdiction: &str) -> &'static str {
    if jurisdiction.trim().eq_ignore_ascii_case("Texas") {
        "Texas Jurisdiction Notice: Texas adopts the IBC statewide, but local jurisdictions \
         like Houston, Dallas, and Austin have their own amendments and may use different \
         code versions. Always verify with the local authority having jurisdiction."
    } else {
        "Code Compliance Notice: This calculation is based on the standard IBC. \
         Always verify local and state-specific amendments before finalizing any design."
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_list() {
        assert_eq!(US_STATES[0], "Texas");
        assert_eq!(US_STATES.iter().filter(|s| **s == "Texas").count(), 1);
        assert_eq!(find_state("new york"), Some("New York"));
        assert_eq!(find_state("Ontario"), None);
    }

    #[test]
    fn test_code_notice() {
        assert!(code_notice("Texas").starts_with("Texas Jurisdiction Notice"));
        assert!(code_notice("Ohio").starts_with("Code Compliance Notice"));
    }
}
