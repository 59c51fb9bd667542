use serde::{Deserialize, Serialize};

/// Federal filing status used for bracket and standard-deduction lookups.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum FilingStatus {
    #[default]
    Single,
    MarriedJoint,
    MarriedSeparate,
    HeadOfHousehold,
}

impl FilingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Single => "single",
            Self::MarriedJoint => "married_joint",
            Self::MarriedSeparate => "married_separate",
            Self::HeadOfHousehold => "head_of_household",
        }
    }

    /// Accepts the configuration keys plus the short IRS-style codes.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "single" | "s" => Some(Self::Single),
            "married_joint" | "mfj" => Some(Self::MarriedJoint),
            "married_separate" | "mfs" => Some(Self::MarriedSeparate),
            "head_of_household" | "hoh" => Some(Self::HeadOfHousehold),
            _ => None,
        }
    }

    /// Married statuses share the "married" age-bonus amount.
    pub fn is_married(&self) -> bool {
        matches!(self, Self::MarriedJoint | Self::MarriedSeparate)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn parse_accepts_config_keys_and_codes() {
        assert_eq!(FilingStatus::parse("married_joint"), Some(FilingStatus::MarriedJoint));
        assert_eq!(FilingStatus::parse("MFS"), Some(FilingStatus::MarriedSeparate));
        assert_eq!(FilingStatus::parse(" hoh "), Some(FilingStatus::HeadOfHousehold));
        assert_eq!(FilingStatus::parse("S"), Some(FilingStatus::Single));
    }

    #[test]
    fn parse_rejects_unknown_status() {
        assert_eq!(FilingStatus::parse("qss"), None);
    }

    #[test]
    fn as_str_round_trips_through_parse() {
        for status in [
            FilingStatus::Single,
            FilingStatus::MarriedJoint,
            FilingStatus::MarriedSeparate,
            FilingStatus::HeadOfHousehold,
        ] {
            assert_eq!(FilingStatus::parse(status.as_str()), Some(status));
        }
    }

    #[test]
    fn only_married_statuses_are_married() {
        assert!(FilingStatus::MarriedJoint.is_married());
        assert!(FilingStatus::MarriedSeparate.is_married());
        assert!(!FilingStatus::Single.is_married());
        assert!(!FilingStatus::HeadOfHousehold.is_married());
    }
}
