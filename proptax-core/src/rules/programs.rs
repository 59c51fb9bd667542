//! Relief-program parameters and scenario overrides.
//!
//! Field aliases accept the key names used by the municipal `tax_rules.json`
//! files (`Senior_Freeze`, `ANCHOR`, `Stay_NJ`, `income_limit_2025`).

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Senior Freeze (property tax reimbursement) eligibility thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeniorFreezeRule {
    pub age_min: u32,
    pub years_in_home_min: u32,
    #[serde(alias = "income_limit_2025")]
    pub income_limit: Decimal,
}

/// Income ceiling and flat benefit for one ANCHOR tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BenefitTier {
    pub limit: Decimal,
    pub base: Decimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HomeownerAnchor {
    pub tier1: BenefitTier,
    pub tier2: BenefitTier,
    pub bonus_age: u32,
    pub bonus_amount: Decimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenterAnchor {
    pub tier1: BenefitTier,
    pub bonus_age: u32,
    pub bonus_amount: Decimal,
}

/// ANCHOR flat tiered benefit, with separate homeowner and renter tracks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnchorRule {
    pub homeowner: HomeownerAnchor,
    pub renter: RenterAnchor,
}

/// Stay NJ gap-filling benefit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StayNjRule {
    pub age_min: u32,

    /// Only enforced when configured.
    #[serde(default)]
    pub years_in_home_min: Option<u32>,

    /// Eligibility requires income strictly below this limit.
    pub income_limit: Decimal,

    /// Fraction of current tax the program aims to cover.
    pub benefit_percent: Decimal,

    /// Dollar ceiling on the target.
    pub benefit_cap: Decimal,

    /// Ceiling on ANCHOR + Stay NJ combined. Senior Freeze is outside it.
    #[serde(default)]
    pub total_relief_cap: Option<Decimal>,
}

/// Parameters for all three relief programs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReliefPrograms {
    #[serde(alias = "Senior_Freeze")]
    pub senior_freeze: SeniorFreezeRule,
    #[serde(alias = "ANCHOR")]
    pub anchor: AnchorRule,
    #[serde(alias = "Stay_NJ")]
    pub stay_nj: StayNjRule,
}

/// Per-scenario adjustments to the relief programs.
///
/// Overrides are merged into a new [`ReliefPrograms`] value; the shared
/// configuration is never touched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReliefOverrides {
    /// Replaces the Stay NJ dollar cap. Zero disables the program.
    #[serde(default)]
    pub gap_benefit_cap: Option<Decimal>,

    /// Drops the combined ANCHOR + Stay NJ ceiling.
    #[serde(default)]
    pub disable_combined_cap: bool,
}

impl ReliefOverrides {
    pub fn is_empty(&self) -> bool {
        self.gap_benefit_cap.is_none() && !self.disable_combined_cap
    }
}

impl ReliefPrograms {
    /// Returns a copy of these programs with `overrides` applied.
    pub fn with_overrides(
        &self,
        overrides: &ReliefOverrides,
    ) -> Self {
        let stay_nj = StayNjRule {
            benefit_cap: overrides
                .gap_benefit_cap
                .unwrap_or(self.stay_nj.benefit_cap),
            total_relief_cap: if overrides.disable_combined_cap {
                None
            } else {
                self.stay_nj.total_relief_cap
            },
            ..self.stay_nj
        };

        Self { stay_nj, ..*self }
    }
}
