//! Bracket tables, standard deductions and SALT-cap rules.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::FilingStatus;

/// One marginal bracket. Brackets are listed in ascending order of `limit`;
/// only the last bracket may be unbounded (`limit = None`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxBracket {
    #[serde(default)]
    pub limit: Option<Decimal>,
    pub rate: Decimal,
}

/// A value configured separately for each filing status. Missing statuses
/// fall back to `single` at lookup time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ByFilingStatus<T> {
    pub single: Option<T>,
    pub married_joint: Option<T>,
    pub married_separate: Option<T>,
    pub head_of_household: Option<T>,
}

impl<T> ByFilingStatus<T> {
    pub fn get(&self, status: FilingStatus) -> Option<&T> {
        match status {
            FilingStatus::Single => self.single.as_ref(),
            FilingStatus::MarriedJoint => self.married_joint.as_ref(),
            FilingStatus::MarriedSeparate => self.married_separate.as_ref(),
            FilingStatus::HeadOfHousehold => self.head_of_household.as_ref(),
        }
    }

    /// Looks up `status`, falling back to the single-filer entry.
    pub fn get_or_single(&self, status: FilingStatus) -> Option<&T> {
        self.get(status).or(self.single.as_ref())
    }

    pub fn iter(&self) -> impl Iterator<Item = (FilingStatus, &T)> {
        [
            (FilingStatus::Single, self.single.as_ref()),
            (FilingStatus::MarriedJoint, self.married_joint.as_ref()),
            (FilingStatus::MarriedSeparate, self.married_separate.as_ref()),
            (FilingStatus::HeadOfHousehold, self.head_of_household.as_ref()),
        ]
        .into_iter()
        .filter_map(|(status, value)| value.map(|v| (status, v)))
    }
}

/// Additional standard deduction for taxpayers 65 or older.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgeBonus {
    pub single: Decimal,
    pub married: Decimal,
}

/// Standard deduction amounts for one tax year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StandardDeductionTable {
    pub amounts: ByFilingStatus<Decimal>,
    pub age_bonus: AgeBonus,
}

impl StandardDeductionTable {
    /// Built-in table used when neither the requested year nor the estimate
    /// year is configured (2025 federal amounts).
    pub fn builtin() -> Self {
        Self {
            amounts: ByFilingStatus {
                single: Some(Decimal::from(15_750)),
                married_joint: Some(Decimal::from(31_500)),
                married_separate: Some(Decimal::from(15_750)),
                head_of_household: Some(Decimal::from(23_625)),
            },
            age_bonus: AgeBonus {
                single: Decimal::from(2_000),
                married: Decimal::from(1_600),
            },
        }
    }
}

/// SALT limit that shrinks in fixed steps as income rises.
///
/// Every full `phase_out_step` of income above `phase_out_start` removes
/// `reduction_per_step` from `base_limit`, never going below `min_limit`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaltPhaseOut {
    pub base_limit: Decimal,
    pub phase_out_start: Decimal,
    pub phase_out_end: Decimal,
    pub phase_out_step: Decimal,
    pub reduction_per_step: Decimal,
    pub min_limit: Decimal,
}

/// SALT-cap rule for one year: either a flat limit or a phase-out schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SaltCapRule {
    Flat(Decimal),
    PhaseOut(SaltPhaseOut),
}

impl SaltCapRule {
    /// The long-standing flat federal limit, used when a year has no rule.
    pub const DEFAULT_FLAT: Decimal = Decimal::from_parts(10_000, 0, 0, false, 0);
}
