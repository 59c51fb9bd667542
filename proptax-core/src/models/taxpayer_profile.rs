use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::FilingStatus;

/// Age group reported by the taxpayer.
///
/// Program thresholds are expressed as ages, so each group maps to a
/// representative age: anyone 65 or older clears every configured age
/// minimum up to 75.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgeGroup {
    #[default]
    Under65,
    #[serde(rename = "65plus", alias = "sixty_five_plus")]
    SixtyFivePlus,
}

impl AgeGroup {
    pub fn representative_age(&self) -> u32 {
        match self {
            Self::Under65 => 40,
            Self::SixtyFivePlus => 75,
        }
    }

    pub fn is_65_or_older(&self) -> bool {
        matches!(self, Self::SixtyFivePlus)
    }
}

/// Whether the taxpayer owns or rents the residence.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Occupancy {
    #[default]
    Homeowner,
    Renter,
}

/// Household facts driving relief eligibility and the federal deduction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxpayerProfile {
    pub age: AgeGroup,

    /// `None` means the income was not provided. All means-tested relief is
    /// zero in that case; `Some(0)` is a valid, eligible income.
    pub household_income: Option<Decimal>,

    pub years_in_home: u32,

    pub filing_status: FilingStatus,

    pub occupancy: Occupancy,

    /// Property tax fixed at Senior Freeze enrollment. Zero means not enrolled.
    pub base_year_tax: Decimal,

    pub mortgage_interest: Decimal,

    pub charitable_giving: Decimal,
}

impl TaxpayerProfile {
    pub fn is_homeowner(&self) -> bool {
        self.occupancy == Occupancy::Homeowner
    }
}
