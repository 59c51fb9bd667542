use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Which assessment a scenario taxes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssessmentBasis {
    PriorYear,
    CurrentYear,
}

/// One parcel from the municipal assessment roll.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyRecord {
    pub address: String,
    pub assessed_value_prior_year: Decimal,
    pub assessed_value_current_year: Decimal,
}

impl PropertyRecord {
    pub fn assessed_value(&self, basis: AssessmentBasis) -> Decimal {
        match basis {
            AssessmentBasis::PriorYear => self.assessed_value_prior_year,
            AssessmentBasis::CurrentYear => self.assessed_value_current_year,
        }
    }
}
