use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Net cost of the property tax for one scenario after relief and the
/// federal deduction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioResult {
    /// Assessed value × scenario rate.
    pub gross_tax: Decimal,

    pub relief_total: Decimal,

    /// Gross tax minus relief.
    pub net_property_tax: Decimal,

    /// Estimated state income tax feeding the SALT deduction.
    pub state_income_tax: Decimal,

    /// SALT limit after any income phase-out.
    pub salt_cap: Decimal,

    pub standard_deduction: Decimal,

    /// State and local taxes allowed after the cap.
    pub salt_deduction: Decimal,

    /// Mortgage interest plus charitable giving.
    pub other_itemized_deduction: Decimal,

    pub total_itemized: Decimal,

    pub is_itemizing: bool,

    /// Federal tax saved because of the property-tax share of SALT.
    pub federal_benefit: Decimal,

    /// Gross tax minus relief minus federal benefit.
    pub net_cost: Decimal,

    pub is_salt_capped: bool,
}
