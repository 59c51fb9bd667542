//! Federal deduction effects of property tax.
//!
//! Determines how much of the property tax reaches the federal return as a
//! SALT deduction and what that deduction is worth at the taxpayer's
//! marginal rate.
//!
//! # Worksheet Structure
//!
//! | Step | Description |
//! |------|-------------|
//! | 1  | SALT cap for the year, after any income phase-out |
//! | 2  | Deductible property tax (gross tax − relief, minimum 0) |
//! | 3  | Estimated state income tax |
//! | 4  | Allowed SALT (Step 2 + Step 3, limited to Step 1) |
//! | 5  | Itemized total (mortgage interest + charitable giving + Step 4) |
//! | 6  | Standard deduction for year, filing status and age |
//! | 7  | Effective deduction (larger of Step 5 and Step 6) |
//! | 8  | Federal benefit: taxable income with and without property tax in SALT, × marginal rate |
//! | 9  | Net cost (gross tax − relief − Step 8) |
//! | 10 | SALT capped when Step 2 + Step 3 exceeds Step 1 |
//!
//! Missing income is treated as zero for the federal steps. Relief is
//! already zero in that case, and the benefit falls to zero because both
//! taxable incomes are zero.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::calculations::common::{max, non_negative, round_half_up};
use crate::rules::{RuleConfiguration, SaltCapRule, StandardDeductionTable, TaxBracket};
use crate::{FilingStatus, ReliefResult, ScenarioResult, TaxpayerProfile};

/// Flat state income-tax rate used without a bracket table.
const DEFAULT_STATE_RATE: Decimal = Decimal::from_parts(5, 0, 0, false, 2);

/// Federal marginal rate used without a bracket table.
const DEFAULT_FEDERAL_RATE: Decimal = Decimal::from_parts(24, 0, 0, false, 2);

/// Marginal bracket that applies at a given income.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarginalRate {
    pub rate: Decimal,

    /// Upper limit of the bracket; `None` for the top bracket or the default.
    pub limit: Option<Decimal>,
}

/// SALT limit for `income` under `rule`.
///
/// Phase-out rules remove `reduction_per_step` for every full step of income
/// above the start, never dropping below `min_limit`. Missing or zero income
/// gets the full base limit.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use proptax_core::calculations::compute_salt_cap;
/// use proptax_core::rules::{SaltCapRule, SaltPhaseOut};
///
/// let rule = SaltCapRule::PhaseOut(SaltPhaseOut {
///     base_limit: dec!(40000),
///     phase_out_start: dec!(500000),
///     phase_out_end: dec!(600000),
///     phase_out_step: dec!(10000),
///     reduction_per_step: dec!(3000),
///     min_limit: dec!(10000),
/// });
///
/// assert_eq!(compute_salt_cap(Some(dec!(525000)), &rule), dec!(34000));
/// assert_eq!(compute_salt_cap(None, &rule), dec!(40000));
/// assert_eq!(compute_salt_cap(Some(dec!(525000)), &SaltCapRule::Flat(dec!(40400))), dec!(40400));
/// ```
pub fn compute_salt_cap(
    income: Option<Decimal>,
    rule: &SaltCapRule,
) -> Decimal {
    let phase_out = match rule {
        SaltCapRule::Flat(limit) => return *limit,
        SaltCapRule::PhaseOut(phase_out) => phase_out,
    };

    let income = match income {
        Some(income) if !income.is_zero() => income,
        _ => return phase_out.base_limit,
    };

    if income <= phase_out.phase_out_start {
        return phase_out.base_limit;
    }
    if income >= phase_out.phase_out_end {
        return phase_out.min_limit;
    }

    let steps = ((income - phase_out.phase_out_start) / phase_out.phase_out_step).floor();
    let reduction = steps * phase_out.reduction_per_step;

    max(phase_out.base_limit - reduction, phase_out.min_limit)
}

/// Progressive state income tax on `income`.
///
/// Income above the last finite limit is taxed at the last bracket's rate.
/// Without a bracket table a flat 5% applies.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use proptax_core::calculations::estimate_state_income_tax;
/// use proptax_core::rules::TaxBracket;
///
/// let brackets = [
///     TaxBracket { limit: Some(dec!(20000)), rate: dec!(0.014) },
///     TaxBracket { limit: None, rate: dec!(0.0175) },
/// ];
///
/// assert_eq!(estimate_state_income_tax(dec!(30000), Some(&brackets[..])), dec!(455.00));
/// assert_eq!(estimate_state_income_tax(dec!(30000), None), dec!(1500.00));
/// ```
pub fn estimate_state_income_tax(
    income: Decimal,
    brackets: Option<&[TaxBracket]>,
) -> Decimal {
    let income = non_negative(income);

    let Some(brackets) = brackets.filter(|b| !b.is_empty()) else {
        return round_half_up(income * DEFAULT_STATE_RATE);
    };

    let mut tax = Decimal::ZERO;
    let mut previous = Decimal::ZERO;
    for bracket in brackets {
        match bracket.limit {
            Some(limit) if income > limit => {
                tax += (limit - previous) * bracket.rate;
                previous = limit;
            }
            _ => return round_half_up(tax + (income - previous) * bracket.rate),
        }
    }

    // Every limit was finite and income is above all of them.
    let top_rate = brackets.last().map_or(Decimal::ZERO, |b| b.rate);
    round_half_up(tax + (income - previous) * top_rate)
}

/// Estimated state income tax as a share of income. Zero income yields zero.
pub fn effective_state_rate(
    income: Decimal,
    brackets: Option<&[TaxBracket]>,
) -> Decimal {
    if income <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    estimate_state_income_tax(income, brackets) / income
}

/// Bracket whose upper limit is at or above `income`; the last bracket when
/// income exceeds every limit. Without a table the rate is 24%.
pub fn marginal_rate(
    income: Decimal,
    brackets: Option<&[TaxBracket]>,
) -> MarginalRate {
    let default = MarginalRate {
        rate: DEFAULT_FEDERAL_RATE,
        limit: None,
    };

    let Some(brackets) = brackets else {
        return default;
    };

    brackets
        .iter()
        .find(|b| b.limit.is_none_or(|limit| income <= limit))
        .or(brackets.last())
        .map_or(default, |b| MarginalRate {
            rate: b.rate,
            limit: b.limit,
        })
}

/// Standard deduction for `year` and `status`, plus the age bonus.
///
/// Married statuses receive the married bonus; everyone else the single
/// bonus.
pub fn standard_deduction(
    year: &str,
    status: FilingStatus,
    is_65_or_older: bool,
    rules: &RuleConfiguration,
) -> Decimal {
    let table = rules.standard_deduction_table(year);

    let amount = match table.amounts.get_or_single(status) {
        Some(amount) => *amount,
        None => {
            warn!(year, status = status.as_str(), "no standard deduction amount; using built-in");
            StandardDeductionTable::builtin()
                .amounts
                .get_or_single(status)
                .copied()
                .unwrap_or_default()
        }
    };

    if !is_65_or_older {
        return amount;
    }

    let bonus = if status.is_married() {
        table.age_bonus.married
    } else {
        table.age_bonus.single
    };
    amount + bonus
}

/// Calculator for the federal deduction and resulting net cost of one
/// scenario's property tax.
#[derive(Debug, Clone)]
pub struct DeductionCalculator<'a> {
    rules: &'a RuleConfiguration,
}

impl<'a> DeductionCalculator<'a> {
    pub fn new(rules: &'a RuleConfiguration) -> Self {
        Self { rules }
    }

    /// Runs steps 1–10 for `property_tax` after `relief`.
    pub fn net_cost(
        &self,
        property_tax: Decimal,
        relief: &ReliefResult,
        tax_year: &str,
        profile: &TaxpayerProfile,
    ) -> ScenarioResult {
        let income = profile.household_income;

        // Step 1
        let salt_cap = self.salt_cap(income, tax_year);

        // Step 2
        let deductible_property_tax = non_negative(property_tax - relief.total);

        // Step 3
        let state_income_tax = self.state_income_tax(income);

        // Step 4
        let salt_deduction = (deductible_property_tax + state_income_tax).min(salt_cap);

        // Step 5
        let other_itemized_deduction = profile
            .mortgage_interest
            .saturating_add(profile.charitable_giving);
        let total_itemized = other_itemized_deduction.saturating_add(salt_deduction);

        // Step 6
        let standard = standard_deduction(
            tax_year,
            profile.filing_status,
            profile.age.is_65_or_older(),
            self.rules,
        );

        // Step 7
        let effective_deduction = max(total_itemized, standard);
        let is_itemizing = total_itemized > standard;

        // Step 8
        let federal_benefit = self.federal_benefit(
            non_negative(income.unwrap_or_default()),
            effective_deduction,
            other_itemized_deduction.saturating_add(state_income_tax.min(salt_cap)),
            standard,
            tax_year,
            profile.filing_status,
        );

        // Step 9
        let net_cost = property_tax - relief.total - federal_benefit;

        // Step 10
        let is_salt_capped = deductible_property_tax + state_income_tax > salt_cap;

        debug!(
            tax_year,
            %property_tax,
            %salt_cap,
            %salt_deduction,
            is_itemizing,
            %federal_benefit,
            %net_cost,
            "net cost calculated"
        );

        ScenarioResult {
            gross_tax: property_tax,
            relief_total: relief.total,
            net_property_tax: property_tax - relief.total,
            state_income_tax,
            salt_cap,
            standard_deduction: standard,
            salt_deduction,
            other_itemized_deduction,
            total_itemized,
            is_itemizing,
            federal_benefit,
            net_cost,
            is_salt_capped,
        }
    }

    fn salt_cap(
        &self,
        income: Option<Decimal>,
        tax_year: &str,
    ) -> Decimal {
        compute_salt_cap(income, &self.rules.salt_cap_rule(tax_year))
    }

    fn state_income_tax(
        &self,
        income: Option<Decimal>,
    ) -> Decimal {
        match income {
            Some(income) => estimate_state_income_tax(income, self.rules.state_income_tax_brackets()),
            None => Decimal::ZERO,
        }
    }

    /// Value of the property-tax share of SALT: the drop in taxable income
    /// it causes, priced at the marginal rate of the actual taxable income.
    fn federal_benefit(
        &self,
        income: Decimal,
        effective_deduction: Decimal,
        itemized_without_property_tax: Decimal,
        standard: Decimal,
        tax_year: &str,
        status: FilingStatus,
    ) -> Decimal {
        let taxable_with = non_negative(income - effective_deduction);
        let deduction_without = max(itemized_without_property_tax, standard);
        let taxable_without = non_negative(income - deduction_without);

        let brackets = self.rules.federal_brackets(tax_year, status);
        if brackets.is_none() {
            warn!(tax_year, "no federal brackets configured; using 24% marginal rate");
        }
        let marginal = marginal_rate(taxable_with, brackets);

        round_half_up((taxable_without - taxable_with) * marginal.rate)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::rules::fixtures::{phase_out_2025, sample_rules, single_federal_brackets, state_brackets};
    use crate::AgeGroup;

    fn phase_out_rule() -> SaltCapRule {
        SaltCapRule::PhaseOut(phase_out_2025())
    }

    // =========================================================================
    // compute_salt_cap tests
    // =========================================================================

    #[test]
    fn compute_salt_cap_returns_flat_unchanged() {
        let rule = SaltCapRule::Flat(dec!(40400));

        assert_eq!(compute_salt_cap(Some(dec!(900000)), &rule), dec!(40400));
        assert_eq!(compute_salt_cap(None, &rule), dec!(40400));
    }

    #[test]
    fn compute_salt_cap_missing_or_zero_income_gets_base() {
        assert_eq!(compute_salt_cap(None, &phase_out_rule()), dec!(40000));
        assert_eq!(compute_salt_cap(Some(dec!(0)), &phase_out_rule()), dec!(40000));
    }

    #[test]
    fn compute_salt_cap_at_or_below_start_gets_base() {
        assert_eq!(compute_salt_cap(Some(dec!(500000)), &phase_out_rule()), dec!(40000));
        assert_eq!(compute_salt_cap(Some(dec!(120000)), &phase_out_rule()), dec!(40000));
    }

    #[test]
    fn compute_salt_cap_counts_only_full_steps() {
        assert_eq!(compute_salt_cap(Some(dec!(509999)), &phase_out_rule()), dec!(40000));
        assert_eq!(compute_salt_cap(Some(dec!(515000)), &phase_out_rule()), dec!(37000));
        assert_eq!(compute_salt_cap(Some(dec!(599999)), &phase_out_rule()), dec!(13000));
    }

    #[test]
    fn compute_salt_cap_at_or_above_end_gets_minimum() {
        assert_eq!(compute_salt_cap(Some(dec!(600000)), &phase_out_rule()), dec!(10000));
        assert_eq!(compute_salt_cap(Some(dec!(2000000)), &phase_out_rule()), dec!(10000));
    }

    #[test]
    fn compute_salt_cap_never_below_minimum_mid_range() {
        let mut phase_out = phase_out_2025();
        phase_out.reduction_per_step = dec!(10000);
        let rule = SaltCapRule::PhaseOut(phase_out);

        assert_eq!(compute_salt_cap(Some(dec!(550000)), &rule), dec!(10000));
    }

    #[test]
    fn compute_salt_cap_non_increasing_past_start() {
        let rule = phase_out_rule();
        let mut previous = compute_salt_cap(Some(dec!(500000)), &rule);

        let mut income = dec!(500000);
        while income <= dec!(650000) {
            let cap = compute_salt_cap(Some(income), &rule);
            assert!(cap <= previous, "cap rose at income {income}");
            previous = cap;
            income += dec!(2500);
        }
        assert_eq!(previous, dec!(10000));
    }

    // =========================================================================
    // estimate_state_income_tax tests
    // =========================================================================

    #[test]
    fn estimate_state_income_tax_zero_income_is_zero() {
        let brackets = state_brackets();

        assert_eq!(estimate_state_income_tax(dec!(0), Some(&brackets[..])), dec!(0));
        assert_eq!(estimate_state_income_tax(dec!(0), None), dec!(0));
    }

    #[test]
    fn estimate_state_income_tax_within_first_bracket() {
        let brackets = state_brackets();

        assert_eq!(estimate_state_income_tax(dec!(10000), Some(&brackets[..])), dec!(140.00));
    }

    #[test]
    fn estimate_state_income_tax_walks_brackets() {
        let brackets = state_brackets();

        // 280 + 262.50 + 175 + 1657.50
        assert_eq!(estimate_state_income_tax(dec!(70000), Some(&brackets[..])), dec!(2375.00));
        // 280 + 262.50 + 175 + 1933.75
        assert_eq!(estimate_state_income_tax(dec!(75000), Some(&brackets[..])), dec!(2651.25));
    }

    #[test]
    fn estimate_state_income_tax_top_bracket() {
        let brackets = state_brackets();

        // 2651.25 + 27072.50 + 44850 + 107500
        assert_eq!(estimate_state_income_tax(dec!(2000000), Some(&brackets[..])), dec!(182073.75));
    }

    #[test]
    fn estimate_state_income_tax_above_last_finite_limit_uses_last_rate() {
        let brackets = [
            TaxBracket {
                limit: Some(dec!(20000)),
                rate: dec!(0.01),
            },
            TaxBracket {
                limit: Some(dec!(50000)),
                rate: dec!(0.02),
            },
        ];

        // 200 + 600 + 50000 * 0.02
        assert_eq!(estimate_state_income_tax(dec!(100000), Some(&brackets[..])), dec!(1800.00));
    }

    #[test]
    fn estimate_state_income_tax_flat_default_without_table() {
        assert_eq!(estimate_state_income_tax(dec!(70000), None), dec!(3500.00));
        assert_eq!(estimate_state_income_tax(dec!(70000), Some(&[] as &[TaxBracket])), dec!(3500.00));
    }

    #[test]
    fn estimate_state_income_tax_non_decreasing() {
        let brackets = state_brackets();
        let mut previous = Decimal::ZERO;

        let mut income = dec!(0);
        while income <= dec!(1200000) {
            let tax = estimate_state_income_tax(income, Some(&brackets[..]));
            assert!(tax >= previous, "tax fell at income {income}");
            previous = tax;
            income += dec!(5000);
        }
    }

    // =========================================================================
    // effective_state_rate tests
    // =========================================================================

    #[test]
    fn effective_state_rate_divides_tax_by_income() {
        let brackets = state_brackets();

        assert_eq!(effective_state_rate(dec!(10000), Some(&brackets[..])), dec!(0.014));
    }

    #[test]
    fn effective_state_rate_zero_income() {
        assert_eq!(effective_state_rate(dec!(0), None), dec!(0));
    }

    // =========================================================================
    // marginal_rate tests
    // =========================================================================

    #[test]
    fn marginal_rate_finds_first_bracket_covering_income() {
        let brackets = single_federal_brackets();

        let rate = marginal_rate(dec!(48475), Some(&brackets[..]));

        assert_eq!(
            rate,
            MarginalRate {
                rate: dec!(0.12),
                limit: Some(dec!(48475)),
            }
        );
    }

    #[test]
    fn marginal_rate_above_all_limits_is_top_bracket() {
        let brackets = single_federal_brackets();

        assert_eq!(marginal_rate(dec!(5000000), Some(&brackets[..])).rate, dec!(0.37));
    }

    #[test]
    fn marginal_rate_finite_table_uses_last_bracket() {
        let brackets = [TaxBracket {
            limit: Some(dec!(10000)),
            rate: dec!(0.10),
        }];

        assert_eq!(marginal_rate(dec!(20000), Some(&brackets[..])).rate, dec!(0.10));
    }

    #[test]
    fn marginal_rate_defaults_to_24_percent() {
        assert_eq!(
            marginal_rate(dec!(80000), None),
            MarginalRate {
                rate: dec!(0.24),
                limit: None,
            }
        );
    }

    // =========================================================================
    // standard_deduction tests
    // =========================================================================

    #[test]
    fn standard_deduction_uses_year_table() {
        let rules = sample_rules();

        assert_eq!(
            standard_deduction("2025", FilingStatus::MarriedJoint, false, &rules),
            dec!(31500)
        );
    }

    #[test]
    fn standard_deduction_married_age_bonus() {
        let rules = sample_rules();

        assert_eq!(
            standard_deduction("2025", FilingStatus::MarriedJoint, true, &rules),
            dec!(33100)
        );
    }

    #[test]
    fn standard_deduction_head_of_household_gets_single_bonus() {
        let rules = sample_rules();

        assert_eq!(
            standard_deduction("2026", FilingStatus::HeadOfHousehold, true, &rules),
            dec!(26200)
        );
    }

    #[test]
    fn standard_deduction_missing_status_falls_back_to_single() {
        let rules = sample_rules();

        assert_eq!(
            standard_deduction("2026", FilingStatus::MarriedSeparate, false, &rules),
            dec!(16100)
        );
    }

    #[test]
    fn standard_deduction_builtin_when_nothing_configured() {
        let mut rules = sample_rules();
        rules.standard_deductions.clear();

        assert_eq!(
            standard_deduction("2030", FilingStatus::Single, true, &rules),
            dec!(17750)
        );
    }

    // =========================================================================
    // net_cost tests
    // =========================================================================

    #[test]
    fn net_cost_standard_deduction_filer_gets_no_federal_benefit() {
        let rules = sample_rules();
        let calculator = DeductionCalculator::new(&rules);
        let profile = TaxpayerProfile {
            age: AgeGroup::SixtyFivePlus,
            household_income: Some(dec!(70000)),
            years_in_home: 10,
            ..Default::default()
        };
        let relief = ReliefResult::from_components(dec!(1750), dec!(1505), dec!(2997.50));

        let result = calculator.net_cost(dec!(12505), &relief, "2026", &profile);

        assert_eq!(result.salt_cap, dec!(40400));
        assert_eq!(result.state_income_tax, dec!(2375.00));
        assert_eq!(result.salt_deduction, dec!(8627.50));
        assert_eq!(result.standard_deduction, dec!(18150));
        assert!(!result.is_itemizing);
        assert_eq!(result.federal_benefit, dec!(0));
        assert_eq!(result.net_property_tax, dec!(6252.50));
        assert_eq!(result.net_cost, dec!(6252.50));
        assert!(!result.is_salt_capped);
    }

    #[test]
    fn net_cost_itemizer_prices_property_tax_at_marginal_rate() {
        let rules = sample_rules();
        let calculator = DeductionCalculator::new(&rules);
        let profile = TaxpayerProfile {
            household_income: Some(dec!(200000)),
            mortgage_interest: dec!(20000),
            charitable_giving: dec!(5000),
            ..Default::default()
        };

        let result = calculator.net_cost(dec!(12505), &ReliefResult::default(), "2025", &profile);

        assert_eq!(result.salt_cap, dec!(40000));
        assert_eq!(result.state_income_tax, dec!(10613.75));
        assert_eq!(result.salt_deduction, dec!(23118.75));
        assert_eq!(result.other_itemized_deduction, dec!(25000));
        assert_eq!(result.total_itemized, dec!(48118.75));
        assert!(result.is_itemizing);
        // 12505 * 24%
        assert_eq!(result.federal_benefit, dec!(3001.20));
        assert_eq!(result.net_cost, dec!(9503.80));
    }

    #[test]
    fn net_cost_capped_salt_leaves_no_room_for_property_tax() {
        let rules = sample_rules();
        let calculator = DeductionCalculator::new(&rules);
        let profile = TaxpayerProfile {
            household_income: Some(dec!(550000)),
            ..Default::default()
        };

        let result = calculator.net_cost(dec!(12505), &ReliefResult::default(), "2025", &profile);

        assert_eq!(result.salt_cap, dec!(25000));
        assert_eq!(result.salt_deduction, dec!(25000));
        assert!(result.is_salt_capped);
        assert_eq!(result.federal_benefit, dec!(0));
        assert_eq!(result.net_cost, dec!(12505));
    }

    #[test]
    fn net_cost_relief_reduces_deductible_property_tax() {
        let rules = sample_rules();
        let calculator = DeductionCalculator::new(&rules);
        let profile = TaxpayerProfile {
            household_income: Some(dec!(200000)),
            mortgage_interest: dec!(20000),
            charitable_giving: dec!(5000),
            ..Default::default()
        };
        let relief = ReliefResult::from_components(dec!(1000), dec!(0), dec!(0));

        let result = calculator.net_cost(dec!(12505), &relief, "2025", &profile);

        assert_eq!(result.salt_deduction, dec!(22118.75));
        // 11505 * 24%
        assert_eq!(result.federal_benefit, dec!(2761.20));
        assert_eq!(result.net_cost, dec!(8743.80));
    }

    #[test]
    fn net_cost_huge_itemized_amounts_saturate() {
        let rules = sample_rules();
        let calculator = DeductionCalculator::new(&rules);
        let profile = TaxpayerProfile {
            household_income: Some(dec!(200000)),
            mortgage_interest: Decimal::MAX,
            charitable_giving: Decimal::MAX,
            ..Default::default()
        };

        let result = calculator.net_cost(dec!(12505), &ReliefResult::default(), "2025", &profile);

        assert_eq!(result.other_itemized_deduction, Decimal::MAX);
        assert_eq!(result.total_itemized, Decimal::MAX);
        assert!(result.is_itemizing);
        assert_eq!(result.federal_benefit, dec!(0));
        assert_eq!(result.net_cost, dec!(12505));
    }

    #[test]
    fn net_cost_without_income_degrades_to_zero_benefit() {
        let rules = sample_rules();
        let calculator = DeductionCalculator::new(&rules);
        let profile = TaxpayerProfile {
            household_income: None,
            mortgage_interest: dec!(30000),
            ..Default::default()
        };

        let result = calculator.net_cost(dec!(12505), &ReliefResult::default(), "2025", &profile);

        assert_eq!(result.state_income_tax, dec!(0));
        assert_eq!(result.salt_cap, dec!(40000));
        assert_eq!(result.total_itemized, dec!(42505));
        assert!(result.is_itemizing);
        assert_eq!(result.federal_benefit, dec!(0));
        assert_eq!(result.net_cost, dec!(12505));
    }
}
