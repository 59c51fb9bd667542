//! Rule configuration: rates, relief-program parameters, federal tables and
//! scenario definitions.
//!
//! A [`RuleConfiguration`] is deserialized once, checked with
//! [`RuleConfiguration::validate`], and then only read. Year-keyed tables
//! resolve through explicit fallbacks:
//!
//! | Lookup | Fallback order |
//! |--------|----------------|
//! | SALT cap rule | year → `estimate_year` → flat $10,000 |
//! | Federal brackets | year → `estimate_year` → none (24% marginal default) |
//! | Standard deduction | year → `estimate_year` → [`StandardDeductionTable::builtin`] |
//! | Filing status within a table | requested status → `single` |

mod federal;
mod programs;
mod scenarios;

use std::borrow::Cow;
use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

pub use federal::{
    AgeBonus, ByFilingStatus, SaltCapRule, SaltPhaseOut, StandardDeductionTable, TaxBracket,
};
pub use programs::{
    AnchorRule, BenefitTier, HomeownerAnchor, ReliefOverrides, ReliefPrograms, RenterAnchor,
    SeniorFreezeRule, StayNjRule,
};
pub use scenarios::{ScenarioKind, ScenarioSet, ScenarioSpec};

use crate::FilingStatus;

/// Errors found while validating a rule configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RuleConfigError {
    /// A scenario names a tax rate key that is not configured.
    #[error("scenario '{scenario}' references unknown tax rate '{key}'")]
    UnknownTaxRate { scenario: &'static str, key: String },

    /// Property-tax rates are fractions of assessed value.
    #[error("tax rate '{key}' must be between 0 and 1, got {rate}")]
    InvalidTaxRate { key: String, rate: Decimal },

    /// A threshold, benefit or cap is negative.
    #[error("{field} must be non-negative, got {value}")]
    NegativeAmount { field: String, value: Decimal },

    /// Stay NJ benefit percentage outside [0, 1].
    #[error("stay_nj.benefit_percent must be between 0 and 1, got {0}")]
    InvalidBenefitPercent(Decimal),

    /// ANCHOR homeowner tiers must be ordered.
    #[error("anchor homeowner tier1 limit {tier1} exceeds tier2 limit {tier2}")]
    TierOrder { tier1: Decimal, tier2: Decimal },

    #[error("bracket table '{table}' is empty")]
    EmptyBracketTable { table: String },

    #[error("bracket table '{table}' is not sorted by ascending limit")]
    UnsortedBrackets { table: String },

    #[error("bracket table '{table}' has an unbounded bracket before the last one")]
    UnboundedBracketNotLast { table: String },

    #[error("bracket table '{table}' has rate {rate} outside 0..=1")]
    InvalidBracketRate { table: String, rate: Decimal },

    #[error("SALT phase-out for '{year}' is invalid: {reason}")]
    InvalidPhaseOut { year: String, reason: &'static str },
}

fn default_estimate_year() -> String {
    "2026_est".to_string()
}

/// Complete, versioned rule set for one calculation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleConfiguration {
    /// Year key used when a requested year has no table.
    #[serde(default = "default_estimate_year")]
    pub estimate_year: String,

    /// Property-tax rate per key, as a fraction of assessed value.
    pub tax_rates: BTreeMap<String, Decimal>,

    pub programs: ReliefPrograms,

    #[serde(default)]
    pub federal_brackets: BTreeMap<String, ByFilingStatus<Vec<TaxBracket>>>,

    /// Progressive state income-tax estimate. Without it a flat 5% is used.
    #[serde(default, alias = "nj_income_tax_estimates")]
    pub state_income_tax_brackets: Option<Vec<TaxBracket>>,

    #[serde(default)]
    pub standard_deductions: BTreeMap<String, StandardDeductionTable>,

    #[serde(default)]
    pub salt_caps: BTreeMap<String, SaltCapRule>,

    pub scenarios: ScenarioSet,
}

impl RuleConfiguration {
    /// Checks every table once so calculations can trust the values.
    ///
    /// # Errors
    ///
    /// Returns the first [`RuleConfigError`] found.
    pub fn validate(&self) -> Result<(), RuleConfigError> {
        for (key, rate) in &self.tax_rates {
            if *rate < Decimal::ZERO || *rate > Decimal::ONE {
                return Err(RuleConfigError::InvalidTaxRate {
                    key: key.clone(),
                    rate: *rate,
                });
            }
        }

        for (kind, spec) in self.scenarios.iter() {
            if !self.tax_rates.contains_key(&spec.tax_rate_key) {
                return Err(RuleConfigError::UnknownTaxRate {
                    scenario: kind.as_str(),
                    key: spec.tax_rate_key.clone(),
                });
            }
            if let Some(cap) = spec.relief.gap_benefit_cap {
                non_negative(&format!("scenarios.{}.relief.gap_benefit_cap", kind.as_str()), cap)?;
            }
        }

        self.validate_programs()?;

        for (year, table) in &self.federal_brackets {
            for (status, brackets) in table.iter() {
                validate_brackets(&format!("federal_brackets.{year}.{}", status.as_str()), brackets)?;
            }
        }

        if let Some(brackets) = &self.state_income_tax_brackets {
            validate_brackets("state_income_tax_brackets", brackets)?;
        }

        for (year, table) in &self.standard_deductions {
            for (status, amount) in table.amounts.iter() {
                non_negative(
                    &format!("standard_deductions.{year}.amounts.{}", status.as_str()),
                    *amount,
                )?;
            }
            non_negative(
                &format!("standard_deductions.{year}.age_bonus.single"),
                table.age_bonus.single,
            )?;
            non_negative(
                &format!("standard_deductions.{year}.age_bonus.married"),
                table.age_bonus.married,
            )?;
        }

        for (year, rule) in &self.salt_caps {
            validate_salt_rule(year, rule)?;
        }

        Ok(())
    }

    fn validate_programs(&self) -> Result<(), RuleConfigError> {
        let freeze = &self.programs.senior_freeze;
        non_negative("senior_freeze.income_limit", freeze.income_limit)?;

        let home = &self.programs.anchor.homeowner;
        non_negative("anchor.homeowner.tier1.limit", home.tier1.limit)?;
        non_negative("anchor.homeowner.tier1.base", home.tier1.base)?;
        non_negative("anchor.homeowner.tier2.limit", home.tier2.limit)?;
        non_negative("anchor.homeowner.tier2.base", home.tier2.base)?;
        non_negative("anchor.homeowner.bonus_amount", home.bonus_amount)?;
        if home.tier1.limit > home.tier2.limit {
            return Err(RuleConfigError::TierOrder {
                tier1: home.tier1.limit,
                tier2: home.tier2.limit,
            });
        }

        let renter = &self.programs.anchor.renter;
        non_negative("anchor.renter.tier1.limit", renter.tier1.limit)?;
        non_negative("anchor.renter.tier1.base", renter.tier1.base)?;
        non_negative("anchor.renter.bonus_amount", renter.bonus_amount)?;

        let stay = &self.programs.stay_nj;
        non_negative("stay_nj.income_limit", stay.income_limit)?;
        non_negative("stay_nj.benefit_cap", stay.benefit_cap)?;
        if let Some(cap) = stay.total_relief_cap {
            non_negative("stay_nj.total_relief_cap", cap)?;
        }
        if stay.benefit_percent < Decimal::ZERO || stay.benefit_percent > Decimal::ONE {
            return Err(RuleConfigError::InvalidBenefitPercent(stay.benefit_percent));
        }

        Ok(())
    }

    /// Property-tax rate for `key`, if configured.
    pub fn tax_rate(
        &self,
        key: &str,
    ) -> Option<Decimal> {
        self.tax_rates.get(key).copied()
    }

    /// SALT-cap rule for `year`.
    pub fn salt_cap_rule(
        &self,
        year: &str,
    ) -> SaltCapRule {
        match self.year_entry(&self.salt_caps, year, "salt cap") {
            Some(rule) => *rule,
            None => {
                warn!(year, "no SALT cap configured; using flat default");
                SaltCapRule::Flat(SaltCapRule::DEFAULT_FLAT)
            }
        }
    }

    /// Federal brackets for `year` and `status`, if any table applies.
    pub fn federal_brackets(
        &self,
        year: &str,
        status: FilingStatus,
    ) -> Option<&[TaxBracket]> {
        self.year_entry(&self.federal_brackets, year, "federal brackets")
            .and_then(|table| table.get_or_single(status))
            .map(Vec::as_slice)
    }

    pub fn state_income_tax_brackets(&self) -> Option<&[TaxBracket]> {
        self.state_income_tax_brackets.as_deref()
    }

    /// Standard-deduction table for `year`.
    pub fn standard_deduction_table(
        &self,
        year: &str,
    ) -> Cow<'_, StandardDeductionTable> {
        match self.year_entry(&self.standard_deductions, year, "standard deduction") {
            Some(table) => Cow::Borrowed(table),
            None => {
                warn!(year, "no standard deduction table configured; using built-in amounts");
                Cow::Owned(StandardDeductionTable::builtin())
            }
        }
    }

    fn year_entry<'a, T>(
        &'a self,
        map: &'a BTreeMap<String, T>,
        year: &str,
        what: &'static str,
    ) -> Option<&'a T> {
        map.get(year).or_else(|| {
            let fallback = map.get(&self.estimate_year);
            if fallback.is_some() {
                warn!(
                    year,
                    estimate_year = %self.estimate_year,
                    "no {what} for year; using estimate year"
                );
            }
            fallback
        })
    }
}

fn non_negative(
    field: &str,
    value: Decimal,
) -> Result<(), RuleConfigError> {
    if value < Decimal::ZERO {
        return Err(RuleConfigError::NegativeAmount {
            field: field.to_string(),
            value,
        });
    }
    Ok(())
}

fn validate_brackets(
    table: &str,
    brackets: &[TaxBracket],
) -> Result<(), RuleConfigError> {
    if brackets.is_empty() {
        return Err(RuleConfigError::EmptyBracketTable {
            table: table.to_string(),
        });
    }

    let mut previous = Decimal::ZERO;
    for (idx, bracket) in brackets.iter().enumerate() {
        if bracket.rate < Decimal::ZERO || bracket.rate > Decimal::ONE {
            return Err(RuleConfigError::InvalidBracketRate {
                table: table.to_string(),
                rate: bracket.rate,
            });
        }
        match bracket.limit {
            Some(limit) if limit < previous => {
                return Err(RuleConfigError::UnsortedBrackets {
                    table: table.to_string(),
                });
            }
            Some(limit) => previous = limit,
            None if idx + 1 != brackets.len() => {
                return Err(RuleConfigError::UnboundedBracketNotLast {
                    table: table.to_string(),
                });
            }
            None => {}
        }
    }

    Ok(())
}

fn validate_salt_rule(
    year: &str,
    rule: &SaltCapRule,
) -> Result<(), RuleConfigError> {
    let invalid = |reason| RuleConfigError::InvalidPhaseOut {
        year: year.to_string(),
        reason,
    };

    match rule {
        SaltCapRule::Flat(limit) => non_negative(&format!("salt_caps.{year}"), *limit),
        SaltCapRule::PhaseOut(p) => {
            if p.min_limit < Decimal::ZERO {
                return Err(invalid("min_limit is negative"));
            }
            if p.min_limit > p.base_limit {
                return Err(invalid("min_limit exceeds base_limit"));
            }
            if p.phase_out_start >= p.phase_out_end {
                return Err(invalid("phase_out_start must be below phase_out_end"));
            }
            if p.phase_out_step <= Decimal::ZERO {
                return Err(invalid("phase_out_step must be positive"));
            }
            if p.reduction_per_step < Decimal::ZERO {
                return Err(invalid("reduction_per_step is negative"));
            }
            Ok(())
        }
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use rust_decimal_macros::dec;

    use super::*;
    use crate::AssessmentBasis;

    pub(crate) fn sample_programs() -> ReliefPrograms {
        ReliefPrograms {
            senior_freeze: SeniorFreezeRule {
                age_min: 65,
                years_in_home_min: 3,
                income_limit: dec!(168798),
            },
            anchor: AnchorRule {
                homeowner: HomeownerAnchor {
                    tier1: BenefitTier {
                        limit: dec!(150000),
                        base: dec!(1500),
                    },
                    tier2: BenefitTier {
                        limit: dec!(250000),
                        base: dec!(1000),
                    },
                    bonus_age: 65,
                    bonus_amount: dec!(250),
                },
                renter: RenterAnchor {
                    tier1: BenefitTier {
                        limit: dec!(150000),
                        base: dec!(450),
                    },
                    bonus_age: 65,
                    bonus_amount: dec!(250),
                },
            },
            stay_nj: StayNjRule {
                age_min: 65,
                years_in_home_min: None,
                income_limit: dec!(500000),
                benefit_percent: dec!(0.5),
                benefit_cap: dec!(6500),
                total_relief_cap: Some(dec!(6500)),
            },
        }
    }

    fn bracket(
        limit: Option<Decimal>,
        rate: Decimal,
    ) -> TaxBracket {
        TaxBracket { limit, rate }
    }

    pub(crate) fn single_federal_brackets() -> Vec<TaxBracket> {
        vec![
            bracket(Some(dec!(11925)), dec!(0.10)),
            bracket(Some(dec!(48475)), dec!(0.12)),
            bracket(Some(dec!(103350)), dec!(0.22)),
            bracket(Some(dec!(197300)), dec!(0.24)),
            bracket(Some(dec!(250525)), dec!(0.32)),
            bracket(Some(dec!(626350)), dec!(0.35)),
            bracket(None, dec!(0.37)),
        ]
    }

    pub(crate) fn state_brackets() -> Vec<TaxBracket> {
        vec![
            bracket(Some(dec!(20000)), dec!(0.014)),
            bracket(Some(dec!(35000)), dec!(0.0175)),
            bracket(Some(dec!(40000)), dec!(0.035)),
            bracket(Some(dec!(75000)), dec!(0.05525)),
            bracket(Some(dec!(500000)), dec!(0.0637)),
            bracket(Some(dec!(1000000)), dec!(0.0897)),
            bracket(None, dec!(0.1075)),
        ]
    }

    pub(crate) fn phase_out_2025() -> SaltPhaseOut {
        SaltPhaseOut {
            base_limit: dec!(40000),
            phase_out_start: dec!(500000),
            phase_out_end: dec!(600000),
            phase_out_step: dec!(10000),
            reduction_per_step: dec!(3000),
            min_limit: dec!(10000),
        }
    }

    fn scenario(
        label: &str,
        rate: &str,
        year: &str,
        assessment: AssessmentBasis,
        relief: ReliefOverrides,
    ) -> ScenarioSpec {
        ScenarioSpec {
            label: label.to_string(),
            tax_rate_key: rate.to_string(),
            tax_year: year.to_string(),
            assessment,
            relief,
        }
    }

    pub(crate) fn sample_rules() -> RuleConfiguration {
        let mut tax_rates = BTreeMap::new();
        tax_rates.insert("2025".to_string(), dec!(0.02501));
        tax_rates.insert("2026".to_string(), dec!(0.01436));
        tax_rates.insert("2026_yes".to_string(), dec!(0.01580));

        let mut federal_brackets = BTreeMap::new();
        federal_brackets.insert(
            "2025".to_string(),
            ByFilingStatus {
                single: Some(single_federal_brackets()),
                married_joint: None,
                married_separate: None,
                head_of_household: None,
            },
        );

        let mut standard_deductions = BTreeMap::new();
        standard_deductions.insert("2025".to_string(), StandardDeductionTable::builtin());
        standard_deductions.insert(
            "2026_est".to_string(),
            StandardDeductionTable {
                amounts: ByFilingStatus {
                    single: Some(dec!(16100)),
                    married_joint: Some(dec!(32200)),
                    married_separate: None,
                    head_of_household: Some(dec!(24150)),
                },
                age_bonus: AgeBonus {
                    single: dec!(2050),
                    married: dec!(1650),
                },
            },
        );

        let mut salt_caps = BTreeMap::new();
        salt_caps.insert("2025".to_string(), SaltCapRule::PhaseOut(phase_out_2025()));
        salt_caps.insert("2026".to_string(), SaltCapRule::Flat(dec!(40400)));

        RuleConfiguration {
            estimate_year: "2026_est".to_string(),
            tax_rates,
            programs: sample_programs(),
            federal_brackets,
            state_income_tax_brackets: Some(state_brackets()),
            standard_deductions,
            salt_caps,
            scenarios: ScenarioSet {
                prior_year: scenario(
                    "2025 Actual",
                    "2025",
                    "2025",
                    AssessmentBasis::PriorYear,
                    ReliefOverrides {
                        gap_benefit_cap: Some(dec!(0)),
                        disable_combined_cap: true,
                    },
                ),
                proposal_rejected: scenario(
                    "2026 Ballot Fails",
                    "2026",
                    "2026",
                    AssessmentBasis::CurrentYear,
                    ReliefOverrides::default(),
                ),
                proposal_accepted: scenario(
                    "2026 Ballot Passes",
                    "2026_yes",
                    "2026",
                    AssessmentBasis::CurrentYear,
                    ReliefOverrides::default(),
                ),
            },
        }
    }
}
