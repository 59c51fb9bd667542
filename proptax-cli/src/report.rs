//! Plain-text rendering of a scenario comparison.

use std::fmt;

use proptax_core::calculations::{
    MarginalRate, ScenarioComparison, effective_state_rate, marginal_rate,
};
use proptax_core::{PropertyRecord, RuleConfiguration, ScenarioResult, TaxpayerProfile};
use rust_decimal::Decimal;

use crate::utils::{format_change, format_currency, format_percent};

const LABEL_WIDTH: usize = 26;
const COLUMN_WIDTH: usize = 20;

/// Everything printed for one property and household.
#[derive(Debug)]
pub struct Report<'a> {
    property: &'a PropertyRecord,
    profile: &'a TaxpayerProfile,
    comparison: &'a ScenarioComparison,
    federal_year: &'a str,
    rates: Option<(MarginalRate, Decimal)>,
}

impl<'a> Report<'a> {
    /// The federal marginal rate is read from the prior-year scenario's
    /// brackets, the latest year with published tables.
    pub fn new(
        property: &'a PropertyRecord,
        profile: &'a TaxpayerProfile,
        rules: &'a RuleConfiguration,
        comparison: &'a ScenarioComparison,
    ) -> Self {
        let federal_year = rules.scenarios.prior_year.tax_year.as_str();
        let rates = profile.household_income.map(|income| {
            let federal = marginal_rate(
                income,
                rules.federal_brackets(federal_year, profile.filing_status),
            );
            let state = effective_state_rate(income, rules.state_income_tax_brackets());
            (federal, state)
        });

        Self {
            property,
            profile,
            comparison,
            federal_year,
            rates,
        }
    }

    fn write_household(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        let profile = self.profile;
        let age = if profile.age.is_65_or_older() {
            "65 or older"
        } else {
            "under 65"
        };
        let occupancy = if profile.is_homeowner() {
            "homeowner"
        } else {
            "renter"
        };
        let income = profile
            .household_income
            .map_or_else(|| "not provided".to_string(), format_currency);

        writeln!(f, "Household: {age}, {occupancy}, {}", profile.filing_status.as_str())?;
        writeln!(f, "  {:<w$}{income}", "Income", w = LABEL_WIDTH - 2)?;
        writeln!(f, "  {:<w$}{}", "Years in home", profile.years_in_home, w = LABEL_WIDTH - 2)?;
        writeln!(
            f,
            "  {:<w$}{}",
            "Base-year tax",
            format_currency(profile.base_year_tax),
            w = LABEL_WIDTH - 2
        )?;

        match self.rates {
            Some((federal, state)) => {
                writeln!(
                    f,
                    "  {:<w$}{}",
                    format!("Federal bracket ({})", self.federal_year),
                    format_percent(federal.rate, 0),
                    w = LABEL_WIDTH - 2
                )?;
                writeln!(
                    f,
                    "  {:<w$}{}",
                    "State effective rate",
                    format_percent(state, 1),
                    w = LABEL_WIDTH - 2
                )
            }
            None => writeln!(f, "  Relief requires household income; none was given."),
        }
    }

    fn write_table(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        let outcomes = self.comparison.outcomes();

        write!(f, "{:<w$}", "", w = LABEL_WIDTH)?;
        for outcome in outcomes {
            write!(f, "{:>w$}", outcome.label, w = COLUMN_WIDTH)?;
        }
        writeln!(f)?;

        let rows: [(&str, fn(&ScenarioResult) -> String); 9] = [
            ("Gross property tax", |r: &ScenarioResult| format_currency(r.gross_tax)),
            ("State relief", |r: &ScenarioResult| format_currency(r.relief_total)),
            ("Net property tax", |r: &ScenarioResult| format_currency(r.net_property_tax)),
            ("State income tax (est.)", |r: &ScenarioResult| format_currency(r.state_income_tax)),
            ("SALT cap", |r: &ScenarioResult| format_currency(r.salt_cap)),
            ("SALT deduction", |r: &ScenarioResult| {
                let capped = if r.is_salt_capped { " *" } else { "" };
                format!("{}{capped}", format_currency(r.salt_deduction))
            }),
            ("Itemizing", |r: &ScenarioResult| {
                (if r.is_itemizing { "yes" } else { "no" }).to_string()
            }),
            ("Federal benefit", |r: &ScenarioResult| format_currency(r.federal_benefit)),
            ("Net cost", |r: &ScenarioResult| format_currency(r.net_cost)),
        ];

        for (label, cell) in rows {
            write!(f, "{label:<w$}", w = LABEL_WIDTH)?;
            for outcome in outcomes {
                write!(f, "{:>w$}", cell(&outcome.result), w = COLUMN_WIDTH)?;
            }
            writeln!(f)?;
        }

        if outcomes.iter().any(|o| o.result.is_salt_capped) {
            writeln!(f, "* limited by the SALT cap")?;
        }
        Ok(())
    }

    fn write_relief(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        let accepted = &self.comparison.proposal_accepted;
        let delta = &self.comparison.deltas.relief_vs_prior;

        writeln!(
            f,
            "Relief, {} (vs {}):",
            accepted.label, self.comparison.prior_year.label
        )?;
        let lines = [
            ("ANCHOR", accepted.relief.anchor, delta.anchor),
            ("Senior Freeze", accepted.relief.freeze, delta.freeze),
            ("Stay NJ", accepted.relief.stay_nj, delta.stay_nj),
            ("Total", accepted.relief.total, delta.total),
        ];
        for (program, amount, change) in lines {
            writeln!(
                f,
                "  {program:<w$}{:>14}  ({})",
                format_currency(amount),
                format_change(change),
                w = LABEL_WIDTH - 2
            )?;
        }
        Ok(())
    }
}

impl fmt::Display for Report<'_> {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        let comparison = self.comparison;
        let deltas = &comparison.deltas;

        writeln!(f, "Property: {}", self.property.address)?;
        writeln!(
            f,
            "  {:<w$}{}",
            "Prior-year assessment",
            format_currency(self.property.assessed_value_prior_year),
            w = LABEL_WIDTH - 2
        )?;
        writeln!(
            f,
            "  {:<w$}{}",
            "Current assessment",
            format_currency(self.property.assessed_value_current_year),
            w = LABEL_WIDTH - 2
        )?;
        writeln!(f)?;

        self.write_household(f)?;
        writeln!(f)?;

        self.write_table(f)?;
        writeln!(f)?;

        self.write_relief(f)?;
        writeln!(f)?;

        writeln!(f, "Cost of the ballot measure: {}", format_change(deltas.proposal_cost))?;
        writeln!(f, "Net cost change vs {}:", comparison.prior_year.label)?;
        writeln!(
            f,
            "  {:<w$}{}",
            comparison.proposal_rejected.label,
            format_change(deltas.net_cost_change_rejected),
            w = LABEL_WIDTH - 2
        )?;
        writeln!(
            f,
            "  {:<w$}{}",
            comparison.proposal_accepted.label,
            format_change(deltas.net_cost_change_accepted),
            w = LABEL_WIDTH - 2
        )?;

        if comparison.supplemental_filing_prompt {
            writeln!(f)?;
            writeln!(
                f,
                "You appear eligible for relief. File form PAS-1 to apply for the \
                 Senior Freeze and Stay NJ benefits."
            )?;
        }
        Ok(())
    }
}
