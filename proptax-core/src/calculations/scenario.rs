//! Side-by-side comparison of the configured scenarios.
//!
//! Each scenario taxes one of the property's assessments at its own rate,
//! runs relief against a variant of the programs built from the scenario's
//! overrides, and prices the federal deduction for its tax year. The shared
//! [`RuleConfiguration`] is only ever read.
//!
//! # Example
//!
//! ```no_run
//! use proptax_core::calculations::ScenarioEvaluator;
//! use proptax_core::{PropertyRecord, RuleConfiguration, TaxpayerProfile};
//!
//! # fn run(rules: &RuleConfiguration, property: &PropertyRecord) {
//! let evaluator = ScenarioEvaluator::new(rules);
//! let comparison = evaluator
//!     .evaluate(property, &TaxpayerProfile::default())
//!     .unwrap();
//!
//! println!("ballot cost: {}", comparison.deltas.proposal_cost);
//! # }
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::calculations::common::round_half_up;
use crate::calculations::{DeductionCalculator, ReliefCalculator};
use crate::rules::{RuleConfiguration, ScenarioKind, ScenarioSpec};
use crate::{PropertyRecord, ReliefResult, ScenarioResult, TaxpayerProfile};

/// Errors that can occur while evaluating scenarios.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScenarioError {
    /// The scenario's tax rate key is not configured.
    #[error("no tax rate '{key}' for scenario '{scenario}'")]
    MissingTaxRate { scenario: &'static str, key: String },
}

/// Relief and net cost for one scenario.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioOutcome {
    pub kind: ScenarioKind,
    pub label: String,
    pub relief: ReliefResult,
    pub result: ScenarioResult,
}

/// Per-program change in relief between two scenarios.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReliefDelta {
    pub anchor: Decimal,
    pub freeze: Decimal,
    pub stay_nj: Decimal,
    pub total: Decimal,
}

impl ReliefDelta {
    /// `current − baseline`, component by component.
    pub fn between(
        current: &ReliefResult,
        baseline: &ReliefResult,
    ) -> Self {
        Self {
            anchor: current.anchor - baseline.anchor,
            freeze: current.freeze - baseline.freeze,
            stay_nj: current.stay_nj - baseline.stay_nj,
            total: current.total - baseline.total,
        }
    }
}

/// Cross-scenario differences shown alongside the comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioDeltas {
    /// Extra gross tax if the proposal passes (accepted − rejected).
    pub proposal_cost: Decimal,

    /// Accepted-scenario relief relative to the prior year.
    pub relief_vs_prior: ReliefDelta,

    /// Rejected net cost − prior-year net cost.
    pub net_cost_change_rejected: Decimal,

    /// Accepted net cost − prior-year net cost.
    pub net_cost_change_accepted: Decimal,
}

/// Every scenario's outcome plus the deltas between them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioComparison {
    pub prior_year: ScenarioOutcome,
    pub proposal_rejected: ScenarioOutcome,
    pub proposal_accepted: ScenarioOutcome,
    pub deltas: ScenarioDeltas,

    /// Relief is expected if the proposal passes, so the taxpayer should
    /// file the supplemental relief application.
    pub supplemental_filing_prompt: bool,
}

impl ScenarioComparison {
    /// Outcomes in display order.
    pub fn outcomes(&self) -> [&ScenarioOutcome; 3] {
        [&self.prior_year, &self.proposal_rejected, &self.proposal_accepted]
    }
}

/// Runs relief and deduction calculations for every configured scenario.
#[derive(Debug, Clone)]
pub struct ScenarioEvaluator<'a> {
    rules: &'a RuleConfiguration,
}

impl<'a> ScenarioEvaluator<'a> {
    pub fn new(rules: &'a RuleConfiguration) -> Self {
        Self { rules }
    }

    /// Assessed value × scenario rate, rounded to cents.
    ///
    /// # Errors
    ///
    /// Returns [`ScenarioError::MissingTaxRate`] if the scenario's rate key
    /// is not configured.
    pub fn gross_tax(
        &self,
        kind: ScenarioKind,
        property: &PropertyRecord,
    ) -> Result<Decimal, ScenarioError> {
        let spec = self.rules.scenarios.get(kind);
        let rate = self.rate_for(kind, spec)?;
        Ok(round_half_up(property.assessed_value(spec.assessment) * rate))
    }

    /// Prior-year gross tax, used as the Senior Freeze base year for a
    /// taxpayer who has not enrolled yet.
    ///
    /// # Errors
    ///
    /// Returns [`ScenarioError::MissingTaxRate`] if the prior-year rate is
    /// not configured.
    pub fn default_base_year_tax(
        &self,
        property: &PropertyRecord,
    ) -> Result<Decimal, ScenarioError> {
        self.gross_tax(ScenarioKind::PriorYear, property)
    }

    /// Evaluates a single scenario.
    ///
    /// # Errors
    ///
    /// Returns [`ScenarioError::MissingTaxRate`] if the scenario's rate key
    /// is not configured.
    pub fn evaluate_scenario(
        &self,
        kind: ScenarioKind,
        property: &PropertyRecord,
        profile: &TaxpayerProfile,
    ) -> Result<ScenarioOutcome, ScenarioError> {
        let spec = self.rules.scenarios.get(kind);
        let gross_tax = self.gross_tax(kind, property)?;

        let programs = self.rules.programs.with_overrides(&spec.relief);
        let relief = ReliefCalculator::new(&programs).calculate(profile, gross_tax);

        let result = DeductionCalculator::new(self.rules).net_cost(
            gross_tax,
            &relief,
            &spec.tax_year,
            profile,
        );

        debug!(
            scenario = kind.as_str(),
            %gross_tax,
            relief = %relief.total,
            net_cost = %result.net_cost,
            "scenario evaluated"
        );

        Ok(ScenarioOutcome {
            kind,
            label: spec.label.clone(),
            relief,
            result,
        })
    }

    /// Evaluates all scenarios and the deltas between them.
    ///
    /// # Errors
    ///
    /// Returns [`ScenarioError::MissingTaxRate`] if any scenario's rate key
    /// is not configured.
    pub fn evaluate(
        &self,
        property: &PropertyRecord,
        profile: &TaxpayerProfile,
    ) -> Result<ScenarioComparison, ScenarioError> {
        let prior_year = self.evaluate_scenario(ScenarioKind::PriorYear, property, profile)?;
        let proposal_rejected =
            self.evaluate_scenario(ScenarioKind::ProposalRejected, property, profile)?;
        let proposal_accepted =
            self.evaluate_scenario(ScenarioKind::ProposalAccepted, property, profile)?;

        let deltas = ScenarioDeltas {
            proposal_cost: proposal_accepted.result.gross_tax - proposal_rejected.result.gross_tax,
            relief_vs_prior: ReliefDelta::between(&proposal_accepted.relief, &prior_year.relief),
            net_cost_change_rejected: proposal_rejected.result.net_cost
                - prior_year.result.net_cost,
            net_cost_change_accepted: proposal_accepted.result.net_cost
                - prior_year.result.net_cost,
        };
        let supplemental_filing_prompt = proposal_accepted.relief.total > Decimal::ZERO;

        Ok(ScenarioComparison {
            prior_year,
            proposal_rejected,
            proposal_accepted,
            deltas,
            supplemental_filing_prompt,
        })
    }

    fn rate_for(
        &self,
        kind: ScenarioKind,
        spec: &ScenarioSpec,
    ) -> Result<Decimal, ScenarioError> {
        self.rules
            .tax_rate(&spec.tax_rate_key)
            .ok_or_else(|| ScenarioError::MissingTaxRate {
                scenario: kind.as_str(),
                key: spec.tax_rate_key.clone(),
            })
    }
}
