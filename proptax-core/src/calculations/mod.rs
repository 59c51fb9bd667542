//! Property-tax calculations.
//!
//! [`ReliefCalculator`] computes state relief for a tax amount,
//! [`DeductionCalculator`] prices the federal deduction and net cost, and
//! [`ScenarioEvaluator`] runs both across the configured scenarios.

pub mod common;
pub mod deduction;
pub mod relief;
pub mod scenario;

pub use deduction::{
    DeductionCalculator, MarginalRate, compute_salt_cap, effective_state_rate,
    estimate_state_income_tax, marginal_rate, standard_deduction,
};
pub use relief::ReliefCalculator;
pub use scenario::{
    ReliefDelta, ScenarioComparison, ScenarioDeltas, ScenarioError, ScenarioEvaluator,
    ScenarioOutcome,
};
