//! Scenario definitions: which rate, deduction year, assessment and relief
//! variant each comparison column uses.

use serde::{Deserialize, Serialize};

use super::programs::ReliefOverrides;
use crate::AssessmentBasis;

/// The three comparison columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScenarioKind {
    PriorYear,
    ProposalRejected,
    ProposalAccepted,
}

impl ScenarioKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PriorYear => "prior_year",
            Self::ProposalRejected => "proposal_rejected",
            Self::ProposalAccepted => "proposal_accepted",
        }
    }
}

/// How one scenario is priced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioSpec {
    /// Column heading, e.g. "2025 Actual".
    pub label: String,

    /// Key into `tax_rates`.
    pub tax_rate_key: String,

    /// Year key for SALT caps, brackets and standard deductions.
    pub tax_year: String,

    pub assessment: AssessmentBasis,

    #[serde(default)]
    pub relief: ReliefOverrides,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioSet {
    pub prior_year: ScenarioSpec,
    pub proposal_rejected: ScenarioSpec,
    pub proposal_accepted: ScenarioSpec,
}

impl ScenarioSet {
    pub fn get(&self, kind: ScenarioKind) -> &ScenarioSpec {
        match kind {
            ScenarioKind::PriorYear => &self.prior_year,
            ScenarioKind::ProposalRejected => &self.proposal_rejected,
            ScenarioKind::ProposalAccepted => &self.proposal_accepted,
        }
    }

    /// Scenarios in display order.
    pub fn iter(&self) -> impl Iterator<Item = (ScenarioKind, &ScenarioSpec)> {
        [
            ScenarioKind::PriorYear,
            ScenarioKind::ProposalRejected,
            ScenarioKind::ProposalAccepted,
        ]
        .into_iter()
        .map(move |kind| (kind, self.get(kind)))
    }
}
