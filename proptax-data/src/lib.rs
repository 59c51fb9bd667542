pub mod assessments;
pub mod rules_loader;

pub use assessments::{AssessmentLoadError, AssessmentLoader};
pub use rules_loader::{RuleLoadError, RuleLoader};
