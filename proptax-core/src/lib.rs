pub mod calculations;
pub mod lookup;
pub mod models;
pub mod rules;

pub use lookup::{AssessmentRoll, LookupError, PropertyLookup};
pub use models::*;
pub use rules::{RuleConfigError, RuleConfiguration};
