mod filing_status;
mod property_record;
mod relief_result;
mod scenario_result;
mod taxpayer_profile;

pub use filing_status::FilingStatus;
pub use property_record::{AssessmentBasis, PropertyRecord};
pub use relief_result::ReliefResult;
pub use scenario_result::ScenarioResult;
pub use taxpayer_profile::{AgeGroup, Occupancy, TaxpayerProfile};
