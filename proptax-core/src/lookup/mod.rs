mod roll;

use thiserror::Error;

pub use roll::AssessmentRoll;

use crate::PropertyRecord;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LookupError {
    #[error("No property found for address: {0}")]
    NotFound(String),

    #[error("Address is empty")]
    EmptyAddress,
}

/// Source of assessed values keyed by street address.
pub trait PropertyLookup {
    /// Finds the record for `address`, ignoring case and surrounding or
    /// repeated whitespace.
    fn find_by_address(&self, address: &str) -> Result<&PropertyRecord, LookupError>;

    fn list_addresses(&self) -> Vec<&str>;
}
