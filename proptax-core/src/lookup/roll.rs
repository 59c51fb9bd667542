use std::collections::HashMap;

use tracing::{debug, warn};

use super::{LookupError, PropertyLookup};
use crate::PropertyRecord;

/// In-memory assessment roll.
#[derive(Debug, Clone, Default)]
pub struct AssessmentRoll {
    records: Vec<PropertyRecord>,
    index: HashMap<String, usize>,
}

impl AssessmentRoll {
    /// Builds the roll. When two records normalize to the same address the
    /// first one wins.
    pub fn new(records: Vec<PropertyRecord>) -> Self {
        let mut index = HashMap::with_capacity(records.len());
        for (idx, record) in records.iter().enumerate() {
            let key = normalize_address(&record.address);
            if index.contains_key(&key) {
                warn!(address = %record.address, "duplicate address in assessment roll; keeping first");
                continue;
            }
            index.insert(key, idx);
        }

        debug!(records = records.len(), "assessment roll indexed");
        Self { records, index }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[PropertyRecord] {
        &self.records
    }
}

impl PropertyLookup for AssessmentRoll {
    fn find_by_address(&self, address: &str) -> Result<&PropertyRecord, LookupError> {
        let key = normalize_address(address);
        if key.is_empty() {
            return Err(LookupError::EmptyAddress);
        }

        self.index
            .get(&key)
            .map(|&idx| &self.records[idx])
            .ok_or_else(|| LookupError::NotFound(address.trim().to_string()))
    }

    fn list_addresses(&self) -> Vec<&str> {
        self.records.iter().map(|r| r.address.as_str()).collect()
    }
}

/// Lowercases and collapses all whitespace runs to single spaces.
fn normalize_address(address: &str) -> String {
    address
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    fn record(
        address: &str,
        prior: rust_decimal::Decimal,
    ) -> PropertyRecord {
        PropertyRecord {
            address: address.to_string(),
            assessed_value_prior_year: prior,
            assessed_value_current_year: prior + dec!(20000),
        }
    }

    fn sample_roll() -> AssessmentRoll {
        AssessmentRoll::new(vec![
            record("12 Maple Ave", dec!(500000)),
            record("7 Oak St", dec!(410000)),
        ])
    }

    #[test]
    fn find_by_address_exact() {
        let roll = sample_roll();

        let found = roll.find_by_address("7 Oak St").unwrap();

        assert_eq!(found.assessed_value_prior_year, dec!(410000));
    }

    #[test]
    fn find_by_address_ignores_case_and_whitespace() {
        let roll = sample_roll();

        let found = roll.find_by_address("  12   MAPLE ave ").unwrap();

        assert_eq!(found.address, "12 Maple Ave");
    }

    #[test]
    fn find_by_address_unknown() {
        let roll = sample_roll();

        assert_eq!(
            roll.find_by_address(" 99 Elm Rd "),
            Err(LookupError::NotFound("99 Elm Rd".to_string()))
        );
    }

    #[test]
    fn find_by_address_blank_is_rejected() {
        let roll = sample_roll();

        assert_eq!(roll.find_by_address("   "), Err(LookupError::EmptyAddress));
    }

    #[test]
    fn duplicate_addresses_keep_first() {
        let roll = AssessmentRoll::new(vec![
            record("12 Maple Ave", dec!(500000)),
            record("12 maple ave", dec!(1)),
        ]);

        assert_eq!(roll.len(), 2);
        assert_eq!(
            roll.find_by_address("12 Maple Ave").unwrap().assessed_value_prior_year,
            dec!(500000)
        );
    }

    #[test]
    fn list_addresses_in_roll_order() {
        let roll = sample_roll();

        assert_eq!(roll.list_addresses(), vec!["12 Maple Ave", "7 Oak St"]);
    }
}
