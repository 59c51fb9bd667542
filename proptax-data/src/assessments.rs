//! Loader for the municipal assessment roll.
//!
//! ## CSV Format
//!
//! | Column | Type | Notes |
//! |----------------------|---------|--------------------------------------------|
//! | `address` | string | Street address; whitespace is normalized |
//! | `assessment_prior` | decimal | Prior-year assessed value |
//! | `assessment_current` | decimal | Current (proposed) assessed value |
//!
//! The roll is usually exported from a spreadsheet, so the loader is lenient:
//!
//! - rows with a blank or `nan` address are skipped
//! - header rows repeated inside the data are skipped
//! - `$` and thousands separators are stripped from values
//! - values that still do not parse load as zero, with a warning
//!
//! ### Example
//!
//! ```csv
//! address,assessment_prior,assessment_current
//! 12 Maple Ave,"$500,000","$520,000"
//! 7   Oak St,410000,428500
//! ```

use std::io::Read;
use std::path::Path;
use std::sync::LazyLock;

use proptax_core::PropertyRecord;
use regex::Regex;
use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, warn};

static WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("whitespace pattern is valid"));

/// Errors that can occur when loading the assessment roll.
#[derive(Debug, Error)]
pub enum AssessmentLoadError {
    #[error("CSV parse error on row {row}: {source}")]
    Parse {
        row: usize,
        #[source]
        source: csv::Error,
    },

    #[error("failed to read assessment file: {0}")]
    Io(#[from] std::io::Error),
}

/// One raw row from the assessment CSV. Cells are kept as text so that
/// spreadsheet artifacts can be cleaned up before parsing.
#[derive(Debug, Deserialize)]
struct AssessmentRow {
    #[serde(default)]
    address: String,
    #[serde(default)]
    assessment_prior: String,
    #[serde(default)]
    assessment_current: String,
}

/// Loader for [`PropertyRecord`]s from CSV.
pub struct AssessmentLoader;

impl AssessmentLoader {
    /// Parses the roll from any reader. Records are returned sorted by
    /// address.
    pub fn parse<R: Read>(reader: R) -> Result<Vec<PropertyRecord>, AssessmentLoadError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(reader);

        let mut records = Vec::new();
        let mut skipped = 0usize;

        for (idx, result) in csv_reader.deserialize::<AssessmentRow>().enumerate() {
            let row_number = idx + 1;
            let row = result.map_err(|source| AssessmentLoadError::Parse {
                row: row_number,
                source,
            })?;

            match convert_row(row, row_number) {
                Some(record) => records.push(record),
                None => skipped += 1,
            }
        }

        records.sort_by(|a, b| a.address.cmp(&b.address));
        debug!(records = records.len(), skipped, "assessment roll parsed");
        Ok(records)
    }

    pub fn load_from_file(path: &Path) -> Result<Vec<PropertyRecord>, AssessmentLoadError> {
        let file = std::fs::File::open(path)?;
        Self::parse(file)
    }
}

/// Cleans one row. Returns `None` for rows that carry no property.
fn convert_row(
    row: AssessmentRow,
    row_number: usize,
) -> Option<PropertyRecord> {
    let address = normalize_address(&row.address);

    if address.is_empty() || address.eq_ignore_ascii_case("nan") {
        return None;
    }
    if is_header_label(&address) {
        debug!(row = row_number, "repeated header row skipped");
        return None;
    }

    Some(PropertyRecord {
        assessed_value_prior_year: parse_assessment(&row.assessment_prior, row_number),
        assessed_value_current_year: parse_assessment(&row.assessment_current, row_number),
        address,
    })
}

fn normalize_address(address: &str) -> String {
    WHITESPACE.replace_all(address.trim(), " ").into_owned()
}

fn is_header_label(address: &str) -> bool {
    ["address", "location"]
        .iter()
        .any(|label| address.eq_ignore_ascii_case(label))
}

fn parse_assessment(
    cell: &str,
    row_number: usize,
) -> Decimal {
    let cleaned: String = cell
        .trim()
        .chars()
        .filter(|c| *c != '$' && *c != ',')
        .collect();

    if cleaned.is_empty() {
        return Decimal::ZERO;
    }

    cleaned.parse().unwrap_or_else(|_| {
        warn!(row = row_number, value = %cell, "unparsable assessment; using 0");
        Decimal::ZERO
    })
}
