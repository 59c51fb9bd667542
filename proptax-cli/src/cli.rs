use std::path::PathBuf;

use clap::{Args, Parser};
use proptax_core::{AgeGroup, FilingStatus, Occupancy, TaxpayerProfile};
use rust_decimal::Decimal;
use tracing::warn;

use crate::utils::{parse_decimal, parse_optional_decimal};

/// Compare the net cost of a property's tax across the prior year and both
/// ballot outcomes.
#[derive(Debug, Parser)]
#[command(name = "proptax", version, about)]
pub struct Cli {
    /// Rule configuration file (.toml or .json)
    #[arg(long, value_name = "FILE")]
    pub rules: PathBuf,

    /// Assessment roll CSV
    #[arg(long, value_name = "FILE")]
    pub assessments: PathBuf,

    /// Property address; lists every address in the roll when omitted
    #[arg(long)]
    pub address: Option<String>,

    #[command(flatten)]
    pub taxpayer: TaxpayerArgs,

    /// Log level or filter directive (overrides RUST_LOG)
    #[arg(long, value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// Append logs to this file as well as stderr
    #[arg(long, value_name = "FILE")]
    pub log_file: Option<PathBuf>,
}

/// Household facts as typed on the command line. Amounts are kept as text
/// and coerced by [`TaxpayerArgs::to_profile`].
#[derive(Debug, Clone, Default, Args)]
pub struct TaxpayerArgs {
    /// Taxpayer is 65 or older
    #[arg(long = "age-65")]
    pub age_65: bool,

    /// Household income; leave unset to skip means-tested relief
    #[arg(long, value_name = "AMOUNT")]
    pub income: Option<String>,

    #[arg(long, value_name = "YEARS", default_value_t = 0)]
    pub years_in_home: u32,

    /// single, married_joint, married_separate, head_of_household (or s, mfj, mfs, hoh)
    #[arg(long, value_name = "STATUS", default_value = "single")]
    pub filing_status: String,

    /// Taxpayer rents the residence
    #[arg(long)]
    pub renter: bool,

    /// Senior Freeze base-year tax; defaults to the prior-year tax
    #[arg(long, value_name = "AMOUNT")]
    pub base_year_tax: Option<String>,

    #[arg(long, value_name = "AMOUNT")]
    pub mortgage_interest: Option<String>,

    #[arg(long, value_name = "AMOUNT")]
    pub charitable_giving: Option<String>,
}

impl TaxpayerArgs {
    /// Builds the profile. `default_base_year_tax` is used when no base-year
    /// tax was given or it does not parse.
    pub fn to_profile(
        &self,
        default_base_year_tax: Decimal,
    ) -> TaxpayerProfile {
        let filing_status = FilingStatus::parse(&self.filing_status).unwrap_or_else(|| {
            warn!(input = %self.filing_status, "unknown filing status; using single");
            FilingStatus::Single
        });

        TaxpayerProfile {
            age: if self.age_65 {
                AgeGroup::SixtyFivePlus
            } else {
                AgeGroup::Under65
            },
            household_income: self.household_income(),
            years_in_home: self.years_in_home,
            filing_status,
            occupancy: if self.renter {
                Occupancy::Renter
            } else {
                Occupancy::Homeowner
            },
            base_year_tax: self
                .base_year_tax
                .as_deref()
                .and_then(parse_optional_decimal)
                .unwrap_or(default_base_year_tax),
            mortgage_interest: self.mortgage_interest.as_deref().map_or(Decimal::ZERO, parse_decimal),
            charitable_giving: self.charitable_giving.as_deref().map_or(Decimal::ZERO, parse_decimal),
        }
    }

    /// Income as entered. A negative amount cannot qualify for anything and
    /// is treated as not provided.
    fn household_income(&self) -> Option<Decimal> {
        let income = self.income.as_deref().and_then(parse_optional_decimal)?;
        if income < Decimal::ZERO {
            warn!(%income, "negative household income ignored");
            return None;
        }
        Some(income)
    }
}
