use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use proptax_data::{AssessmentLoader, RuleLoader};

/// Validate a rule configuration and, optionally, an assessment roll.
///
/// The rules file may be TOML or JSON (chosen by extension). The assessment
/// roll is a CSV file with the columns:
/// - address: Street address of the parcel
/// - assessment_prior: Prior-year assessed value
/// - assessment_current: Current (proposed) assessed value
#[derive(Parser, Debug)]
#[command(name = "proptax-data-check")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the rule configuration file
    #[arg(short, long)]
    rules: PathBuf,

    /// Path to the assessment roll CSV
    #[arg(short, long)]
    assessments: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    println!("Checking rules: {}", args.rules.display());
    let rules = RuleLoader::load_from_file(&args.rules)
        .with_context(|| format!("Failed to load rules: {}", args.rules.display()))?;

    for (kind, spec) in rules.scenarios.iter() {
        println!(
            "  {:<18} {:<20} rate {} ({}), tax year {}",
            kind.as_str(),
            spec.label,
            spec.tax_rate_key,
            rules.tax_rate(&spec.tax_rate_key).unwrap_or_default(),
            spec.tax_year,
        );
    }

    if let Some(path) = &args.assessments {
        println!("Checking assessment roll: {}", path.display());
        let records = AssessmentLoader::load_from_file(path)
            .with_context(|| format!("Failed to parse CSV: {}", path.display()))?;
        println!("Parsed {} properties.", records.len());
    }

    println!("OK");
    Ok(())
}
