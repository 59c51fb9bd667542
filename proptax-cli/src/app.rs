use std::fmt::Write as _;

use anyhow::{Context, Result};
use proptax_core::calculations::ScenarioEvaluator;
use proptax_core::{AssessmentRoll, PropertyLookup};
use proptax_data::{AssessmentLoader, RuleLoader};
use tracing::{debug, info};

use crate::cli::Cli;
use crate::report::Report;

/// Loads the rules and assessment roll named on the command line and renders
/// the comparison for `--address`, or the address list when none was given.
pub fn run(cli: &Cli) -> Result<String> {
    let rules = RuleLoader::load_from_file(&cli.rules)
        .with_context(|| format!("failed to load rules from '{}'", cli.rules.display()))?;

    let records = AssessmentLoader::load_from_file(&cli.assessments).with_context(|| {
        format!("failed to load assessments from '{}'", cli.assessments.display())
    })?;
    let roll = AssessmentRoll::new(records);
    info!(properties = roll.len(), "assessment roll loaded");

    let Some(address) = cli.address.as_deref() else {
        return Ok(address_list(&roll));
    };

    let property = roll.find_by_address(address).with_context(|| {
        format!("no property for '{}' (run without --address to list them)", address.trim())
    })?;
    debug!(address = %property.address, "property found");

    let evaluator = ScenarioEvaluator::new(&rules);
    let default_base = evaluator
        .default_base_year_tax(property)
        .context("cannot price the prior-year tax")?;
    let profile = cli.taxpayer.to_profile(default_base);

    let comparison = evaluator
        .evaluate(property, &profile)
        .context("scenario evaluation failed")?;

    Ok(Report::new(property, &profile, &rules, &comparison).to_string())
}

/// One address per line, in roll order.
fn address_list(roll: &impl PropertyLookup) -> String {
    let addresses = roll.list_addresses();
    let mut out = format!("{} properties:\n", addresses.len());
    for address in addresses {
        let _ = writeln!(out, "  {address}");
    }
    out
}
