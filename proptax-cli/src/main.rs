use clap::Parser;
use tracing::debug;

use proptax_cli::{app, cli::Cli, logging};

// ─── entry point ─────────────────────────────────────────────────────────────

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init_logging(cli.log_level.as_deref(), cli.log_file.as_deref())?;
    debug!(?cli, "arguments parsed");

    let report = app::run(&cli)?;
    print!("{report}");

    Ok(())
}
