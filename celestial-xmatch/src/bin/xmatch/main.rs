//! xmatch: positional cross-match of CSV tables
//!
//! Matches every row of a left table against a right table by RA/Dec and
//! writes the joined rows as CSV or JSON.

mod cli;
mod inspect;
mod match_tables;

use clap::Parser;
use cli::{Cli, Commands};
use flexi_logger::{Logger, LoggerHandle};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let _logger = setup_logging(cli.verbose)?;

    match &cli.command {
        Commands::Match(args) => match_tables::run(args, &cli),
        Commands::Inspect(args) => inspect::run(args, &cli),
    }
}

/// Log to stderr so stdout stays clean for table output. `RUST_LOG` wins
/// over the `-v` flag.
fn setup_logging(verbose: bool) -> anyhow::Result<LoggerHandle> {
    let level = if verbose { "debug" } else { "info" };
    let handle = Logger::try_with_env_or_str(level)?
        .log_to_stderr()
        .start()?;
    Ok(handle)
}
