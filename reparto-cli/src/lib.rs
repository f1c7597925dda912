//! Command-line interface for planning delivery rounds.
#![forbid(unsafe_code)]

use clap::{Parser, Subcommand};

mod check;
mod error;
mod geocoder;
mod plan;

pub use error::CliError;

use check::{CheckArgs, run_check};
use plan::{PlanArgs, run_plan};

pub(crate) const ARG_START: &str = "start";
pub(crate) const ARG_END: &str = "end";
pub(crate) const ARG_STOPS_FILE: &str = "stops-file";
pub(crate) const ARG_GEOCODER_URL: &str = "geocoder-url";
pub(crate) const ARG_USER_AGENT: &str = "user-agent";
pub(crate) const ARG_TIMEOUT_SECS: &str = "timeout-secs";
pub(crate) const ARG_DIRECTIONS_URL: &str = "directions-url";
pub(crate) const ARG_FORMAT: &str = "format";
pub(crate) const ARG_DEBOUNCE_MS: &str = "debounce-ms";
pub(crate) const ENV_PLAN_START: &str = "REPARTO_CMDS_PLAN_START";
pub(crate) const ENV_PLAN_END: &str = "REPARTO_CMDS_PLAN_END";

/// Run the Reparto CLI with the current process arguments and environment.
pub fn run() -> Result<(), CliError> {
    let cli = Cli::try_parse().map_err(CliError::ArgumentParsing)?;
    match cli.command {
        Command::Plan(args) => run_plan(args),
        Command::Check(args) => run_check(args),
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "reparto",
    about = "Geocode delivery addresses and order them into a driving route",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Resolve every address, order the stops and print a navigation link.
    Plan(PlanArgs),
    /// Validate every address field and report which ones resolve.
    Check(CheckArgs),
}

#[cfg(test)]
mod tests;
