//! Command-line interface for the isochrone sampling engine.
#![forbid(unsafe_code)]

use clap::{Parser, Subcommand};

mod error;
mod locate;
mod requests;
mod sample;
mod services;

pub use error::CliError;

use locate::{LocateArgs, run_locate};
use requests::{RequestsArgs, run_requests};
use sample::{SampleArgs, run_sample};

pub(crate) const ARG_SAMPLE_ORIGIN: &str = "origin";
pub(crate) const ARG_LOCATE_DESCRIPTION: &str = "description";
pub(crate) const ARG_DATABASE: &str = "database";
pub(crate) const ARG_TRANSIT_URL: &str = "transit-url";
pub(crate) const ARG_GEOCODER_URL: &str = "geocoder-url";
pub(crate) const ARG_REQUESTS_PER_MINUTE: &str = "requests-per-minute";
pub(crate) const ENV_SAMPLE_ORIGIN: &str = "ISOCHRONE_CMDS_SAMPLE_ORIGIN";
pub(crate) const ENV_LOCATE_DESCRIPTION: &str = "ISOCHRONE_CMDS_LOCATE_DESCRIPTION";

/// Run the isochrone CLI with the current process arguments and environment.
pub fn run() -> Result<(), CliError> {
    let cli = Cli::try_parse().map_err(CliError::ArgumentParsing)?;
    match cli.command {
        Command::Sample(args) => run_sample(args),
        Command::Locate(args) => run_locate(args),
        Command::Requests(args) => run_requests(args),
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "isochrone",
    about = "Sample public transit travel times around an origin",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Probe new destinations from an origin and store their travel times.
    Sample(SampleArgs),
    /// Resolve a free-text description to a stored location.
    Locate(LocateArgs),
    /// Print how many external requests have been sent so far.
    Requests(RequestsArgs),
}

#[cfg(test)]
mod tests;
