//! Requests command implementation for the isochrone CLI.

use camino::Utf8PathBuf;
use clap::Parser;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};
use std::io::Write;

use crate::services::{DefaultServiceFactory, ServiceConfig, ServiceFactory, write_json};
use crate::{ARG_DATABASE, CliError};

/// CLI arguments for the `requests` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(about = "Print the number of external requests sent so far")]
#[ortho_config(prefix = "ISOCHRONE")]
pub(crate) struct RequestsArgs {
    /// Path to the SQLite trip database.
    #[arg(long = ARG_DATABASE, value_name = "path")]
    #[serde(default)]
    pub(crate) database: Option<Utf8PathBuf>,
}

/// JSON payload printed by the `requests` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct RequestCount {
    /// Geocoding and journey requests recorded in the database.
    pub(crate) requests: u64,
}

pub(crate) fn run_requests(args: RequestsArgs) -> Result<(), CliError> {
    let mut stdout = std::io::stdout().lock();
    run_requests_with(args, &DefaultServiceFactory, &mut stdout)
}

pub(crate) fn run_requests_with(
    args: RequestsArgs,
    factory: &dyn ServiceFactory,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let merged = args.load_and_merge().map_err(CliError::Configuration)?;
    let services = ServiceConfig::resolve(merged.database, None, None, None)?;
    let store = factory.store(&services)?;
    let count = RequestCount {
        requests: store.request_count()?,
    };
    write_json(writer, &count)
}
