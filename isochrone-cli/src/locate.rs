//! Locate command implementation for the isochrone CLI.

use camino::Utf8PathBuf;
use clap::Parser;
use isochrone_core::{Location, SamplerConfig, SamplingSession};
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};
use std::io::Write;

use crate::services::{
    DefaultServiceFactory, ServiceConfig, ServiceFactory, block_on, write_json,
};
use crate::{
    ARG_DATABASE, ARG_LOCATE_DESCRIPTION, ARG_REQUESTS_PER_MINUTE, ARG_TRANSIT_URL, CliError,
    ENV_LOCATE_DESCRIPTION,
};

/// CLI arguments for the `locate` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Resolve an address, stop name or alias to a stored \
                 location. Unknown descriptions are looked up with the \
                 transit service and remembered as aliases.",
    about = "Resolve a description to a location"
)]
#[ortho_config(prefix = "ISOCHRONE")]
pub(crate) struct LocateArgs {
    /// Address, stop or alias to resolve.
    #[arg(value_name = "description")]
    #[serde(default)]
    pub(crate) description: Option<String>,
    /// Path to the SQLite trip database.
    #[arg(long = ARG_DATABASE, value_name = "path")]
    #[serde(default)]
    pub(crate) database: Option<Utf8PathBuf>,
    /// Base URL of a `transport.rest` service; repeat to add more.
    #[arg(long = ARG_TRANSIT_URL, value_name = "url")]
    #[serde(default)]
    pub(crate) transit_url: Option<Vec<String>>,
    /// Requests per minute allowed for each transit service.
    #[arg(long = ARG_REQUESTS_PER_MINUTE, value_name = "n")]
    #[serde(default)]
    pub(crate) requests_per_minute: Option<usize>,
}

/// Resolved `locate` command configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct LocateConfig {
    /// Description to resolve.
    pub(crate) description: String,
    /// Store and service settings.
    pub(crate) services: ServiceConfig,
}

impl TryFrom<LocateArgs> for LocateConfig {
    type Error = CliError;

    fn try_from(args: LocateArgs) -> Result<Self, Self::Error> {
        let description = args.description.ok_or(CliError::MissingArgument {
            field: ARG_LOCATE_DESCRIPTION,
            env: ENV_LOCATE_DESCRIPTION,
        })?;
        let services =
            ServiceConfig::resolve(args.database, args.transit_url, None, args.requests_per_minute)?;
        Ok(Self {
            description,
            services,
        })
    }
}

pub(crate) fn run_locate(args: LocateArgs) -> Result<(), CliError> {
    let mut stdout = std::io::stdout().lock();
    run_locate_with(args, &DefaultServiceFactory, &mut stdout)
}

pub(crate) fn run_locate_with(
    args: LocateArgs,
    factory: &dyn ServiceFactory,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let merged = args.load_and_merge().map_err(CliError::Configuration)?;
    let config = LocateConfig::try_from(merged)?;
    let location = execute_locate(&config, factory)?;
    write_json(writer, &location)
}

fn execute_locate(config: &LocateConfig, factory: &dyn ServiceFactory) -> Result<Location, CliError> {
    let store = factory.store(&config.services)?;
    let transit = factory.transit(&config.services)?;
    let geocoder = factory.geocoder(&config.services)?;
    let session = SamplingSession::new(&*store, &*transit, &*geocoder, SamplerConfig::default());
    let location = block_on(session.locate(&config.description))??;
    Ok(location)
}
