//! Sample command implementation for the isochrone CLI.

use camino::Utf8PathBuf;
use clap::Parser;
use isochrone_core::sampling::BoundingRegion;
use isochrone_core::{SampleReport, SamplerConfig, SamplingSession};
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};
use std::io::Write;

use crate::services::{
    DefaultServiceFactory, ServiceConfig, ServiceFactory, block_on, write_json,
};
use crate::{
    ARG_DATABASE, ARG_GEOCODER_URL, ARG_REQUESTS_PER_MINUTE, ARG_SAMPLE_ORIGIN, ARG_TRANSIT_URL,
    CliError, ENV_SAMPLE_ORIGIN,
};

/// Usable samples collected when `--count` is not given.
pub(crate) const DEFAULT_COUNT: usize = 10;

/// CLI arguments for the `sample` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Probe new destinations around an origin and store their \
                 public transit travel times. Probe points come from a \
                 lattice over the region until it is covered, then from the \
                 largest gaps between known destinations.",
    about = "Sample travel times from an origin"
)]
#[ortho_config(prefix = "ISOCHRONE")]
pub(crate) struct SampleArgs {
    /// Address, stop or alias of the origin.
    #[arg(value_name = "origin")]
    #[serde(default)]
    pub(crate) origin: Option<String>,
    /// Number of reachable destinations to collect.
    #[arg(long, value_name = "n")]
    #[serde(default)]
    pub(crate) count: Option<usize>,
    /// Western bound of the sampling region (longitude).
    #[arg(long, value_name = "deg", allow_hyphen_values = true)]
    #[serde(default)]
    pub(crate) west: Option<f64>,
    /// Eastern bound of the sampling region (longitude).
    #[arg(long, value_name = "deg", allow_hyphen_values = true)]
    #[serde(default)]
    pub(crate) east: Option<f64>,
    /// Southern bound of the sampling region (latitude).
    #[arg(long, value_name = "deg", allow_hyphen_values = true)]
    #[serde(default)]
    pub(crate) south: Option<f64>,
    /// Northern bound of the sampling region (latitude).
    #[arg(long, value_name = "deg", allow_hyphen_values = true)]
    #[serde(default)]
    pub(crate) north: Option<f64>,
    /// Lattice points per axis before adaptive sampling takes over.
    #[arg(long, value_name = "n")]
    #[serde(default)]
    pub(crate) points_per_axis: Option<u32>,
    /// Destinations resolved concurrently.
    #[arg(long, value_name = "n")]
    #[serde(default)]
    pub(crate) batch_size: Option<usize>,
    /// Probes sent per session before giving up, usable or not.
    #[arg(long, value_name = "n")]
    #[serde(default)]
    pub(crate) max_probes: Option<usize>,
    /// Path to the SQLite trip database.
    #[arg(long = ARG_DATABASE, value_name = "path")]
    #[serde(default)]
    pub(crate) database: Option<Utf8PathBuf>,
    /// Base URL of a `transport.rest` service; repeat to add more.
    #[arg(long = ARG_TRANSIT_URL, value_name = "url")]
    #[serde(default)]
    pub(crate) transit_url: Option<Vec<String>>,
    /// Base URL of the Nominatim instance.
    #[arg(long = ARG_GEOCODER_URL, value_name = "url")]
    #[serde(default)]
    pub(crate) geocoder_url: Option<String>,
    /// Requests per minute allowed for each transit service.
    #[arg(long = ARG_REQUESTS_PER_MINUTE, value_name = "n")]
    #[serde(default)]
    pub(crate) requests_per_minute: Option<usize>,
}

impl SampleArgs {
    pub(crate) fn into_config(self) -> Result<SampleConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        SampleConfig::try_from(merged)
    }
}

/// Resolved `sample` command configuration.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct SampleConfig {
    /// Description of the origin.
    pub(crate) origin: String,
    /// Number of usable samples to collect.
    pub(crate) count: usize,
    /// Region, density and batch size of the session.
    pub(crate) sampler: SamplerConfig,
    /// Store and service settings.
    pub(crate) services: ServiceConfig,
}

impl TryFrom<SampleArgs> for SampleConfig {
    type Error = CliError;

    fn try_from(args: SampleArgs) -> Result<Self, Self::Error> {
        let origin = args.origin.ok_or(CliError::MissingArgument {
            field: ARG_SAMPLE_ORIGIN,
            env: ENV_SAMPLE_ORIGIN,
        })?;

        let defaults = SamplerConfig::default();
        let region = BoundingRegion::new(
            args.west.unwrap_or(defaults.region.west()),
            args.east.unwrap_or(defaults.region.east()),
            args.south.unwrap_or(defaults.region.south()),
            args.north.unwrap_or(defaults.region.north()),
        )?;
        let sampler = defaults
            .with_region(region)
            .with_points_per_axis(args.points_per_axis.unwrap_or(defaults.points_per_axis))
            .with_batch_size(args.batch_size.unwrap_or(defaults.batch_size));
        let sampler = SamplerConfig {
            max_probes: args.max_probes,
            ..sampler
        };

        let services = ServiceConfig::resolve(
            args.database,
            args.transit_url,
            args.geocoder_url,
            args.requests_per_minute,
        )?;

        Ok(Self {
            origin,
            count: args.count.unwrap_or(DEFAULT_COUNT),
            sampler,
            services,
        })
    }
}

pub(crate) fn run_sample(args: SampleArgs) -> Result<(), CliError> {
    let mut stdout = std::io::stdout().lock();
    run_sample_with(args, &DefaultServiceFactory, &mut stdout)
}

pub(crate) fn run_sample_with(
    args: SampleArgs,
    factory: &dyn ServiceFactory,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let config = args.into_config()?;
    let report = execute_sample(&config, factory)?;
    write_json(writer, &report)
}

fn execute_sample(
    config: &SampleConfig,
    factory: &dyn ServiceFactory,
) -> Result<SampleReport, CliError> {
    let store = factory.store(&config.services)?;
    let transit = factory.transit(&config.services)?;
    let geocoder = factory.geocoder(&config.services)?;
    let session = SamplingSession::new(&*store, &*transit, &*geocoder, config.sampler);

    let report = block_on(async {
        let origin = session.locate(&config.origin).await?;
        session.sample(&origin, config.count).await
    })??;
    Ok(report)
}

#[cfg(test)]
pub(crate) fn config_from_layers_for_test(
    layers: Vec<ortho_config::MergeLayer<'static>>,
) -> Result<SampleConfig, CliError> {
    let merged = SampleArgs::merge_from_layers(layers).map_err(CliError::from)?;
    SampleConfig::try_from(merged)
}
