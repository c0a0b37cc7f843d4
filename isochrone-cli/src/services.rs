//! Construction of the store and external services shared by the commands.

use std::io::Write;

use camino::{Utf8Path, Utf8PathBuf};
use isochrone_core::{ReverseGeocoder, TransitProvider, TripStore};
use isochrone_data::{
    DEFAULT_REQUESTS_PER_MINUTE, NominatimConfig, NominatimGeocoder, ProviderPool,
    RateLimitedProvider, RestTransitProvider,
};
use isochrone_fs::PathKind;
use serde::Serialize;

use crate::CliError;

/// Database file used when no `--database` is configured.
pub(crate) const DEFAULT_DATABASE: &str = "isochrone.db";

/// Transit services queried when no `--transit-url` is configured.
pub(crate) const DEFAULT_TRANSIT_URLS: [&str; 2] = [
    "https://v6.bvg.transport.rest",
    "https://v6.vbb.transport.rest",
];

/// Nominatim's usage policy allows one request per second.
const GEOCODER_REQUESTS_PER_MINUTE: usize = 60;

/// Resolved settings for the store and the external services.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ServiceConfig {
    /// Path to the SQLite trip database.
    pub(crate) database: Utf8PathBuf,
    /// Transit services the provider pool spreads requests over.
    pub(crate) transit_urls: Vec<String>,
    /// Nominatim instance used for reverse geocoding.
    pub(crate) geocoder_url: String,
    /// Budget of each transit service.
    pub(crate) requests_per_minute: usize,
}

impl ServiceConfig {
    pub(crate) fn resolve(
        database: Option<Utf8PathBuf>,
        transit_urls: Option<Vec<String>>,
        geocoder_url: Option<String>,
        requests_per_minute: Option<usize>,
    ) -> Result<Self, CliError> {
        let transit_urls = transit_urls.unwrap_or_else(|| {
            DEFAULT_TRANSIT_URLS
                .iter()
                .map(|url| (*url).to_owned())
                .collect()
        });
        if transit_urls.is_empty() {
            return Err(CliError::NoTransitProviders);
        }
        Ok(Self {
            database: database.unwrap_or_else(|| Utf8PathBuf::from(DEFAULT_DATABASE)),
            transit_urls,
            geocoder_url: geocoder_url.unwrap_or_else(|| NominatimConfig::default().base_url),
            requests_per_minute: requests_per_minute.unwrap_or(DEFAULT_REQUESTS_PER_MINUTE),
        })
    }
}

/// Builds the collaborators of one command invocation.
pub(crate) trait ServiceFactory {
    fn store(&self, config: &ServiceConfig) -> Result<Box<dyn TripStore>, CliError>;
    fn transit(&self, config: &ServiceConfig) -> Result<Box<dyn TransitProvider>, CliError>;
    fn geocoder(&self, config: &ServiceConfig) -> Result<Box<dyn ReverseGeocoder>, CliError>;
}

/// Opens the SQLite database and connects to the configured HTTP services.
pub(crate) struct DefaultServiceFactory;

impl ServiceFactory for DefaultServiceFactory {
    fn store(&self, config: &ServiceConfig) -> Result<Box<dyn TripStore>, CliError> {
        prepare_database(&config.database)?;
        open_store(&config.database)
    }

    fn transit(&self, config: &ServiceConfig) -> Result<Box<dyn TransitProvider>, CliError> {
        let providers = config
            .transit_urls
            .iter()
            .map(|base_url| {
                RestTransitProvider::new(base_url.as_str())
                    .map(|provider| RateLimitedProvider::new(provider, config.requests_per_minute))
                    .map_err(|source| CliError::BuildTransitProvider {
                        base_url: base_url.clone(),
                        source,
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Box::new(ProviderPool::new(providers)))
    }

    fn geocoder(&self, config: &ServiceConfig) -> Result<Box<dyn ReverseGeocoder>, CliError> {
        let geocoder =
            NominatimGeocoder::with_config(NominatimConfig::new(config.geocoder_url.as_str()))
                .map_err(|source| CliError::BuildGeocoder {
                    base_url: config.geocoder_url.clone(),
                    source,
                })?;
        Ok(Box::new(RateLimitedProvider::new(
            geocoder,
            GEOCODER_REQUESTS_PER_MINUTE,
        )))
    }
}

/// Check the database path and create its parent directory.
///
/// A missing database is fine; SQLite creates it on open.
pub(crate) fn prepare_database(path: &Utf8Path) -> Result<(), CliError> {
    match isochrone_fs::path_kind(path) {
        Ok(PathKind::File | PathKind::Missing) => {}
        Ok(PathKind::Directory | PathKind::Other) => {
            return Err(CliError::DatabaseNotFile {
                path: path.to_path_buf(),
            });
        }
        Err(source) => {
            return Err(CliError::InspectDatabase {
                path: path.to_path_buf(),
                source,
            });
        }
    }
    isochrone_fs::ensure_parent_dir(path).map_err(|source| CliError::CreateDatabaseDir {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(feature = "store-sqlite")]
fn open_store(path: &Utf8Path) -> Result<Box<dyn TripStore>, CliError> {
    let store = isochrone_core::SqliteTripStore::open(path.as_std_path())?;
    Ok(Box::new(store))
}

#[cfg(not(feature = "store-sqlite"))]
fn open_store(_path: &Utf8Path) -> Result<Box<dyn TripStore>, CliError> {
    Err(CliError::MissingFeature {
        feature: "store-sqlite",
        action: "opening the trip database",
    })
}

/// Drive `future` on a fresh multi-threaded runtime.
pub(crate) fn block_on<F: std::future::Future>(future: F) -> Result<F::Output, CliError> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(CliError::Runtime)?;
    Ok(runtime.block_on(future))
}

/// Write `value` as pretty-printed JSON followed by a newline.
pub(crate) fn write_json<T: Serialize>(writer: &mut dyn Write, value: &T) -> Result<(), CliError> {
    let payload = serde_json::to_string_pretty(value).map_err(CliError::SerializeOutput)?;
    writer
        .write_all(payload.as_bytes())
        .map_err(CliError::WriteOutput)?;
    writer.write_all(b"\n").map_err(CliError::WriteOutput)?;
    Ok(())
}
