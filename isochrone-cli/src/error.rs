//! Error types emitted by the isochrone CLI.

use std::sync::Arc;

use camino::Utf8PathBuf;
use isochrone_core::sampling::RegionError;
use isochrone_core::{SessionError, StoreError};
use isochrone_data::ProviderBuildError;
use thiserror::Error;

/// Errors emitted by the isochrone CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// Provided arguments failed Clap validation.
    #[error(transparent)]
    ArgumentParsing(#[from] clap::Error),
    /// Configuration layering failed (files, env, CLI).
    #[error("failed to load configuration: {0}")]
    Configuration(#[from] Arc<ortho_config::OrthoError>),
    /// A required option is missing after configuration merging.
    #[error("missing {field} (set --{field} or {env})")]
    MissingArgument {
        field: &'static str,
        env: &'static str,
    },
    /// The requested operation requires a missing compile-time feature.
    #[error("{action} requires the `{feature}` feature to be enabled")]
    MissingFeature {
        feature: &'static str,
        action: &'static str,
    },
    /// The sampling region bounds are inconsistent.
    #[error(transparent)]
    InvalidRegion(#[from] RegionError),
    /// No transit service URL remained after configuration merging.
    #[error("at least one --transit-url is required")]
    NoTransitProviders,
    /// The database path names something other than a regular file.
    #[error("database path {path:?} exists but is not a file")]
    DatabaseNotFile { path: Utf8PathBuf },
    /// The database path could not be inspected.
    #[error("failed to inspect database path {path:?}: {source}")]
    InspectDatabase {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The directory holding the database could not be created.
    #[error("failed to create the directory for {path:?}: {source}")]
    CreateDatabaseDir {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// Reading or writing the trip store failed.
    #[error(transparent)]
    Store(#[from] StoreError),
    /// Constructing a transit provider failed.
    #[error("failed to build transit provider for {base_url:?}: {source}")]
    BuildTransitProvider {
        base_url: String,
        #[source]
        source: ProviderBuildError,
    },
    /// Constructing the reverse geocoder failed.
    #[error("failed to build geocoder for {base_url:?}: {source}")]
    BuildGeocoder {
        base_url: String,
        #[source]
        source: ProviderBuildError,
    },
    /// The async runtime could not be started.
    #[error("failed to start the async runtime: {0}")]
    Runtime(#[source] std::io::Error),
    /// Locating the origin or sampling destinations failed.
    #[error(transparent)]
    Session(#[from] SessionError),
    /// Serializing command output failed.
    #[error("failed to serialize output: {0}")]
    SerializeOutput(#[source] serde_json::Error),
    /// Writing command output failed.
    #[error("failed to write output: {0}")]
    WriteOutput(#[source] std::io::Error),
}
