//! Test helpers providing temporary workspaces and stub services.

use crate::CliError;
use crate::services::{DefaultServiceFactory, ServiceConfig, ServiceFactory};
use camino::Utf8PathBuf;
use geo::Coord;
use isochrone_core::test_support::{StubGeocoder, StubTransitProvider};
use isochrone_core::{Place, ReverseGeocoder, TransitProvider, TripStore};
use tempfile::TempDir;

/// Origin description every stub transit provider can resolve.
pub(super) const ORIGIN: &str = "Depot";

/// Temporary directory holding the trip database of one test.
#[derive(Debug)]
pub(super) struct Workspace {
    _dir: TempDir,
    root: Utf8PathBuf,
}

impl Workspace {
    pub(super) fn new() -> Self {
        let dir = TempDir::new().expect("tempdir");
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf-8 workspace");
        Self { _dir: dir, root }
    }

    pub(super) fn root(&self) -> &Utf8PathBuf {
        &self.root
    }

    /// Database path below a directory that does not exist yet.
    pub(super) fn database(&self) -> Utf8PathBuf {
        self.root.join("state/trips.db")
    }
}

/// Opens the real SQLite store but answers transit and geocoding queries
/// with deterministic stubs.
pub(super) struct StubServiceFactory;

impl ServiceFactory for StubServiceFactory {
    fn store(&self, config: &ServiceConfig) -> Result<Box<dyn TripStore>, CliError> {
        DefaultServiceFactory.store(config)
    }

    fn transit(&self, _config: &ServiceConfig) -> Result<Box<dyn TransitProvider>, CliError> {
        let depot = Place::new("Depot, 1 Yard Road", Coord { x: 4.0, y: 3.0 });
        Ok(Box::new(StubTransitProvider::default().with_place(ORIGIN, depot)))
    }

    fn geocoder(&self, _config: &ServiceConfig) -> Result<Box<dyn ReverseGeocoder>, CliError> {
        Ok(Box::new(StubGeocoder))
    }
}
