//! Drive a point source against the transit provider for one origin.
//!
//! A [`SamplingSession`] picks a point source from the destinations already
//! known for an origin, draws points in batches, resolves every point of a
//! batch concurrently and only then writes the results to the store. It stops
//! once enough usable samples were collected, the source cannot produce more
//! points or the probe budget is spent.

mod error;
mod report;

pub use error::SessionError;
pub use report::{Sample, SampleReport, StopReason};

use futures_util::future::join_all;
use geo::Coord;
use log::{debug, info, warn};

use crate::sampling::{
    BoundingRegion, PointSource, PointSourceError, max_nearest_neighbour_distance,
    select_point_source,
};
use crate::store::{StoreError, TripStore};
use crate::transit::{ReverseGeocoder, TransitError, TransitProvider};
use crate::{Location, Place, Trip};

/// Default number of lattice points per axis.
pub const DEFAULT_POINTS_PER_AXIS: u32 = 3;

/// Default number of points resolved concurrently.
pub const DEFAULT_BATCH_SIZE: usize = 5;

/// Probes allowed per requested sample when no explicit budget is set.
pub const DEFAULT_PROBES_PER_SAMPLE: usize = 10;

/// Tunables for a [`SamplingSession`].
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SamplerConfig {
    /// Region covered by the grid source.
    pub region: BoundingRegion,
    /// Lattice density; its square is the coverage threshold.
    pub points_per_axis: u32,
    /// Maximum number of points resolved concurrently.
    pub batch_size: usize,
    /// Probes sent to the services per session, usable or not. `None` allows
    /// [`DEFAULT_PROBES_PER_SAMPLE`] per requested sample.
    #[cfg_attr(feature = "serde", serde(default))]
    pub max_probes: Option<usize>,
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            region: BoundingRegion::BERLIN,
            points_per_axis: DEFAULT_POINTS_PER_AXIS,
            batch_size: DEFAULT_BATCH_SIZE,
            max_probes: None,
        }
    }
}

impl SamplerConfig {
    /// Set the grid region.
    #[must_use]
    pub fn with_region(mut self, region: BoundingRegion) -> Self {
        self.region = region;
        self
    }

    /// Set the lattice density.
    #[must_use]
    pub fn with_points_per_axis(mut self, points_per_axis: u32) -> Self {
        self.points_per_axis = points_per_axis;
        self
    }

    /// Set the batch size. Zero is treated as one.
    #[must_use]
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    /// Cap the probes of every session.
    #[must_use]
    pub fn with_max_probes(mut self, max_probes: usize) -> Self {
        self.max_probes = Some(max_probes);
        self
    }

    /// Probes a session collecting `count` samples may send.
    #[must_use]
    pub fn probe_budget(&self, count: usize) -> usize {
        self.max_probes
            .unwrap_or_else(|| count.saturating_mul(DEFAULT_PROBES_PER_SAMPLE))
    }
}

/// A destination resolved against the services but not yet stored.
enum Resolved {
    /// The probe point was already stored as a location.
    Stored(Location, Option<std::time::Duration>),
    /// The probe point needs a new location.
    New(Place, Option<std::time::Duration>),
}

enum ProbeError {
    Transit(TransitError),
    Store(StoreError),
}

impl From<StoreError> for ProbeError {
    fn from(err: StoreError) -> Self {
        Self::Store(err)
    }
}

impl From<TransitError> for ProbeError {
    fn from(err: TransitError) -> Self {
        Self::Transit(err)
    }
}

/// Collects travel-time samples for origins.
///
/// The session borrows its collaborators; it holds no state between calls to
/// [`SamplingSession::sample`].
///
/// # Examples
///
/// ```
/// use isochrone_core::sampling::BoundingRegion;
/// use isochrone_core::test_support::{StubGeocoder, StubTransitProvider};
/// use isochrone_core::{MemoryTripStore, Place, SamplerConfig, SamplingSession, TripStore};
/// use geo::Coord;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let store = MemoryTripStore::default();
/// let transit = StubTransitProvider::default();
/// let config = SamplerConfig::default().with_region(BoundingRegion::new(0.0, 1.0, 0.0, 1.0)?);
/// let session = SamplingSession::new(&store, &transit, &StubGeocoder, config);
///
/// let origin = store.insert_location(&Place::new("origin", Coord { x: 0.5, y: 0.5 }))?;
/// let runtime = tokio::runtime::Builder::new_current_thread().build()?;
/// let report = runtime.block_on(session.sample(&origin, 4))?;
/// assert_eq!(report.accepted, 4);
/// # Ok(())
/// # }
/// ```
pub struct SamplingSession<'a> {
    store: &'a dyn TripStore,
    transit: &'a dyn TransitProvider,
    geocoder: &'a dyn ReverseGeocoder,
    config: SamplerConfig,
}

impl<'a> SamplingSession<'a> {
    /// Create a session over the given collaborators.
    pub fn new(
        store: &'a dyn TripStore,
        transit: &'a dyn TransitProvider,
        geocoder: &'a dyn ReverseGeocoder,
        config: SamplerConfig,
    ) -> Self {
        Self {
            store,
            transit,
            geocoder,
            config,
        }
    }

    /// The session configuration.
    #[must_use]
    pub fn config(&self) -> &SamplerConfig {
        &self.config
    }

    /// Resolve a free-text description to a stored location.
    ///
    /// Known aliases are answered from the store. Otherwise the transit
    /// provider is queried, a location with the same address is reused or
    /// created, and the description is remembered as an alias.
    pub async fn locate(&self, description: &str) -> Result<Location, SessionError> {
        if let Some(location) = self.store.location_by_alias(description)? {
            debug!("alias {description:?} resolves to location {}", location.id);
            return Ok(location);
        }

        self.store.record_request()?;
        let place = self.transit.find_place(description).await?;
        let location = match self.store.location_by_address(&place.address)? {
            Some(location) => location,
            None => {
                info!("storing new location {:?}", place.address);
                self.store.insert_location(&place)?
            }
        };
        self.store.insert_alias(description, location.id)?;
        Ok(location)
    }

    /// Probe up to `count` usable destinations from `origin`.
    ///
    /// Destinations already sampled for this origin are skipped without a
    /// request. Unreachable destinations are stored but do not count towards
    /// `count`. Every probe that reaches the services, including failed ones,
    /// is charged against [`SamplerConfig::probe_budget`].
    pub async fn sample(
        &self,
        origin: &Location,
        count: usize,
    ) -> Result<SampleReport, SessionError> {
        let known = self.store.known_destinations(origin.id)?;
        let mut source = select_point_source(
            &known,
            self.config.region,
            self.config.points_per_axis,
        )?;
        info!(
            "sampling {count} destinations from {:?} with the {} source ({} known)",
            origin.address,
            source.kind(),
            known.len()
        );

        let origin_place = origin.place();
        let batch_size = self.config.batch_size.max(1);
        let budget = self.config.probe_budget(count);
        let mut samples = Vec::new();
        let mut accepted = 0;
        let mut spent = 0;

        let stop = loop {
            if accepted >= count {
                break StopReason::QuotaReached;
            }
            if spent >= budget {
                break StopReason::ProbeBudgetExhausted;
            }
            let wanted = (count - accepted).min(batch_size).min(budget - spent);
            let (batch, halted) = draw_batch(&mut source, wanted);
            debug!("resolving a batch of {} points", batch.len());

            let resolved = join_all(
                batch
                    .iter()
                    .map(|&coord| self.probe(origin.id, &origin_place, coord)),
            )
            .await;

            let mut failures = 0;
            for (coord, outcome) in batch.iter().zip(resolved) {
                let resolved = match outcome {
                    Ok(Some(resolved)) => resolved,
                    Ok(None) => continue,
                    Err(ProbeError::Transit(err)) => {
                        warn!("skipping probe point ({}, {}): {err}", coord.x, coord.y);
                        failures += 1;
                        spent += 1;
                        continue;
                    }
                    Err(ProbeError::Store(err)) => return Err(err.into()),
                };
                spent += 1;
                let sample = self.merge(origin.id, resolved)?;
                if sample.is_usable() {
                    accepted += 1;
                }
                samples.push(sample);
            }

            if let Some(reason) = halted {
                break reason;
            }
            if !batch.is_empty() && failures == batch.len() {
                break StopReason::TransitUnavailable;
            }
        };

        let coverage = max_nearest_neighbour_distance(&self.store.known_destinations(origin.id)?);
        info!(
            "sampling from {:?} stopped ({stop:?}) after {} probes, {accepted} usable",
            origin.address,
            samples.len()
        );
        Ok(SampleReport {
            source: source.kind(),
            probed: samples.len(),
            samples,
            accepted,
            stop,
            coverage,
        })
    }

    /// Resolve one probe point.
    ///
    /// `None` means the point is the origin itself or was already sampled.
    async fn probe(
        &self,
        origin_id: u64,
        origin: &Place,
        coord: Coord<f64>,
    ) -> Result<Option<Resolved>, ProbeError> {
        let stored = self.store.location_at(coord)?;
        if let Some(location) = &stored {
            if location.id == origin_id || self.store.trip(origin_id, location.id)?.is_some() {
                return Ok(None);
            }
        }

        let place = match &stored {
            Some(location) => location.place(),
            None => {
                self.store.record_request()?;
                let address = self.geocoder.address_at(coord).await?;
                Place::new(address, coord)
            }
        };

        self.store.record_request()?;
        let duration = self.transit.journey(origin, &place).await?.duration();
        Ok(Some(match stored {
            Some(location) => Resolved::Stored(location, duration),
            None => Resolved::New(place, duration),
        }))
    }

    fn merge(&self, origin_id: u64, resolved: Resolved) -> Result<Sample, StoreError> {
        let (destination, duration) = match resolved {
            Resolved::Stored(location, duration) => (location, duration),
            Resolved::New(place, duration) => (self.store.insert_location(&place)?, duration),
        };
        self.store.insert_trip(Trip {
            origin_id,
            destination_id: destination.id,
            duration,
        })?;
        Ok(Sample {
            destination,
            duration,
        })
    }
}

/// Draw up to `wanted` points, reporting why the source stopped early.
fn draw_batch(
    source: &mut impl PointSource,
    wanted: usize,
) -> (Vec<Coord<f64>>, Option<StopReason>) {
    let mut batch = Vec::with_capacity(wanted);
    while batch.len() < wanted {
        match source.next_point() {
            Ok(point) => batch.push(point),
            Err(PointSourceError::ExhaustedSource) => {
                return (batch, Some(StopReason::SourceExhausted));
            }
            Err(PointSourceError::DegenerateGeometry) => {
                return (batch, Some(StopReason::DegenerateGeometry));
            }
        }
    }
    (batch, None)
}
