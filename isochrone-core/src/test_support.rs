//! Deterministic transit and geocoding doubles used by unit, behaviour and
//! doc tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use geo::Coord;

use crate::{JourneyOutcome, Place, ReverseGeocoder, TransitError, TransitProvider};

/// `TransitProvider` whose journeys take one minute per unit of planar
/// distance.
///
/// Specific destinations can be marked unreachable or failing, and queries
/// can be mapped to places. Journey calls are counted.
#[derive(Debug)]
pub struct StubTransitProvider {
    minutes_per_unit: f64,
    unreachable: Vec<Coord<f64>>,
    reaches_nothing: bool,
    failing: Vec<Coord<f64>>,
    places: HashMap<String, Place>,
    journeys: AtomicUsize,
}

impl Default for StubTransitProvider {
    fn default() -> Self {
        Self {
            minutes_per_unit: 1.0,
            unreachable: Vec::new(),
            reaches_nothing: false,
            failing: Vec::new(),
            places: HashMap::new(),
            journeys: AtomicUsize::new(0),
        }
    }
}

impl StubTransitProvider {
    /// Scale travel times.
    #[must_use]
    pub fn with_minutes_per_unit(mut self, minutes_per_unit: f64) -> Self {
        self.minutes_per_unit = minutes_per_unit;
        self
    }

    /// Report [`JourneyOutcome::NoConnection`] for journeys ending at `coord`.
    #[must_use]
    pub fn with_unreachable(mut self, coord: Coord<f64>) -> Self {
        self.unreachable.push(coord);
        self
    }

    /// Report [`JourneyOutcome::NoConnection`] for every journey.
    #[must_use]
    pub fn with_nothing_reachable(mut self) -> Self {
        self.reaches_nothing = true;
        self
    }

    /// Fail journeys ending at `coord` with a network error.
    #[must_use]
    pub fn with_failure(mut self, coord: Coord<f64>) -> Self {
        self.failing.push(coord);
        self
    }

    /// Answer `query` with `place`.
    #[must_use]
    pub fn with_place(mut self, query: impl Into<String>, place: Place) -> Self {
        self.places.insert(query.into(), place);
        self
    }

    /// Number of journey calls received.
    pub fn journeys(&self) -> usize {
        self.journeys.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TransitProvider for StubTransitProvider {
    async fn find_place(&self, query: &str) -> Result<Place, TransitError> {
        self.places
            .get(query)
            .cloned()
            .ok_or_else(|| TransitError::NotFound {
                query: query.to_owned(),
            })
    }

    async fn journey(
        &self,
        origin: &Place,
        destination: &Place,
    ) -> Result<JourneyOutcome, TransitError> {
        self.journeys.fetch_add(1, Ordering::SeqCst);
        if self.failing.contains(&destination.coord) {
            return Err(TransitError::NetworkError {
                url: "stub://journeys".to_owned(),
                message: "connection refused".to_owned(),
            });
        }
        if self.reaches_nothing || self.unreachable.contains(&destination.coord) {
            return Ok(JourneyOutcome::NoConnection);
        }
        let distance = (destination.coord.x - origin.coord.x).hypot(destination.coord.y - origin.coord.y);
        let seconds = (distance * self.minutes_per_unit * 60.0).round();
        Ok(JourneyOutcome::Reachable(Duration::from_secs(seconds as u64)))
    }
}

/// `ReverseGeocoder` that formats the coordinate as its address.
#[derive(Debug, Default, Clone, Copy)]
pub struct StubGeocoder;

#[async_trait]
impl ReverseGeocoder for StubGeocoder {
    async fn address_at(&self, coord: Coord<f64>) -> Result<String, TransitError> {
        Ok(format!("{:.6}, {:.6}", coord.x, coord.y))
    }
}

/// Drive a future to completion on a fresh current-thread runtime.
#[cfg(test)]
pub(crate) fn block_on_for_tests<F: std::future::Future>(future: F) -> F::Output {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("failed to build Tokio runtime")
        .block_on(future)
}
