//! Test utilities for transit providers.
//!
//! This module provides [`StubRestProvider`], a deterministic test double
//! for [`TransitProvider`] that returns pre-configured responses without
//! making actual HTTP requests.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use isochrone_core::{JourneyOutcome, Place, TransitError, TransitProvider};

/// Stub `TransitProvider` for testing.
///
/// Every journey returns the configured outcome or error and every place
/// lookup echoes the query at the null island coordinate. Calls are counted
/// so pool and rate limiter tests can tell providers apart.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use futures_util::FutureExt;
/// use geo::Coord;
/// use isochrone_core::{JourneyOutcome, Place, TransitProvider};
/// use isochrone_data::transit::test_support::StubRestProvider;
///
/// let provider = StubRestProvider::with_outcome(JourneyOutcome::Reachable(Duration::from_secs(60)));
/// let here = Place::new("here", Coord { x: 0.0, y: 0.0 });
///
/// let outcome = provider.journey(&here, &here).now_or_never().expect("ready");
/// assert!(outcome.is_ok());
/// assert_eq!(provider.calls(), 1);
/// ```
#[derive(Debug)]
pub struct StubRestProvider {
    response: StubResponse,
    calls: AtomicUsize,
}

#[derive(Debug, Clone)]
enum StubResponse {
    Outcome(JourneyOutcome),
    Error(TransitError),
}

impl StubRestProvider {
    /// Create a provider whose journeys all end in `outcome`.
    #[must_use]
    pub const fn with_outcome(outcome: JourneyOutcome) -> Self {
        Self {
            response: StubResponse::Outcome(outcome),
            calls: AtomicUsize::new(0),
        }
    }

    /// Create a provider whose journeys and lookups all fail with `error`.
    #[must_use]
    pub const fn with_error(error: TransitError) -> Self {
        Self {
            response: StubResponse::Error(error),
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of calls received so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TransitProvider for StubRestProvider {
    async fn find_place(&self, query: &str) -> Result<Place, TransitError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.response {
            StubResponse::Outcome(_) => Ok(Place::new(query, geo::Coord { x: 0.0, y: 0.0 })),
            StubResponse::Error(error) => Err(error.clone()),
        }
    }

    async fn journey(
        &self,
        _origin: &Place,
        _destination: &Place,
    ) -> Result<JourneyOutcome, TransitError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.response {
            StubResponse::Outcome(outcome) => Ok(*outcome),
            StubResponse::Error(error) => Err(error.clone()),
        }
    }
}
