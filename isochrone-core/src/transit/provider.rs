//! Transit and geocoding collaborator traits.

use std::time::Duration;

use async_trait::async_trait;
use geo::Coord;

use crate::Place;

use super::error::TransitError;

/// Result of a journey query that reached the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JourneyOutcome {
    /// A connection exists and takes this long from the departure time.
    Reachable(Duration),
    /// The service found no connection between the endpoints.
    NoConnection,
    /// One endpoint is too far from any station.
    NoStationNearby,
}

impl JourneyOutcome {
    /// Travel time of a reachable journey.
    #[must_use]
    pub const fn duration(self) -> Option<Duration> {
        match self {
            Self::Reachable(duration) => Some(duration),
            Self::NoConnection | Self::NoStationNearby => None,
        }
    }
}

/// Resolve places and journeys through a transit-routing service.
///
/// Implementations own their departure time, timeouts and rate limits.
///
/// # Examples
///
/// ```rust
/// use std::time::Duration;
/// use async_trait::async_trait;
/// use futures_util::FutureExt;
/// use geo::Coord;
/// use isochrone_core::{JourneyOutcome, Place, TransitError, TransitProvider};
///
/// struct Walking;
///
/// #[async_trait]
/// impl TransitProvider for Walking {
///     async fn find_place(&self, query: &str) -> Result<Place, TransitError> {
///         Err(TransitError::NotFound { query: query.to_owned() })
///     }
///
///     async fn journey(
///         &self,
///         _origin: &Place,
///         _destination: &Place,
///     ) -> Result<JourneyOutcome, TransitError> {
///         Ok(JourneyOutcome::Reachable(Duration::from_secs(600)))
///     }
/// }
///
/// let here = Place::new("here", Coord { x: 0.0, y: 0.0 });
/// let outcome = Walking.journey(&here, &here).now_or_never().expect("ready");
/// assert_eq!(outcome?.duration(), Some(Duration::from_secs(600)));
/// # Ok::<(), TransitError>(())
/// ```
#[async_trait]
pub trait TransitProvider: Send + Sync {
    /// Resolve a free-text description to the best matching place.
    ///
    /// Returns [`TransitError::NotFound`] when nothing matches.
    async fn find_place(&self, query: &str) -> Result<Place, TransitError>;

    /// Compute the travel time from `origin` to `destination`.
    ///
    /// "No connection" answers are outcomes, not errors.
    async fn journey(
        &self,
        origin: &Place,
        destination: &Place,
    ) -> Result<JourneyOutcome, TransitError>;
}

/// Look up a human readable address for a coordinate.
#[async_trait]
pub trait ReverseGeocoder: Send + Sync {
    /// Return the address closest to `coord`.
    async fn address_at(&self, coord: Coord<f64>) -> Result<String, TransitError>;
}
