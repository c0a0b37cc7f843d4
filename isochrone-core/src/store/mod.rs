//! Persistence for locations, trips and request counts.
//!
//! The `TripStore` trait is the read/write interface used by a sampling
//! session. [`MemoryTripStore`] keeps everything in process; with the
//! `store-sqlite` feature [`SqliteTripStore`] persists to a SQLite file.

use geo::Coord;

use crate::{Location, Place, Trip};

mod error;
mod memory;
#[cfg(feature = "store-sqlite")]
mod sqlite;

pub use error::StoreError;
pub use memory::MemoryTripStore;
#[cfg(feature = "store-sqlite")]
pub use sqlite::SqliteTripStore;

/// Stored locations, aliases, trips and request counts.
///
/// Aliases are free-text descriptions a user typed for a location. They are
/// compared case-insensitively; implementations lower-case them before both
/// insertion and lookup. Locations are matched by coordinate exactly.
///
/// # Examples
///
/// ```rust
/// use std::time::Duration;
/// use geo::Coord;
/// use isochrone_core::{MemoryTripStore, Place, Trip, TripStore};
///
/// # fn main() -> Result<(), isochrone_core::StoreError> {
/// let store = MemoryTripStore::default();
/// let origin = store.insert_location(&Place::new("Home", Coord { x: 0.0, y: 0.0 }))?;
/// let work = store.insert_location(&Place::new("Work", Coord { x: 1.0, y: 1.0 }))?;
/// store.insert_trip(Trip::reachable(origin.id, work.id, Duration::from_secs(900)))?;
///
/// assert_eq!(store.known_destinations(origin.id)?, vec![Coord { x: 1.0, y: 1.0 }]);
/// # Ok(())
/// # }
/// ```
pub trait TripStore: Send + Sync {
    /// Look up a location by identifier.
    fn location(&self, id: u64) -> Result<Option<Location>, StoreError>;

    /// Look up the location an alias points to.
    fn location_by_alias(&self, alias: &str) -> Result<Option<Location>, StoreError>;

    /// Look up a location by its exact address.
    fn location_by_address(&self, address: &str) -> Result<Option<Location>, StoreError>;

    /// Look up a location stored at exactly `coord`.
    fn location_at(&self, coord: Coord<f64>) -> Result<Option<Location>, StoreError>;

    /// Store a new location and return it with its assigned identifier.
    fn insert_location(&self, place: &Place) -> Result<Location, StoreError>;

    /// Point `alias` at an existing location.
    ///
    /// Returns [`StoreError::UnknownLocation`] when `location_id` is not
    /// stored and [`StoreError::DuplicateAlias`] when the alias is taken.
    fn insert_alias(&self, alias: &str, location_id: u64) -> Result<(), StoreError>;

    /// Look up the trip between two locations.
    fn trip(&self, origin_id: u64, destination_id: u64) -> Result<Option<Trip>, StoreError>;

    /// Every trip starting at `origin_id`, in insertion order.
    fn trips_from(&self, origin_id: u64) -> Result<Vec<Trip>, StoreError>;

    /// Store a trip.
    ///
    /// Returns [`StoreError::DuplicateTrip`] when the pair already has one.
    fn insert_trip(&self, trip: Trip) -> Result<(), StoreError>;

    /// Count one request sent to an external service.
    fn record_request(&self) -> Result<(), StoreError>;

    /// Total number of requests recorded so far.
    fn request_count(&self) -> Result<u64, StoreError>;

    /// Coordinates of every destination probed from `origin_id`.
    ///
    /// Destinations without a connection are included; they still describe
    /// where the origin has been sampled.
    fn known_destinations(&self, origin_id: u64) -> Result<Vec<Coord<f64>>, StoreError> {
        let mut coords = Vec::new();
        for trip in self.trips_from(origin_id)? {
            let destination = self
                .location(trip.destination_id)?
                .ok_or(StoreError::UnknownLocation {
                    id: trip.destination_id,
                })?;
            coords.push(destination.coord);
        }
        Ok(coords)
    }
}

/// Normalise an alias for storage and lookup.
pub(crate) fn normalise_alias(alias: &str) -> String {
    alias.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn store() -> MemoryTripStore {
        MemoryTripStore::default()
    }

    fn place(address: &str, x: f64, y: f64) -> Place {
        Place::new(address, Coord { x, y })
    }

    #[rstest]
    fn known_destinations_include_unreachable_trips(store: MemoryTripStore) {
        let origin = store.insert_location(&place("Home", 0.0, 0.0)).expect("insert");
        let near = store.insert_location(&place("Near", 1.0, 0.0)).expect("insert");
        let far = store.insert_location(&place("Far", 9.0, 9.0)).expect("insert");
        store
            .insert_trip(Trip::reachable(origin.id, near.id, Duration::from_secs(60)))
            .expect("insert trip");
        store
            .insert_trip(Trip::unreachable(origin.id, far.id))
            .expect("insert trip");

        let known = store.known_destinations(origin.id).expect("destinations");
        assert_eq!(known, vec![near.coord, far.coord]);
    }

    #[rstest]
    fn known_destinations_are_scoped_to_origin(store: MemoryTripStore) {
        let origin = store.insert_location(&place("Home", 0.0, 0.0)).expect("insert");
        let other = store.insert_location(&place("Other", 2.0, 0.0)).expect("insert");
        store
            .insert_trip(Trip::reachable(other.id, origin.id, Duration::from_secs(60)))
            .expect("insert trip");

        assert!(store.known_destinations(origin.id).expect("destinations").is_empty());
    }

    #[rstest]
    #[case("Alexanderplatz", "alexanderplatz")]
    #[case("  Kotti ", "kotti")]
    fn aliases_are_normalised(#[case] raw: &str, #[case] expected: &str) {
        assert_eq!(normalise_alias(raw), expected);
    }
}
