use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use geo::Coord;

use crate::{Location, Place, Trip};

use super::{StoreError, TripStore, normalise_alias};

/// In-process `TripStore` backed by vectors behind a mutex.
///
/// Lookups scan linearly. Identifiers start at 1 and increase by one per
/// inserted location.
#[derive(Debug, Default)]
pub struct MemoryTripStore {
    inner: Mutex<Tables>,
}

#[derive(Debug, Default)]
struct Tables {
    locations: Vec<Location>,
    aliases: HashMap<String, u64>,
    trips: Vec<Trip>,
    requests: u64,
}

impl MemoryTripStore {
    /// Create a store pre-populated with `locations`.
    ///
    /// Later inserts continue after the largest supplied identifier.
    pub fn with_locations<I>(locations: I) -> Self
    where
        I: IntoIterator<Item = Location>,
    {
        Self {
            inner: Mutex::new(Tables {
                locations: locations.into_iter().collect(),
                ..Tables::default()
            }),
        }
    }

    fn tables(&self) -> Result<MutexGuard<'_, Tables>, StoreError> {
        self.inner.lock().map_err(|_| StoreError::Poisoned)
    }
}

impl Tables {
    fn find(&self, predicate: impl Fn(&Location) -> bool) -> Option<Location> {
        self.locations.iter().find(|l| predicate(l)).cloned()
    }

    fn next_id(&self) -> u64 {
        self.locations.iter().map(|l| l.id).max().unwrap_or(0) + 1
    }
}

impl TripStore for MemoryTripStore {
    fn location(&self, id: u64) -> Result<Option<Location>, StoreError> {
        Ok(self.tables()?.find(|l| l.id == id))
    }

    fn location_by_alias(&self, alias: &str) -> Result<Option<Location>, StoreError> {
        let tables = self.tables()?;
        Ok(tables
            .aliases
            .get(&normalise_alias(alias))
            .and_then(|&id| tables.find(|l| l.id == id)))
    }

    fn location_by_address(&self, address: &str) -> Result<Option<Location>, StoreError> {
        Ok(self.tables()?.find(|l| l.address == address))
    }

    fn location_at(&self, coord: Coord<f64>) -> Result<Option<Location>, StoreError> {
        Ok(self.tables()?.find(|l| l.coord == coord))
    }

    fn insert_location(&self, place: &Place) -> Result<Location, StoreError> {
        let mut tables = self.tables()?;
        let location = Location::new(tables.next_id(), place.address.clone(), place.coord);
        tables.locations.push(location.clone());
        Ok(location)
    }

    fn insert_alias(&self, alias: &str, location_id: u64) -> Result<(), StoreError> {
        let mut tables = self.tables()?;
        if tables.find(|l| l.id == location_id).is_none() {
            return Err(StoreError::UnknownLocation { id: location_id });
        }
        let alias = normalise_alias(alias);
        if tables.aliases.contains_key(&alias) {
            return Err(StoreError::DuplicateAlias { alias });
        }
        tables.aliases.insert(alias, location_id);
        Ok(())
    }

    fn trip(&self, origin_id: u64, destination_id: u64) -> Result<Option<Trip>, StoreError> {
        Ok(self
            .tables()?
            .trips
            .iter()
            .find(|t| t.origin_id == origin_id && t.destination_id == destination_id)
            .copied())
    }

    fn trips_from(&self, origin_id: u64) -> Result<Vec<Trip>, StoreError> {
        Ok(self
            .tables()?
            .trips
            .iter()
            .filter(|t| t.origin_id == origin_id)
            .copied()
            .collect())
    }

    fn insert_trip(&self, trip: Trip) -> Result<(), StoreError> {
        let mut tables = self.tables()?;
        for id in [trip.origin_id, trip.destination_id] {
            if tables.find(|l| l.id == id).is_none() {
                return Err(StoreError::UnknownLocation { id });
            }
        }
        let duplicate = tables
            .trips
            .iter()
            .any(|t| t.origin_id == trip.origin_id && t.destination_id == trip.destination_id);
        if duplicate {
            return Err(StoreError::DuplicateTrip {
                origin_id: trip.origin_id,
                destination_id: trip.destination_id,
            });
        }
        tables.trips.push(trip);
        Ok(())
    }

    fn record_request(&self) -> Result<(), StoreError> {
        self.tables()?.requests += 1;
        Ok(())
    }

    fn request_count(&self) -> Result<u64, StoreError> {
        Ok(self.tables()?.requests)
    }
}
