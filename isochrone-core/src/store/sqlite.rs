//! SQLite-backed trip store.

use std::{
    fmt,
    path::Path,
    sync::{Mutex, MutexGuard},
};

use geo::Coord;
use rusqlite::{Connection, OptionalExtension, Row, params};

use crate::{Location, Place, Trip};

use super::{StoreError, TripStore, normalise_alias};

const SCHEMA: &str = "
    PRAGMA foreign_keys = ON;
    CREATE TABLE IF NOT EXISTS locations (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        address TEXT NOT NULL,
        lon REAL NOT NULL,
        lat REAL NOT NULL
    );
    CREATE INDEX IF NOT EXISTS locations_address ON locations (address);
    CREATE INDEX IF NOT EXISTS locations_coord ON locations (lon, lat);
    CREATE TABLE IF NOT EXISTS location_aliases (
        alias TEXT PRIMARY KEY,
        location_id INTEGER NOT NULL REFERENCES locations (id)
    );
    CREATE TABLE IF NOT EXISTS trips (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        origin_id INTEGER NOT NULL REFERENCES locations (id),
        destination_id INTEGER NOT NULL REFERENCES locations (id),
        duration_secs INTEGER,
        UNIQUE (origin_id, destination_id)
    );
    CREATE TABLE IF NOT EXISTS requests (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        requested_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
    );
";

const LOCATION_COLUMNS: &str = "SELECT id, address, lon, lat FROM locations";

/// `TripStore` persisting to a SQLite database.
///
/// The schema is created on open when missing. A single connection is shared
/// behind a mutex, so concurrent callers are serialised.
pub struct SqliteTripStore {
    connection: Mutex<Connection>,
}

impl fmt::Debug for SqliteTripStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SqliteTripStore").finish_non_exhaustive()
    }
}

impl SqliteTripStore {
    /// Open or create a store at `path`.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let path = path.as_ref();
        let connection = Connection::open(path).map_err(|source| StoreError::OpenDatabase {
            path: path.to_path_buf(),
            source,
        })?;
        Self::with_connection(connection)
    }

    /// Create a store that lives only as long as the value.
    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(connection: Connection) -> Result<Self, StoreError> {
        connection.execute_batch(SCHEMA)?;
        Ok(Self {
            connection: Mutex::new(connection),
        })
    }

    fn connection(&self) -> Result<MutexGuard<'_, Connection>, StoreError> {
        self.connection.lock().map_err(|_| StoreError::Poisoned)
    }

    fn query_location<P: rusqlite::Params>(
        &self,
        filter: &str,
        params: P,
    ) -> Result<Option<Location>, StoreError> {
        let connection = self.connection()?;
        let query = format!("{LOCATION_COLUMNS} WHERE {filter} ORDER BY id LIMIT 1");
        Ok(connection
            .query_row(&query, params, location_from_row)
            .optional()?)
    }
}

fn location_from_row(row: &Row<'_>) -> rusqlite::Result<Location> {
    Ok(Location {
        id: row.get(0)?,
        address: row.get(1)?,
        coord: Coord {
            x: row.get(2)?,
            y: row.get(3)?,
        },
    })
}

fn trip_from_row(row: &Row<'_>) -> rusqlite::Result<Trip> {
    let duration_secs: Option<u64> = row.get(2)?;
    Ok(Trip {
        origin_id: row.get(0)?,
        destination_id: row.get(1)?,
        duration: duration_secs.map(std::time::Duration::from_secs),
    })
}

fn location_exists(connection: &Connection, id: u64) -> Result<bool, StoreError> {
    Ok(connection
        .query_row("SELECT 1 FROM locations WHERE id = ?1", [id], |_| Ok(()))
        .optional()?
        .is_some())
}

impl TripStore for SqliteTripStore {
    fn location(&self, id: u64) -> Result<Option<Location>, StoreError> {
        self.query_location("id = ?1", [id])
    }

    fn location_by_alias(&self, alias: &str) -> Result<Option<Location>, StoreError> {
        self.query_location(
            "id = (SELECT location_id FROM location_aliases WHERE alias = ?1)",
            [normalise_alias(alias)],
        )
    }

    fn location_by_address(&self, address: &str) -> Result<Option<Location>, StoreError> {
        self.query_location("address = ?1", [address])
    }

    fn location_at(&self, coord: Coord<f64>) -> Result<Option<Location>, StoreError> {
        self.query_location("lon = ?1 AND lat = ?2", [coord.x, coord.y])
    }

    fn insert_location(&self, place: &Place) -> Result<Location, StoreError> {
        let connection = self.connection()?;
        let id: u64 = connection.query_row(
            "INSERT INTO locations (address, lon, lat) VALUES (?1, ?2, ?3) RETURNING id",
            params![place.address, place.coord.x, place.coord.y],
            |row| row.get(0),
        )?;
        Ok(Location::new(id, place.address.clone(), place.coord))
    }

    fn insert_alias(&self, alias: &str, location_id: u64) -> Result<(), StoreError> {
        let connection = self.connection()?;
        if !location_exists(&connection, location_id)? {
            return Err(StoreError::UnknownLocation { id: location_id });
        }
        let alias = normalise_alias(alias);
        let inserted = connection.execute(
            "INSERT OR IGNORE INTO location_aliases (alias, location_id) VALUES (?1, ?2)",
            params![alias, location_id],
        )?;
        if inserted == 0 {
            return Err(StoreError::DuplicateAlias { alias });
        }
        Ok(())
    }

    fn trip(&self, origin_id: u64, destination_id: u64) -> Result<Option<Trip>, StoreError> {
        let connection = self.connection()?;
        Ok(connection
            .query_row(
                "SELECT origin_id, destination_id, duration_secs FROM trips \
                 WHERE origin_id = ?1 AND destination_id = ?2",
                [origin_id, destination_id],
                trip_from_row,
            )
            .optional()?)
    }

    fn trips_from(&self, origin_id: u64) -> Result<Vec<Trip>, StoreError> {
        let connection = self.connection()?;
        let mut statement = connection.prepare(
            "SELECT origin_id, destination_id, duration_secs FROM trips \
             WHERE origin_id = ?1 ORDER BY id",
        )?;
        let trips = statement
            .query_map([origin_id], trip_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(trips)
    }

    fn insert_trip(&self, trip: Trip) -> Result<(), StoreError> {
        let connection = self.connection()?;
        for id in [trip.origin_id, trip.destination_id] {
            if !location_exists(&connection, id)? {
                return Err(StoreError::UnknownLocation { id });
            }
        }
        let inserted = connection.execute(
            "INSERT OR IGNORE INTO trips (origin_id, destination_id, duration_secs) \
             VALUES (?1, ?2, ?3)",
            params![
                trip.origin_id,
                trip.destination_id,
                trip.duration.map(|d| d.as_secs())
            ],
        )?;
        if inserted == 0 {
            return Err(StoreError::DuplicateTrip {
                origin_id: trip.origin_id,
                destination_id: trip.destination_id,
            });
        }
        Ok(())
    }

    fn record_request(&self) -> Result<(), StoreError> {
        self.connection()?
            .execute("INSERT INTO requests DEFAULT VALUES", [])?;
        Ok(())
    }

    fn request_count(&self) -> Result<u64, StoreError> {
        let count: u64 = self
            .connection()?
            .query_row("SELECT COUNT(*) FROM requests", [], |row| row.get(0))?;
        Ok(count)
    }
}
