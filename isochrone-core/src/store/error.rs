#[cfg(feature = "store-sqlite")]
use std::path::PathBuf;

use thiserror::Error;

/// Errors raised by [`crate::store::TripStore`] implementations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A referenced location does not exist.
    #[error("location {id} is not stored")]
    UnknownLocation {
        /// Identifier of the missing location.
        id: u64,
    },
    /// The alias already points at a location.
    #[error("alias {alias:?} is already in use")]
    DuplicateAlias {
        /// The normalised alias.
        alias: String,
    },
    /// A trip between the two locations is already stored.
    #[error("a trip from {origin_id} to {destination_id} is already stored")]
    DuplicateTrip {
        /// Identifier of the origin location.
        origin_id: u64,
        /// Identifier of the destination location.
        destination_id: u64,
    },
    /// The store's lock was poisoned by a panicking writer.
    #[error("trip store lock poisoned")]
    Poisoned,
    /// Opening the SQLite database failed.
    #[cfg(feature = "store-sqlite")]
    #[error("failed to open SQLite database at {path}: {source}")]
    OpenDatabase {
        /// Location of the SQLite database on disk.
        path: PathBuf,
        /// Source error returned by `rusqlite`.
        #[source]
        source: rusqlite::Error,
    },
    /// Generic SQLite error when reading or writing rows.
    #[cfg(feature = "store-sqlite")]
    #[error(transparent)]
    Database(#[from] rusqlite::Error),
}
