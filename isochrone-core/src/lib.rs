//! Core domain types and sampling logic for the isochrone engine.
//!
//! The crate decides which destination coordinates to probe from an origin
//! so that a small budget of transit queries describes the travel-time field
//! well. [`sampling`] holds the point sources and the policy choosing between
//! them, [`session`] drives a source against a [`TransitProvider`] and
//! persists results through a [`TripStore`].
//!
//! Constructors return `Result` to surface invalid input early. Nothing in
//! this crate performs network I/O; concrete providers live in
//! `isochrone-data`.

mod location;
mod trip;

pub mod sampling;
pub mod session;
pub mod store;
pub mod test_support;
pub mod transit;

pub use location::{Location, Place};
pub use session::{Sample, SampleReport, SamplerConfig, SamplingSession, SessionError, StopReason};
#[cfg(feature = "store-sqlite")]
pub use store::SqliteTripStore;
pub use store::{MemoryTripStore, StoreError, TripStore};
pub use transit::{JourneyOutcome, ReverseGeocoder, TransitError, TransitProvider};
pub use trip::Trip;
