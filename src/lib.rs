//! Facade crate for the isochrone sampling engine.
//!
//! This crate re-exports the point sources, the sampling session and the trip
//! stores, and exposes the HTTP transit and geocoding adapters behind the
//! `http` feature.

#![forbid(unsafe_code)]

pub use isochrone_core::sampling;
pub use isochrone_core::{
    JourneyOutcome, Location, MemoryTripStore, Place, ReverseGeocoder, Sample, SampleReport,
    SamplerConfig, SamplingSession, SessionError, StopReason, StoreError, TransitError,
    TransitProvider, Trip, TripStore,
};

#[cfg(feature = "store-sqlite")]
pub use isochrone_core::SqliteTripStore;

#[cfg(feature = "http")]
pub use isochrone_data::{
    NominatimConfig, NominatimGeocoder, ProviderBuildError, ProviderPool, RateLimitedProvider,
    RateLimiter, RestTransitConfig, RestTransitProvider,
};
