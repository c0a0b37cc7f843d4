//! HTTP adapters for the isochrone engine.
//!
//! Responsibilities:
//! - Implement `isochrone_core::TransitProvider` against `transport.rest`
//!   style HAFAS REST services.
//! - Implement `isochrone_core::ReverseGeocoder` against Nominatim.
//! - Keep every provider within its per-minute request budget and spread
//!   load across several providers.
//!
//! Boundaries:
//! - Do not encode sampling rules (live in `isochrone-core`).
//! - Keep blocking I/O off async executors; every client here is async.
//!
//! Invariants:
//! - Thread-safe by default; providers are `Send + Sync`.
//! - No global mutable state.

mod error;
pub mod geocode;
pub mod pool;
pub mod rate_limit;
pub mod transit;

pub use error::ProviderBuildError;
pub use geocode::{NominatimConfig, NominatimGeocoder};
pub use pool::ProviderPool;
pub use rate_limit::{DEFAULT_REQUESTS_PER_MINUTE, RateLimitedProvider, RateLimiter};
pub use transit::{DEFAULT_USER_AGENT, RestTransitConfig, RestTransitProvider, next_departure};
