//! Query travel times and addresses from external services.
//!
//! [`TransitProvider`] resolves free-text queries to [`Place`](crate::Place)
//! values and computes journeys between them. [`ReverseGeocoder`] turns a
//! probe coordinate into a human readable address. Both traits are async and
//! object safe so a sampling session can hold them as trait objects.
//!
//! Concrete HTTP implementations live in `isochrone-data`.

mod error;
mod provider;

pub use error::TransitError;
pub use provider::{JourneyOutcome, ReverseGeocoder, TransitProvider};
