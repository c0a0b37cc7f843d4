//! Transit providers for `transport.rest` HAFAS REST services.
//!
//! [`RestTransitProvider`] implements [`isochrone_core::TransitProvider`]
//! over HTTP. Journeys depart at a fixed time so that samples collected on
//! different days stay comparable; by default that is [`next_departure`].
//!
//! # Example
//!
//! ```no_run
//! use std::time::Duration;
//! use isochrone_core::TransitProvider;
//! use isochrone_data::{RestTransitConfig, RestTransitProvider};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let config = RestTransitConfig::new("https://v6.bvg.transport.rest")
//!     .with_timeout(Duration::from_secs(10))
//!     .with_user_agent("my-app/1.0");
//! let provider = RestTransitProvider::with_config(config)?;
//!
//! let alex = provider.find_place("Alexanderplatz").await?;
//! let zoo = provider.find_place("Zoologischer Garten").await?;
//! let outcome = provider.journey(&alex, &zoo).await?;
//! println!("{:?}", outcome.duration());
//! # Ok(())
//! # }
//! ```

mod departure;
mod hafas;
mod provider;

#[doc(hidden)]
pub mod test_support;

pub use departure::next_departure;
pub use provider::{DEFAULT_USER_AGENT, RestTransitConfig, RestTransitProvider};
