//! `TransitProvider` for `transport.rest` HAFAS REST services.
//!
//! The provider issues two kinds of requests:
//!
//! - `GET {base}/locations` resolves free-text queries to addresses;
//! - `GET {base}/journeys` plans one journey between two places at the
//!   configured departure time.
//!
//! Journey durations are the arrival of the last leg minus the requested
//! departure, truncated to whole minutes.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, Utc};
use chrono_tz::Tz;
use isochrone_core::{JourneyOutcome, Place, TransitError, TransitProvider};
use log::debug;
use reqwest::Client;
use url::Url;

use super::departure::next_departure;
use super::hafas::{parse_journey, parse_place};
use crate::error::{ProviderBuildError, convert_reqwest_error, endpoint, parse_base_url};

/// Default user agent for transit and geocoding requests.
pub const DEFAULT_USER_AGENT: &str = "isochrone-engine/0.1";

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Configuration for [`RestTransitProvider`].
#[derive(Debug, Clone)]
pub struct RestTransitConfig {
    /// Base URL of the service (e.g., `"https://v6.bvg.transport.rest"`).
    pub base_url: String,
    /// Request timeout duration.
    pub timeout: Duration,
    /// User agent string for requests.
    pub user_agent: String,
    /// Departure time for journeys. `None` means noon next Monday in
    /// [`RestTransitConfig::time_zone`].
    pub departure: Option<DateTime<FixedOffset>>,
    /// Zone the default departure is computed in, independent of the host.
    pub time_zone: Tz,
}

impl Default for RestTransitConfig {
    fn default() -> Self {
        Self {
            base_url: "https://v6.bvg.transport.rest".to_owned(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_owned(),
            departure: None,
            time_zone: chrono_tz::Europe::Berlin,
        }
    }
}

impl RestTransitConfig {
    /// Create a new configuration with the given base URL.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    /// Set the request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the user agent string.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Fix the departure time of every journey.
    #[must_use]
    pub fn with_departure(mut self, departure: DateTime<FixedOffset>) -> Self {
        self.departure = Some(departure);
        self
    }

    /// Compute the default departure in `time_zone`.
    #[must_use]
    pub fn with_time_zone(mut self, time_zone: Tz) -> Self {
        self.time_zone = time_zone;
        self
    }
}

/// HTTP transit provider for HAFAS REST endpoints.
#[derive(Debug)]
pub struct RestTransitProvider {
    client: Client,
    base_url: Url,
    config: RestTransitConfig,
    departure: DateTime<FixedOffset>,
}

impl RestTransitProvider {
    /// Create a new provider with default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid or the HTTP client fails to
    /// build.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ProviderBuildError> {
        Self::with_config(RestTransitConfig::new(base_url))
    }

    /// Create a new provider with explicit configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid, the HTTP client fails to build
    /// or no default departure can be derived from the clock.
    pub fn with_config(config: RestTransitConfig) -> Result<Self, ProviderBuildError> {
        let base_url = parse_base_url(&config.base_url)?;
        let departure = match config.departure {
            Some(departure) => departure,
            None => next_departure(&Utc::now().with_timezone(&config.time_zone))
                .map_err(ProviderBuildError::Departure)?
                .fixed_offset(),
        };
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .connect_timeout(config.timeout)
            .timeout(config.timeout)
            .build()
            .map_err(ProviderBuildError::HttpClient)?;
        Ok(Self {
            client,
            base_url,
            config,
            departure,
        })
    }

    /// Departure time used for every journey.
    #[must_use]
    pub const fn departure(&self) -> DateTime<FixedOffset> {
        self.departure
    }

    /// Base URL requests are sent to.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    fn locations_url(&self, query: &str) -> Result<Url, TransitError> {
        endpoint(
            &self.base_url,
            "locations",
            &[
                ("query", query.to_owned()),
                ("results", "1".to_owned()),
                ("addresses", "true".to_owned()),
                ("stops", "false".to_owned()),
                ("poi", "false".to_owned()),
            ],
        )
    }

    fn journeys_url(&self, origin: &Place, destination: &Place) -> Result<Url, TransitError> {
        endpoint(
            &self.base_url,
            "journeys",
            &[
                ("from.address", origin.address.clone()),
                ("from.latitude", origin.coord.y.to_string()),
                ("from.longitude", origin.coord.x.to_string()),
                ("to.address", destination.address.clone()),
                ("to.latitude", destination.coord.y.to_string()),
                ("to.longitude", destination.coord.x.to_string()),
                ("departure", self.departure.to_rfc3339()),
                ("results", "1".to_owned()),
                ("stopovers", "false".to_owned()),
            ],
        )
    }

    /// Send a GET request and return the status code and body.
    async fn fetch(&self, url: &Url) -> Result<(u16, String), TransitError> {
        debug!("GET {url}");
        let timeout_secs = self.config.timeout.as_secs();
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|err| convert_reqwest_error(&err, url.as_str(), timeout_secs))?;
        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|err| convert_reqwest_error(&err, url.as_str(), timeout_secs))?;
        Ok((status, body))
    }
}

#[async_trait]
impl TransitProvider for RestTransitProvider {
    async fn find_place(&self, query: &str) -> Result<Place, TransitError> {
        let url = self.locations_url(query)?;
        let (status, body) = self.fetch(&url).await?;
        if !(200..300).contains(&status) {
            return Err(TransitError::HttpError {
                url: url.to_string(),
                status,
                message: body,
            });
        }
        parse_place(&body, query)
    }

    async fn journey(
        &self,
        origin: &Place,
        destination: &Place,
    ) -> Result<JourneyOutcome, TransitError> {
        let url = self.journeys_url(origin, destination)?;
        let (status, body) = self.fetch(&url).await?;
        parse_journey(url.as_str(), status, &body, &self.departure)
    }
}
