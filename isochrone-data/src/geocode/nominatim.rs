//! `ReverseGeocoder` backed by the Nominatim `/reverse` endpoint.
//!
//! See: <https://nominatim.org/release-docs/latest/api/Reverse/>

use std::time::Duration;

use async_trait::async_trait;
use geo::Coord;
use isochrone_core::{ReverseGeocoder, TransitError};
use log::debug;
use reqwest::Client;
use serde::Deserialize;
use url::Url;

use crate::error::{ProviderBuildError, convert_reqwest_error, endpoint, parse_base_url};
use crate::transit::DEFAULT_USER_AGENT;

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Configuration for [`NominatimGeocoder`].
#[derive(Debug, Clone)]
pub struct NominatimConfig {
    /// Base URL of the Nominatim instance.
    pub base_url: String,
    /// Request timeout duration.
    pub timeout: Duration,
    /// User agent string for requests. Nominatim rejects anonymous clients.
    pub user_agent: String,
}

impl Default for NominatimConfig {
    fn default() -> Self {
        Self {
            base_url: "https://nominatim.openstreetmap.org".to_owned(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_owned(),
        }
    }
}

impl NominatimConfig {
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
}

/// Reverse geocoder querying a Nominatim instance over HTTP.
#[derive(Debug)]
pub struct NominatimGeocoder {
    client: Client,
    base_url: Url,
    timeout: Duration,
}

#[derive(Debug, Deserialize)]
struct ReverseResponse {
    display_name: Option<String>,
}

impl NominatimGeocoder {
    /// Create a geocoder with default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn new() -> Result<Self, ProviderBuildError> {
        Self::with_config(NominatimConfig::default())
    }

    /// Create a geocoder with explicit configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid or the HTTP client fails to
    /// build.
    pub fn with_config(config: NominatimConfig) -> Result<Self, ProviderBuildError> {
        let base_url = parse_base_url(&config.base_url)?;
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .connect_timeout(config.timeout)
            .timeout(config.timeout)
            .build()
            .map_err(ProviderBuildError::HttpClient)?;
        Ok(Self {
            client,
            base_url,
            timeout: config.timeout,
        })
    }

    fn reverse_url(&self, coord: Coord<f64>) -> Result<Url, TransitError> {
        endpoint(
            &self.base_url,
            "reverse",
            &[
                ("format", "jsonv2".to_owned()),
                ("lat", coord.y.to_string()),
                ("lon", coord.x.to_string()),
            ],
        )
    }
}

/// Extract the display name from a `/reverse` body.
///
/// Nominatim answers coordinates without any nearby object with an `error`
/// field; that is reported as [`TransitError::NotFound`].
pub fn parse_reverse(body: &str, coord: Coord<f64>) -> Result<String, TransitError> {
    let response: ReverseResponse =
        serde_json::from_str(body).map_err(|err| TransitError::ParseError {
            message: err.to_string(),
        })?;
    response.display_name.ok_or_else(|| TransitError::NotFound {
        query: format!("{}, {}", coord.y, coord.x),
    })
}

#[async_trait]
impl ReverseGeocoder for NominatimGeocoder {
    async fn address_at(&self, coord: Coord<f64>) -> Result<String, TransitError> {
        let url = self.reverse_url(coord)?;
        debug!("GET {url}");
        let timeout_secs = self.timeout.as_secs();
        let body = self
            .client
            .get(url.clone())
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|err| convert_reqwest_error(&err, url.as_str(), timeout_secs))?
            .text()
            .await
            .map_err(|err| convert_reqwest_error(&err, url.as_str(), timeout_secs))?;
        parse_reverse(&body, coord)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const MITTE: Coord<f64> = Coord { x: 13.4, y: 52.52 };

    #[rstest]
    fn reverse_url_puts_latitude_first() {
        let geocoder = NominatimGeocoder::with_config(NominatimConfig::new(
            "https://nominatim.example.org/",
        ))
        .expect("geocoder should build");
        let url = geocoder.reverse_url(MITTE).expect("valid url");
        assert_eq!(
            url.as_str(),
            "https://nominatim.example.org/reverse?format=jsonv2&lat=52.52&lon=13.4"
        );
    }

    #[rstest]
    fn parses_display_name() {
        let body = r#"{"place_id": 1, "display_name": "Rotes Rathaus, Rathausstraße, Mitte, Berlin"}"#;
        assert_eq!(
            parse_reverse(body, MITTE).expect("address"),
            "Rotes Rathaus, Rathausstraße, Mitte, Berlin"
        );
    }

    #[rstest]
    fn unable_to_geocode_is_not_found() {
        let body = r#"{"error": "Unable to geocode"}"#;
        let err = parse_reverse(body, MITTE).expect_err("nothing here");
        assert_eq!(
            err,
            TransitError::NotFound {
                query: "52.52, 13.4".to_owned()
            }
        );
    }

    #[rstest]
    fn malformed_body_is_a_parse_error() {
        let err = parse_reverse("<html>", MITTE).expect_err("not json");
        assert!(matches!(err, TransitError::ParseError { .. }));
    }
}
