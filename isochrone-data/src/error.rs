//! Construction errors shared by the HTTP adapters.

use isochrone_core::TransitError;

/// Error type for provider and geocoder construction failures.
#[derive(Debug)]
pub enum ProviderBuildError {
    /// Failed to build the HTTP client.
    HttpClient(reqwest::Error),
    /// The configured base URL is not an absolute URL.
    InvalidBaseUrl {
        /// The rejected URL.
        url: String,
        /// Parser failure.
        source: url::ParseError,
    },
    /// No default departure time could be derived from the clock.
    Departure(TransitError),
}

impl std::fmt::Display for ProviderBuildError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::HttpClient(err) => write!(f, "failed to build HTTP client: {err}"),
            Self::InvalidBaseUrl { url, source } => {
                write!(f, "invalid base URL {url:?}: {source}")
            }
            Self::Departure(err) => write!(f, "failed to derive departure time: {err}"),
        }
    }
}

impl std::error::Error for ProviderBuildError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::HttpClient(err) => Some(err),
            Self::InvalidBaseUrl { source, .. } => Some(source),
            Self::Departure(err) => Some(err),
        }
    }
}

/// Parse `base_url`, rejecting relative or malformed URLs.
pub(crate) fn parse_base_url(base_url: &str) -> Result<url::Url, ProviderBuildError> {
    url::Url::parse(base_url).map_err(|source| ProviderBuildError::InvalidBaseUrl {
        url: base_url.to_owned(),
        source,
    })
}

/// Convert a reqwest error to a `TransitError`.
pub(crate) fn convert_reqwest_error(
    error: &reqwest::Error,
    url: &str,
    timeout_secs: u64,
) -> TransitError {
    if error.is_timeout() {
        return TransitError::Timeout {
            url: url.to_owned(),
            timeout_secs,
        };
    }

    if let Some(status) = error.status() {
        return TransitError::HttpError {
            url: url.to_owned(),
            status: status.as_u16(),
            message: error.to_string(),
        };
    }

    TransitError::NetworkError {
        url: url.to_owned(),
        message: error.to_string(),
    }
}

/// Join `path` onto `base` and append the query parameters.
pub(crate) fn endpoint(
    base: &url::Url,
    path: &str,
    params: &[(&str, String)],
) -> Result<url::Url, TransitError> {
    let joined = format!("{}/{path}", base.as_str().trim_end_matches('/'));
    url::Url::parse_with_params(&joined, params).map_err(|err| TransitError::ParseError {
        message: format!("cannot build request URL from {joined:?}: {err}"),
    })
}
