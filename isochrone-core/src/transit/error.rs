use thiserror::Error;

/// Errors from [`crate::transit::TransitProvider`] and
/// [`crate::transit::ReverseGeocoder`] implementations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransitError {
    /// The request could not be delivered.
    #[error("network error calling {url}: {message}")]
    NetworkError {
        /// Requested endpoint.
        url: String,
        /// Transport failure description.
        message: String,
    },
    /// The service did not answer within the configured timeout.
    #[error("request to {url} timed out after {timeout_secs} s")]
    Timeout {
        /// Requested endpoint.
        url: String,
        /// Configured timeout in seconds.
        timeout_secs: u64,
    },
    /// The service answered with a non-success status.
    #[error("{url} returned HTTP {status}: {message}")]
    HttpError {
        /// Requested endpoint.
        url: String,
        /// HTTP status code.
        status: u16,
        /// Response body or reason phrase.
        message: String,
    },
    /// The response body could not be decoded.
    #[error("failed to parse response: {message}")]
    ParseError {
        /// Decoder failure description.
        message: String,
    },
    /// No place matched the query.
    #[error("no place found for {query:?}")]
    NotFound {
        /// The unmatched query.
        query: String,
    },
    /// Every configured provider has used up its request budget.
    #[error("all transit providers are rate limited")]
    RateLimited,
    /// A timestamp in the response could not be interpreted.
    #[error("invalid timestamp {value:?}")]
    InvalidTime {
        /// The offending timestamp.
        value: String,
    },
}
