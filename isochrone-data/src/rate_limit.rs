//! Per-minute request budgets for external services.
//!
//! Public transit APIs tolerate a fixed number of requests per minute.
//! [`RateLimiter`] tracks the requests sent within a sliding window and
//! [`RateLimitedProvider`] records every call passing through it.

use std::collections::VecDeque;
use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use geo::Coord;
use isochrone_core::{JourneyOutcome, Place, ReverseGeocoder, TransitError, TransitProvider};
use log::debug;

/// Requests per minute tolerated by the `transport.rest` instances.
pub const DEFAULT_REQUESTS_PER_MINUTE: usize = 100;

/// Length of the sliding window.
const WINDOW: Duration = Duration::from_secs(60);

/// Pause between budget checks while a geocoder waits for capacity.
const GEOCODER_PAUSE: Duration = Duration::from_secs(1);

/// Sliding-window request counter.
///
/// The limit counts as reached once more than `requests_per_minute`
/// requests fall inside the last minute.
///
/// # Examples
///
/// ```
/// use isochrone_data::RateLimiter;
///
/// let limiter = RateLimiter::new(1);
/// limiter.record();
/// assert!(!limiter.has_reached_limit());
/// limiter.record();
/// assert!(limiter.has_reached_limit());
/// ```
#[derive(Debug)]
pub struct RateLimiter {
    requests_per_minute: usize,
    sent: Mutex<VecDeque<Instant>>,
}

impl RateLimiter {
    /// Create a limiter allowing `requests_per_minute` requests.
    #[must_use]
    pub const fn new(requests_per_minute: usize) -> Self {
        Self {
            requests_per_minute,
            sent: Mutex::new(VecDeque::new()),
        }
    }

    /// Configured budget.
    #[must_use]
    pub const fn requests_per_minute(&self) -> usize {
        self.requests_per_minute
    }

    /// Record a request sent now.
    pub fn record(&self) {
        self.record_at(Instant::now());
    }

    /// Report whether the budget for the current window is used up.
    #[must_use]
    pub fn has_reached_limit(&self) -> bool {
        self.has_reached_limit_at(Instant::now())
    }

    fn record_at(&self, at: Instant) {
        self.window().push_back(at);
    }

    fn has_reached_limit_at(&self, now: Instant) -> bool {
        let mut sent = self.window();
        while sent
            .front()
            .is_some_and(|&first| now.saturating_duration_since(first) > WINDOW)
        {
            sent.pop_front();
        }
        sent.len() > self.requests_per_minute
    }

    fn window(&self) -> std::sync::MutexGuard<'_, VecDeque<Instant>> {
        // The queue stays consistent even if a holder panicked.
        self.sent.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(DEFAULT_REQUESTS_PER_MINUTE)
    }
}

/// Wrap a provider or geocoder with a [`RateLimiter`].
///
/// Transit calls are recorded and passed through; choosing another provider
/// when the budget is exhausted is the job of [`crate::ProviderPool`].
/// Geocoder calls wait until the budget has room again.
#[derive(Debug)]
pub struct RateLimitedProvider<P> {
    inner: P,
    limiter: RateLimiter,
}

impl<P> RateLimitedProvider<P> {
    /// Wrap `inner` with a budget of `requests_per_minute`.
    #[must_use]
    pub const fn new(inner: P, requests_per_minute: usize) -> Self {
        Self {
            inner,
            limiter: RateLimiter::new(requests_per_minute),
        }
    }

    /// Report whether the wrapped service used up its budget.
    #[must_use]
    pub fn has_reached_limit(&self) -> bool {
        self.limiter.has_reached_limit()
    }

    /// The wrapped service.
    #[must_use]
    pub const fn inner(&self) -> &P {
        &self.inner
    }
}

#[async_trait]
impl<P: TransitProvider> TransitProvider for RateLimitedProvider<P> {
    async fn find_place(&self, query: &str) -> Result<Place, TransitError> {
        let found = self.inner.find_place(query).await;
        self.limiter.record();
        found
    }

    async fn journey(
        &self,
        origin: &Place,
        destination: &Place,
    ) -> Result<JourneyOutcome, TransitError> {
        let outcome = self.inner.journey(origin, destination).await;
        self.limiter.record();
        outcome
    }
}

#[async_trait]
impl<P: ReverseGeocoder> ReverseGeocoder for RateLimitedProvider<P> {
    async fn address_at(&self, coord: Coord<f64>) -> Result<String, TransitError> {
        while self.limiter.has_reached_limit() {
            debug!("geocoder budget used up, waiting");
            tokio::time::sleep(GEOCODER_PAUSE).await;
        }
        let address = self.inner.address_at(coord).await;
        self.limiter.record();
        address
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transit::test_support::StubRestProvider;
    use rstest::rstest;

    fn block_on<F: std::future::Future>(future: F) -> F::Output {
        tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .expect("failed to build Tokio runtime")
            .block_on(future)
    }

    #[rstest]
    fn limit_is_exceeded_only_above_budget() {
        let limiter = RateLimiter::new(3);
        let start = Instant::now();
        for _ in 0..3 {
            limiter.record_at(start);
        }
        assert!(!limiter.has_reached_limit_at(start));
        limiter.record_at(start);
        assert!(limiter.has_reached_limit_at(start));
    }

    #[rstest]
    fn old_requests_leave_the_window() {
        let limiter = RateLimiter::new(1);
        let start = Instant::now();
        limiter.record_at(start);
        limiter.record_at(start + Duration::from_secs(30));
        assert!(limiter.has_reached_limit_at(start + Duration::from_secs(59)));
        assert!(!limiter.has_reached_limit_at(start + Duration::from_secs(61)));
    }

    #[rstest]
    fn zero_budget_allows_no_requests_after_the_first() {
        let limiter = RateLimiter::new(0);
        assert!(!limiter.has_reached_limit());
        limiter.record();
        assert!(limiter.has_reached_limit());
    }

    #[rstest]
    fn wrapper_records_every_call() {
        let provider = RateLimitedProvider::new(
            StubRestProvider::with_outcome(JourneyOutcome::NoConnection),
            1,
        );
        let here = Place::new("here", Coord { x: 0.0, y: 0.0 });

        block_on(provider.journey(&here, &here)).expect("journey");
        assert!(!provider.has_reached_limit());
        block_on(provider.find_place("there")).expect("place");
        assert!(provider.has_reached_limit());
        assert_eq!(provider.inner().calls(), 2);
    }

    #[rstest]
    fn failed_calls_still_count() {
        let provider = RateLimitedProvider::new(
            StubRestProvider::with_error(TransitError::RateLimited),
            0,
        );
        let here = Place::new("here", Coord { x: 0.0, y: 0.0 });
        let err = block_on(provider.journey(&here, &here)).expect_err("stub fails");
        assert_eq!(err, TransitError::RateLimited);
        assert!(provider.has_reached_limit());
    }

    #[rstest]
    fn geocoder_calls_pass_through_within_budget() {
        let geocoder = RateLimitedProvider::new(isochrone_core::test_support::StubGeocoder, 5);
        let address = block_on(geocoder.address_at(Coord { x: 1.5, y: 2.0 })).expect("address");
        assert_eq!(address, "1.500000, 2.000000");
        assert!(!geocoder.has_reached_limit());
    }
}
