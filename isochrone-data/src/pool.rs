//! Spread transit requests across several rate limited providers.

use std::time::Duration;

use async_trait::async_trait;
use isochrone_core::{JourneyOutcome, Place, TransitError, TransitProvider};
use log::info;
use rand::seq::SliceRandom;

use crate::rate_limit::RateLimitedProvider;

/// Rounds of waiting before the pool gives up.
const MAX_ROUNDS: usize = 12;

/// Default pause between rounds.
const DEFAULT_PAUSE: Duration = Duration::from_secs(1);

/// Pool of [`RateLimitedProvider`]s serving one logical transit provider.
///
/// Each request goes to a provider with room in its budget, tried in random
/// order so load is spread evenly. When every provider is exhausted the pool
/// waits and retries, then fails with [`TransitError::RateLimited`].
#[derive(Debug)]
pub struct ProviderPool<P> {
    providers: Vec<RateLimitedProvider<P>>,
    pause: Duration,
}

impl<P> ProviderPool<P> {
    /// Create a pool over `providers`.
    #[must_use]
    pub const fn new(providers: Vec<RateLimitedProvider<P>>) -> Self {
        Self {
            providers,
            pause: DEFAULT_PAUSE,
        }
    }

    /// Set the pause between rounds while every provider is exhausted.
    #[must_use]
    pub const fn with_pause(mut self, pause: Duration) -> Self {
        self.pause = pause;
        self
    }

    /// Providers in the pool.
    #[must_use]
    pub fn providers(&self) -> &[RateLimitedProvider<P>] {
        &self.providers
    }

    async fn acquire(&self) -> Result<&RateLimitedProvider<P>, TransitError> {
        for round in 0..MAX_ROUNDS {
            let order = {
                let mut order: Vec<usize> = (0..self.providers.len()).collect();
                order.shuffle(&mut rand::thread_rng());
                order
            };
            if let Some(provider) = order
                .into_iter()
                .map(|index| &self.providers[index])
                .find(|provider| !provider.has_reached_limit())
            {
                return Ok(provider);
            }
            if self.providers.is_empty() {
                break;
            }
            info!(
                "all {} transit providers are rate limited, waiting (round {})",
                self.providers.len(),
                round + 1
            );
            tokio::time::sleep(self.pause).await;
        }
        Err(TransitError::RateLimited)
    }
}

#[async_trait]
impl<P: TransitProvider> TransitProvider for ProviderPool<P> {
    async fn find_place(&self, query: &str) -> Result<Place, TransitError> {
        self.acquire().await?.find_place(query).await
    }

    async fn journey(
        &self,
        origin: &Place,
        destination: &Place,
    ) -> Result<JourneyOutcome, TransitError> {
        self.acquire().await?.journey(origin, destination).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transit::test_support::StubRestProvider;
    use geo::Coord;
    use rstest::{fixture, rstest};

    fn block_on<F: std::future::Future>(future: F) -> F::Output {
        tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .expect("failed to build Tokio runtime")
            .block_on(future)
    }

    fn stub(budget: usize) -> RateLimitedProvider<StubRestProvider> {
        RateLimitedProvider::new(
            StubRestProvider::with_outcome(JourneyOutcome::Reachable(Duration::from_secs(600))),
            budget,
        )
    }

    #[fixture]
    fn here() -> Place {
        Place::new("here", Coord { x: 13.4, y: 52.5 })
    }

    #[rstest]
    fn spreads_requests_until_every_budget_is_used(here: Place) {
        let pool = ProviderPool::new(vec![stub(1), stub(1)]).with_pause(Duration::ZERO);
        for _ in 0..4 {
            block_on(pool.journey(&here, &here)).expect("capacity left");
        }
        let calls: Vec<usize> = pool.providers().iter().map(|p| p.inner().calls()).collect();
        assert_eq!(calls, vec![2, 2]);
    }

    #[rstest]
    fn exhausted_pool_is_rate_limited(here: Place) {
        let pool = ProviderPool::new(vec![stub(0)]).with_pause(Duration::ZERO);
        block_on(pool.journey(&here, &here)).expect("first request fits");
        let err = block_on(pool.journey(&here, &here)).expect_err("budget used up");
        assert_eq!(err, TransitError::RateLimited);
        assert_eq!(pool.providers()[0].inner().calls(), 1);
    }

    #[rstest]
    fn empty_pool_is_rate_limited(here: Place) {
        let pool: ProviderPool<StubRestProvider> = ProviderPool::new(Vec::new());
        let err = block_on(pool.journey(&here, &here)).expect_err("no providers");
        assert_eq!(err, TransitError::RateLimited);
    }

    #[rstest]
    fn place_lookups_go_through_the_pool() {
        let pool = ProviderPool::new(vec![stub(5)]);
        let place = block_on(pool.find_place("Ostkreuz")).expect("place");
        assert_eq!(place.address, "Ostkreuz");
        assert_eq!(pool.providers()[0].inner().calls(), 1);
    }
}
