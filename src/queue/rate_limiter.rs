use std::fmt::Debug;
use std::hash::Hash;
use std::time::Duration;

use dashmap::DashMap;

use crate::flowcontrol::TokenBucketRateLimiter;
use crate::BackoffPolicy;
use crate::RetryPolicy;

/// Decides how long a failed item waits before it is queued again.
pub trait WorkRateLimiter<T>: Send + Sync {
    /// Records a failure and returns the delay before the next attempt.
    fn when(
        &self,
        item: &T,
    ) -> Duration;

    /// Clears the failure history of `item`.
    fn forget(
        &self,
        item: &T,
    );

    /// Failures recorded for `item` since it was last forgotten.
    fn num_requeues(
        &self,
        item: &T,
    ) -> u32;
}

/// Per-item exponential backoff: `base * 2^failures`, capped at `max`.
pub struct ItemExponentialFailureRateLimiter<T>
where
    T: Eq + Hash,
{
    pub(crate) failures: DashMap<T, u32>,
    base_delay: Duration,
    max_delay: Duration,
}

impl<T> ItemExponentialFailureRateLimiter<T>
where
    T: Eq + Hash + Clone,
{
    pub fn new(
        base_delay: Duration,
        max_delay: Duration,
    ) -> Self {
        Self {
            failures: DashMap::new(),
            base_delay,
            max_delay,
        }
    }

    pub fn from_policy(policy: &BackoffPolicy) -> Self {
        Self::new(policy.base_delay(), policy.max_delay())
    }
}

impl<T> WorkRateLimiter<T> for ItemExponentialFailureRateLimiter<T>
where
    T: Eq + Hash + Clone + Send + Sync,
{
    fn when(
        &self,
        item: &T,
    ) -> Duration {
        let exp = {
            let mut count = self.failures.entry(item.clone()).or_insert(0);
            let exp = *count;
            *count = count.saturating_add(1);
            exp
        };

        // Clamp the exponent so the float math stays finite.
        let backoff = self.base_delay.as_secs_f64() * 2f64.powi(exp.min(62) as i32);
        if backoff >= self.max_delay.as_secs_f64() {
            self.max_delay
        } else {
            Duration::from_secs_f64(backoff)
        }
    }

    fn forget(
        &self,
        item: &T,
    ) {
        self.failures.remove(item);
    }

    fn num_requeues(
        &self,
        item: &T,
    ) -> u32 {
        self.failures.get(item).map(|v| *v).unwrap_or(0)
    }
}

/// Overall retry budget shared by every item.
pub struct ItemBucketRateLimiter {
    bucket: TokenBucketRateLimiter,
}

impl ItemBucketRateLimiter {
    pub fn new(bucket: TokenBucketRateLimiter) -> Self {
        Self { bucket }
    }
}

impl<T> WorkRateLimiter<T> for ItemBucketRateLimiter {
    fn when(
        &self,
        _item: &T,
    ) -> Duration {
        self.bucket.reserve()
    }

    fn forget(
        &self,
        _item: &T,
    ) {
    }

    fn num_requeues(
        &self,
        _item: &T,
    ) -> u32 {
        0
    }
}

/// Waits for the longest delay any of its limiters asks for.
pub struct MaxOfRateLimiter<T> {
    limiters: Vec<Box<dyn WorkRateLimiter<T>>>,
}

impl<T> MaxOfRateLimiter<T> {
    pub fn new(limiters: Vec<Box<dyn WorkRateLimiter<T>>>) -> Self {
        Self { limiters }
    }
}

impl<T> WorkRateLimiter<T> for MaxOfRateLimiter<T> {
    fn when(
        &self,
        item: &T,
    ) -> Duration {
        // Every limiter must see the failure, so no short-circuiting.
        self.limiters
            .iter()
            .map(|l| l.when(item))
            .fold(Duration::ZERO, Duration::max)
    }

    fn forget(
        &self,
        item: &T,
    ) {
        for l in &self.limiters {
            l.forget(item);
        }
    }

    fn num_requeues(
        &self,
        item: &T,
    ) -> u32 {
        self.limiters
            .iter()
            .map(|l| l.num_requeues(item))
            .max()
            .unwrap_or(0)
    }
}

/// Per-item exponential backoff combined with the overall retry bucket.
pub fn default_controller_rate_limiter<T>(policy: &RetryPolicy) -> MaxOfRateLimiter<T>
where
    T: Eq + Hash + Clone + Debug + Send + Sync + 'static,
{
    let limiters: Vec<Box<dyn WorkRateLimiter<T>>> = vec![
        Box::new(ItemExponentialFailureRateLimiter::from_policy(&policy.backoff)),
        Box::new(ItemBucketRateLimiter::new(TokenBucketRateLimiter::from_config(
            &policy.overall,
        ))),
    ];
    MaxOfRateLimiter::new(limiters)
}
