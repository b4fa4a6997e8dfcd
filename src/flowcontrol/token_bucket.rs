use std::time::Duration;

use parking_lot::Mutex;
use tokio::time::sleep;
use tokio::time::Instant;

use crate::TokenBucketConfig;

/// Token bucket gate.
///
/// Starts full with `burst` permits and refills continuously at `qps`
/// permits per second. `accept` reserves a permit up front and sleeps until
/// it is due, so concurrent callers are served in reservation order.
#[derive(Debug)]
pub struct TokenBucketRateLimiter {
    qps: f64,
    burst: f64,
    bucket: Mutex<Bucket>,
}

#[derive(Debug)]
struct Bucket {
    tokens: f64,
    last: Instant,
}

impl TokenBucketRateLimiter {
    pub fn new(
        qps: f64,
        burst: u32,
    ) -> Self {
        Self {
            qps,
            burst: burst as f64,
            bucket: Mutex::new(Bucket {
                tokens: burst as f64,
                last: Instant::now(),
            }),
        }
    }

    pub fn from_config(config: &TokenBucketConfig) -> Self {
        Self::new(config.qps, config.burst)
    }

    pub fn qps(&self) -> f64 {
        self.qps
    }

    /// Takes a permit if one is available right now.
    pub fn try_accept(&self) -> bool {
        let mut bucket = self.bucket.lock();
        self.refill(&mut bucket);
        if bucket.tokens >= 1.0 {
            bucket.tokens -= 1.0;
            true
        } else {
            false
        }
    }

    /// Reserves a permit and returns how long the caller must wait for it.
    pub fn reserve(&self) -> Duration {
        let mut bucket = self.bucket.lock();
        self.refill(&mut bucket);
        bucket.tokens -= 1.0;
        if bucket.tokens >= 0.0 {
            Duration::ZERO
        } else {
            Duration::from_secs_f64(-bucket.tokens / self.qps)
        }
    }

    /// Blocks until a permit is available.
    pub async fn accept(&self) {
        let wait = self.reserve();
        if !wait.is_zero() {
            sleep(wait).await;
        }
    }

    fn refill(
        &self,
        bucket: &mut Bucket,
    ) {
        let now = Instant::now();
        let elapsed = now.saturating_duration_since(bucket.last).as_secs_f64();
        bucket.tokens = (bucket.tokens + elapsed * self.qps).min(self.burst);
        bucket.last = now;
    }
}
