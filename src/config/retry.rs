use std::time::Duration;

use serde::Deserialize;
use serde::Serialize;

use super::config_error;
use super::rate_limit::validate_bucket;
use super::TokenBucketConfig;
use crate::Result;

/// Per-item exponential backoff template
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct BackoffPolicy {
    /// Delay after the first failure (unit: milliseconds)
    #[serde(default = "default_base_delay_ms")]
    pub base_delay_ms: u64,

    /// Ceiling for the doubled delay (unit: milliseconds)
    #[serde(default = "default_max_delay_ms")]
    pub max_delay_ms: u64,
}

impl Default for BackoffPolicy {
    fn default() -> Self {
        Self {
            base_delay_ms: default_base_delay_ms(),
            max_delay_ms: default_max_delay_ms(),
        }
    }
}

impl BackoffPolicy {
    pub fn base_delay(&self) -> Duration {
        Duration::from_millis(self.base_delay_ms)
    }

    pub fn max_delay(&self) -> Duration {
        Duration::from_millis(self.max_delay_ms)
    }
}

/// Retry behaviour of the work queue after a failed pass.
///
/// The effective requeue delay is the larger of the per-item backoff and the
/// wait imposed by the overall retry bucket.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct RetryPolicy {
    #[serde(default)]
    pub backoff: BackoffPolicy,

    #[serde(default = "default_overall_bucket")]
    pub overall: TokenBucketConfig,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            backoff: BackoffPolicy::default(),
            overall: default_overall_bucket(),
        }
    }
}

impl RetryPolicy {
    pub fn validate(&self) -> Result<()> {
        if self.backoff.base_delay_ms == 0 {
            return Err(config_error("retry.backoff.base_delay_ms must be greater than 0"));
        }
        if self.backoff.base_delay_ms > self.backoff.max_delay_ms {
            return Err(config_error(format!(
                "retry.backoff.base_delay_ms ({}) exceeds max_delay_ms ({})",
                self.backoff.base_delay_ms, self.backoff.max_delay_ms
            )));
        }
        validate_bucket(&self.overall, "retry.overall")
    }
}

fn default_base_delay_ms() -> u64 {
    5
}
fn default_max_delay_ms() -> u64 {
    1_000_000
}
fn default_overall_bucket() -> TokenBucketConfig {
    TokenBucketConfig {
        qps: 10.0,
        burst: 100,
    }
}
