use serde::Deserialize;
use serde::Serialize;

use super::config_error;
use crate::Result;

/// Token bucket parameters
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct TokenBucketConfig {
    /// Replenish rate in permits per second (0.05 = 3 per minute)
    #[serde(default = "default_qps")]
    pub qps: f64,

    /// Bucket capacity; also the number of permits available at start
    #[serde(default = "default_burst")]
    pub burst: u32,
}

impl Default for TokenBucketConfig {
    fn default() -> Self {
        Self {
            qps: default_qps(),
            burst: default_burst(),
        }
    }
}

impl TokenBucketConfig {
    pub fn validate(&self) -> Result<()> {
        validate_bucket(self, "rate_limit")
    }
}

pub(super) fn validate_bucket(
    bucket: &TokenBucketConfig,
    section: &str,
) -> Result<()> {
    if !bucket.qps.is_finite() || bucket.qps <= 0.0 {
        return Err(config_error(format!(
            "{section}.qps must be a positive number, got {}",
            bucket.qps
        )));
    }
    if bucket.burst == 0 {
        return Err(config_error(format!("{section}.burst must be at least 1")));
    }
    Ok(())
}

fn default_qps() -> f64 {
    0.05
}
fn default_burst() -> u32 {
    4
}
