use std::time::Duration;

use serde::Deserialize;
use serde::Serialize;

use super::config_error;
use super::validate_name;
use crate::constants::DEFAULT_QUEUE_NAME;
use crate::constants::OPERATOR_CONFIG_NAME;
use crate::Result;

/// Worker loop settings and the identity of the persisted operator config
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ControllerConfig {
    /// Name of the operator config object the observed config is written into
    #[serde(default = "default_operator_config_name")]
    pub operator_config_name: String,

    /// Requested worker count. Accepted for compatibility, only one worker
    /// ever runs because the queue carries a single key.
    #[serde(default = "default_workers")]
    pub workers: usize,

    /// Queue name used in logs and metric labels
    #[serde(default = "default_queue_name")]
    pub queue_name: String,

    /// Interval between readiness checks while waiting for caches (milliseconds)
    #[serde(default = "default_cache_sync_poll_interval_ms")]
    pub cache_sync_poll_interval_ms: u64,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            operator_config_name: default_operator_config_name(),
            workers: default_workers(),
            queue_name: default_queue_name(),
            cache_sync_poll_interval_ms: default_cache_sync_poll_interval_ms(),
        }
    }
}

impl ControllerConfig {
    pub fn validate(&self) -> Result<()> {
        validate_name(&self.operator_config_name, "controller.operator_config_name")?;
        validate_name(&self.queue_name, "controller.queue_name")?;

        if self.cache_sync_poll_interval_ms == 0 {
            return Err(config_error(
                "controller.cache_sync_poll_interval_ms must be greater than 0",
            ));
        }
        Ok(())
    }

    pub fn cache_sync_poll_interval(&self) -> Duration {
        Duration::from_millis(self.cache_sync_poll_interval_ms)
    }
}

fn default_operator_config_name() -> String {
    OPERATOR_CONFIG_NAME.to_string()
}
fn default_workers() -> usize {
    1
}
fn default_queue_name() -> String {
    DEFAULT_QUEUE_NAME.to_string()
}
fn default_cache_sync_poll_interval_ms() -> u64 {
    100
}
