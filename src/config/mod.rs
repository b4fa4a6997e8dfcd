//! Configuration management for the config observer.
//!
//! Provides hierarchical configuration loading and validation with:
//! - Default values as code base
//! - Configuration file support
//! - Environment variable overrides
//! - Section-wise validation
mod controller;
mod rate_limit;
mod retry;
mod sources;
pub use controller::*;
pub use rate_limit::*;
pub use retry::*;
pub use sources::*;

#[cfg(test)]
mod config_test;

use std::env;
use std::fmt::Debug;

use config::Config;
use config::ConfigError;
use config::Environment;
use config::File;
use serde::Deserialize;
use serde::Serialize;

use crate::Error;
use crate::Result;

/// Main configuration container for the config observer
///
/// Combines all section configurations with hierarchical override support:
/// 1. Default values from code implementation
/// 2. Configuration file specified by `CONFIG_PATH`
/// 3. Environment variables with `OBSERVER__` prefix (highest priority)
#[derive(Serialize, Deserialize, Clone, Default)]
pub struct ObserverConfig {
    /// Worker loop and operator config identity
    #[serde(default)]
    pub controller: ControllerConfig,
    /// Names of the records the observers read
    #[serde(default)]
    pub sources: ObservedSources,
    /// Token bucket consulted before every reconciliation pass
    #[serde(default)]
    pub rate_limit: TokenBucketConfig,
    /// Work queue retry backoff
    #[serde(default)]
    pub retry: RetryPolicy,
}

impl Debug for ObserverConfig {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        f.debug_struct("ObserverConfig")
            .field("controller", &self.controller)
            .field("rate_limit", &self.rate_limit)
            .field("retry", &self.retry)
            .finish_non_exhaustive()
    }
}

impl ObserverConfig {
    /// Loads configuration from hierarchical sources without validation.
    ///
    /// Sources are merged in the following order (later sources override earlier):
    /// 1. Type defaults
    /// 2. Configuration file from `CONFIG_PATH` (if set)
    /// 3. Environment variables with `OBSERVER__` prefix
    ///
    /// Callers MUST call `validate()` before using the configuration.
    ///
    /// # Examples
    /// ```ignore
    /// std::env::set_var("OBSERVER__RATE_LIMIT__BURST", "8");
    /// let cfg = ObserverConfig::new()?.validate()?;
    /// ```
    pub fn new() -> Result<Self> {
        let mut builder = Config::builder().add_source(Config::try_from(&Self::default())?);

        if let Ok(config_path) = env::var("CONFIG_PATH") {
            builder = builder.add_source(File::with_name(&config_path).required(true));
        }

        builder = builder.add_source(env_source());

        let config: Self = builder.build()?.try_deserialize()?;
        Ok(config)
    }

    /// Applies additional overrides from a file without validation.
    ///
    /// Merging order:
    /// 1. Current configuration values
    /// 2. New configuration file
    /// 3. Latest environment variables (highest priority)
    pub fn with_override_config(
        &self,
        path: &str,
    ) -> Result<Self> {
        let config: Self = Config::builder()
            .add_source(Config::try_from(self)?)
            .add_source(File::with_name(path))
            .add_source(env_source())
            .build()?
            .try_deserialize()?;
        Ok(config)
    }

    /// Validates every section and returns the validated instance.
    pub fn validate(self) -> Result<Self> {
        self.controller.validate()?;
        self.sources.validate()?;
        self.rate_limit.validate()?;
        self.retry.validate()?;
        Ok(self)
    }
}

fn env_source() -> Environment {
    Environment::with_prefix("OBSERVER")
        .separator("__")
        .ignore_empty(true)
        .try_parsing(true)
}

pub(super) fn config_error(message: impl Into<String>) -> Error {
    Error::Config(ConfigError::Message(message.into()))
}

/// Ensures a name field is not blank
pub(super) fn validate_name(
    value: &str,
    field: &str,
) -> Result<()> {
    if value.trim().is_empty() {
        return Err(config_error(format!("{field} cannot be empty")));
    }
    Ok(())
}
