//! Outbound capability against the remote control plane.
//!
//! The generated API client lives outside this crate; the reconciler only
//! needs to read the operator config by name and replace it.

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;

use crate::OperatorConfig;
use crate::Result;

#[cfg_attr(test, automock)]
#[async_trait]
pub trait OperatorConfigClient: Send + Sync + 'static {
    /// Reads the operator config named `name`.
    ///
    /// # Errors
    /// - [`crate::Error::NotFound`] if no such object exists
    /// - [`crate::Error::Remote`] for any other read failure
    async fn get(
        &self,
        name: &str,
    ) -> Result<OperatorConfig>;

    /// Replaces the operator config with `config`.
    ///
    /// The update carries `config.metadata.resource_version`; implementations
    /// must reject a stale version with [`crate::Error::Conflict`] instead of
    /// overwriting a concurrent write.
    async fn update(
        &self,
        config: OperatorConfig,
    ) -> Result<OperatorConfig>;
}
