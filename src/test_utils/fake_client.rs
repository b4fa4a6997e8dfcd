use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::client::OperatorConfigClient;
use crate::Error;
use crate::OperatorConfig;
use crate::Resource;
use crate::Result;

/// In-memory remote holding a single operator config.
///
/// Updates must echo the stored resource version; a stale one fails with
/// [`Error::Conflict`]. Every accepted update bumps the version.
///
/// Each call yields once while counted as in flight, so overlapping callers
/// show up in [`FakeOperatorConfigClient::max_concurrent_calls`].
pub struct FakeOperatorConfigClient {
    stored: Mutex<Option<OperatorConfig>>,
    updates: AtomicUsize,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl FakeOperatorConfigClient {
    pub fn new(initial: OperatorConfig) -> Self {
        Self {
            stored: Mutex::new(Some(initial)),
            updates: AtomicUsize::new(0),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
        }
    }

    pub fn empty() -> Self {
        Self {
            stored: Mutex::new(None),
            updates: AtomicUsize::new(0),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
        }
    }

    /// Accepted update calls so far.
    pub fn update_count(&self) -> usize {
        self.updates.load(Ordering::SeqCst)
    }

    /// Highest number of `get`/`update` calls seen running at once.
    pub fn max_concurrent_calls(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    pub fn stored(&self) -> Option<OperatorConfig> {
        self.stored.lock().clone()
    }

    /// Simulates a concurrent writer touching some other field.
    pub fn bump_resource_version(&self) {
        if let Some(config) = self.stored.lock().as_mut() {
            config.metadata.resource_version = next_version(&config.metadata.resource_version);
        }
    }
}

fn next_version(current: &str) -> String {
    (current.parse::<u64>().unwrap_or(0) + 1).to_string()
}

impl FakeOperatorConfigClient {
    async fn enter(&self) {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        tokio::task::yield_now().await;
    }

    fn leave(&self) {
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
    }

    fn load(
        &self,
        name: &str,
    ) -> Result<OperatorConfig> {
        match self.stored.lock().as_ref() {
            Some(config) if config.metadata.name == name => Ok(config.clone()),
            _ => Err(Error::not_found(OperatorConfig::KIND, name)),
        }
    }

    fn store(
        &self,
        mut config: OperatorConfig,
    ) -> Result<OperatorConfig> {
        let mut stored = self.stored.lock();
        let current = match stored.as_ref() {
            Some(current) if current.metadata.name == config.metadata.name => current,
            _ => return Err(Error::not_found(OperatorConfig::KIND, config.metadata.name)),
        };
        if current.metadata.resource_version != config.metadata.resource_version {
            return Err(Error::Conflict {
                kind: OperatorConfig::KIND,
                name: config.metadata.name,
                message: "the object has been modified; please apply your changes to the latest version and try again".to_string(),
            });
        }

        config.metadata.resource_version = next_version(&current.metadata.resource_version);
        *stored = Some(config.clone());
        self.updates.fetch_add(1, Ordering::SeqCst);
        Ok(config)
    }
}

#[async_trait]
impl OperatorConfigClient for FakeOperatorConfigClient {
    async fn get(
        &self,
        name: &str,
    ) -> Result<OperatorConfig> {
        self.enter().await;
        let result = self.load(name);
        self.leave();
        result
    }

    async fn update(
        &self,
        config: OperatorConfig,
    ) -> Result<OperatorConfig> {
        self.enter().await;
        let result = self.store(config);
        self.leave();
        result
    }
}
