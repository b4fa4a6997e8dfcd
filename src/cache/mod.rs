//! Watch caches: eventually-consistent local views of remote collections.
//!
//! Observers read through [`Lister`]; the worker gates on [`CacheSynced`];
//! the event router subscribes through [`ResourceEventHandler`]. [`Store`]
//! implements all three over an in-memory map that the watch feed keeps warm.

mod store;
pub use store::*;


use std::sync::Arc;

#[cfg(test)]
use mockall::automock;

use crate::Resource;
use crate::Result;
use crate::WatchedObject;

/// Point lookups against a watch cache.
///
/// Absent objects yield [`crate::Error::NotFound`], which callers may
/// tolerate; any other error must be propagated.
#[cfg_attr(test, automock)]
pub trait Lister<K: Resource>: Send + Sync {
    /// Cluster-scoped kinds are looked up with an empty `namespace`.
    fn get(
        &self,
        namespace: &str,
        name: &str,
    ) -> Result<Arc<K>>;
}

/// Readiness flag: true once the first full listing has been loaded.
#[cfg_attr(test, automock)]
pub trait CacheSynced: Send + Sync {
    fn has_synced(&self) -> bool;
}

/// Change notifications delivered by a watch cache.
#[cfg_attr(test, automock)]
pub trait ResourceEventHandler: Send + Sync {
    fn on_add(
        &self,
        obj: &WatchedObject,
    );

    fn on_update(
        &self,
        old: &WatchedObject,
        new: &WatchedObject,
    );

    fn on_delete(
        &self,
        obj: &DeletedObject,
    );
}

/// Payload of a delete notification.
#[derive(Debug, Clone, PartialEq)]
pub enum DeletedObject {
    /// The delete itself was observed
    Object(WatchedObject),
    /// The object vanished during a relist; only its last known state remains
    Tombstone(DeletedFinalStateUnknown),
}

/// Final state of an object whose delete was never observed directly.
#[derive(Debug, Clone, PartialEq)]
pub struct DeletedFinalStateUnknown {
    pub key: String,
    pub obj: Option<WatchedObject>,
}
