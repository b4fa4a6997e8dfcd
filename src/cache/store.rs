use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::debug;
use tracing::trace;

use super::CacheSynced;
use super::DeletedFinalStateUnknown;
use super::DeletedObject;
use super::Lister;
use super::ResourceEventHandler;
use crate::object_key;
use crate::Error;
use crate::Resource;
use crate::Result;

/// A single change from the watch stream.
#[derive(Debug, Clone)]
pub enum WatchEvent<K> {
    Added(K),
    Modified(K),
    Deleted(K),
}

/// In-memory watch cache for one resource kind.
///
/// `replace` loads a full listing (marking the cache synced on first call);
/// `apply` folds in individual watch events. Handlers are notified after the
/// cache has been updated, outside the internal lock.
pub struct Store<K: Resource> {
    items: RwLock<HashMap<String, Arc<K>>>,
    synced: AtomicBool,
    handlers: RwLock<Vec<Arc<dyn ResourceEventHandler>>>,
}

impl<K: Resource> Default for Store<K> {
    fn default() -> Self {
        Self {
            items: RwLock::new(HashMap::new()),
            synced: AtomicBool::new(false),
            handlers: RwLock::new(Vec::new()),
        }
    }
}

impl<K: Resource> Store<K> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_event_handler(
        &self,
        handler: Arc<dyn ResourceEventHandler>,
    ) {
        self.handlers.write().push(handler);
    }

    /// Replaces the cache contents with a full listing.
    ///
    /// Objects missing from the listing are reported as deleted through a
    /// [`DeletedFinalStateUnknown`] tombstone, since their delete event was
    /// never seen.
    pub fn replace(
        &self,
        objects: Vec<K>,
    ) {
        let mut events = Vec::with_capacity(objects.len());
        {
            let mut items = self.items.write();
            let mut fresh: HashMap<String, Arc<K>> = HashMap::with_capacity(objects.len());
            for obj in objects {
                let obj = Arc::new(obj);
                fresh.insert(obj.metadata().key(), obj);
            }

            for (key, old) in items.iter() {
                if !fresh.contains_key(key) {
                    events.push(Event::Delete(DeletedObject::Tombstone(DeletedFinalStateUnknown {
                        key: key.clone(),
                        obj: Some(K::into_watched(old.clone())),
                    })));
                }
            }
            for (key, new) in fresh.iter() {
                match items.get(key) {
                    Some(old) => events.push(Event::Update(old.clone(), new.clone())),
                    None => events.push(Event::Add(new.clone())),
                }
            }

            *items = fresh;
        }

        if !self.synced.swap(true, Ordering::AcqRel) {
            debug!(kind = K::KIND, "watch cache synced");
        }
        self.dispatch(events);
    }

    /// Folds one watch event into the cache.
    pub fn apply(
        &self,
        event: WatchEvent<K>,
    ) {
        let notification = {
            let mut items = self.items.write();
            match event {
                WatchEvent::Added(obj) | WatchEvent::Modified(obj) => {
                    let obj = Arc::new(obj);
                    match items.insert(obj.metadata().key(), obj.clone()) {
                        Some(old) => Event::Update(old, obj),
                        None => Event::Add(obj),
                    }
                }
                WatchEvent::Deleted(obj) => {
                    let key = obj.metadata().key();
                    match items.remove(&key) {
                        Some(last) => Event::Delete(DeletedObject::Object(K::into_watched(last))),
                        None => {
                            trace!(kind = K::KIND, key = %key, "delete for unknown object ignored");
                            return;
                        }
                    }
                }
            }
        };
        self.dispatch(vec![notification]);
    }

    pub fn list(&self) -> Vec<Arc<K>> {
        self.items.read().values().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.items.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.read().is_empty()
    }

    fn dispatch(
        &self,
        events: Vec<Event<K>>,
    ) {
        if events.is_empty() {
            return;
        }
        let handlers = self.handlers.read().clone();
        for event in &events {
            for handler in &handlers {
                match event {
                    Event::Add(obj) => handler.on_add(&K::into_watched(obj.clone())),
                    Event::Update(old, new) => handler.on_update(
                        &K::into_watched(old.clone()),
                        &K::into_watched(new.clone()),
                    ),
                    Event::Delete(deleted) => handler.on_delete(deleted),
                }
            }
        }
    }
}

enum Event<K> {
    Add(Arc<K>),
    Update(Arc<K>, Arc<K>),
    Delete(DeletedObject),
}

impl<K: Resource> Lister<K> for Store<K> {
    fn get(
        &self,
        namespace: &str,
        name: &str,
    ) -> Result<Arc<K>> {
        let key = object_key(namespace, name);
        self.items
            .read()
            .get(&key)
            .cloned()
            .ok_or_else(|| Error::not_found(K::KIND, key))
    }
}

impl<K: Resource> CacheSynced for Store<K> {
    fn has_synced(&self) -> bool {
        self.synced.load(Ordering::Acquire)
    }
}
