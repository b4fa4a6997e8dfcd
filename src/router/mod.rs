//! Event router: maps watch notifications onto the single work item.
//!
//! Which object changed is irrelevant, the observed config is always
//! re-derived in full. [`EnqueueOnChange`] reacts to every notification;
//! [`NamespaceEventHandler`] only to the target namespace.


use std::sync::Arc;

use tracing::debug;

use crate::cache::DeletedObject;
use crate::cache::ResourceEventHandler;
use crate::constants::WORK_QUEUE_KEY;
use crate::queue::WorkQueue;
use crate::reporter::ErrorReporter;
use crate::Error;
use crate::WatchedObject;

/// Enqueues the work key on every add, update and delete.
pub struct EnqueueOnChange {
    queue: WorkQueue,
}

impl EnqueueOnChange {
    pub fn new(queue: WorkQueue) -> Self {
        Self { queue }
    }
}

impl ResourceEventHandler for EnqueueOnChange {
    fn on_add(
        &self,
        _obj: &WatchedObject,
    ) {
        self.queue.add(WORK_QUEUE_KEY);
    }

    fn on_update(
        &self,
        _old: &WatchedObject,
        _new: &WatchedObject,
    ) {
        self.queue.add(WORK_QUEUE_KEY);
    }

    fn on_delete(
        &self,
        _obj: &DeletedObject,
    ) {
        self.queue.add(WORK_QUEUE_KEY);
    }
}

/// Enqueues the work key when the target namespace changes.
///
/// A non-namespace payload on add or update enqueues anyway. On delete the
/// tombstone, if any, is unwrapped first; a payload that still is not a
/// namespace is reported and dropped.
pub struct NamespaceEventHandler {
    queue: WorkQueue,
    target: String,
    reporter: Arc<dyn ErrorReporter>,
}

impl NamespaceEventHandler {
    pub fn new(
        queue: WorkQueue,
        target: impl Into<String>,
        reporter: Arc<dyn ErrorReporter>,
    ) -> Self {
        Self {
            queue,
            target: target.into(),
            reporter,
        }
    }

    fn enqueue_if_target(
        &self,
        obj: &WatchedObject,
    ) {
        match obj.as_namespace() {
            Some(ns) if ns.metadata.name == self.target => self.queue.add(WORK_QUEUE_KEY),
            Some(ns) => debug!(namespace = %ns.metadata.name, "ignoring untargeted namespace"),
            None => self.queue.add(WORK_QUEUE_KEY),
        }
    }
}

impl ResourceEventHandler for NamespaceEventHandler {
    fn on_add(
        &self,
        obj: &WatchedObject,
    ) {
        self.enqueue_if_target(obj);
    }

    fn on_update(
        &self,
        old: &WatchedObject,
        new: &WatchedObject,
    ) {
        match (old.as_namespace(), new.as_namespace()) {
            (Some(old), Some(new)) => {
                if old.metadata.name == self.target || new.metadata.name == self.target {
                    self.queue.add(WORK_QUEUE_KEY);
                }
            }
            _ => self.queue.add(WORK_QUEUE_KEY),
        }
    }

    fn on_delete(
        &self,
        obj: &DeletedObject,
    ) {
        let ns = match obj {
            DeletedObject::Object(obj) => match obj.as_namespace() {
                Some(ns) => ns,
                None => {
                    self.reporter.report(
                        "namespace delete",
                        &Error::UnexpectedObject(format!(
                            "couldn't get object from tombstone {} {}",
                            obj.kind(),
                            obj.metadata().key()
                        )),
                    );
                    return;
                }
            },
            DeletedObject::Tombstone(tombstone) => {
                match tombstone.obj.as_ref().and_then(WatchedObject::as_namespace) {
                    Some(ns) => ns,
                    None => {
                        self.reporter.report(
                            "namespace delete",
                            &Error::UnexpectedObject(format!(
                                "tombstone {} contained object that is not a Namespace",
                                tombstone.key
                            )),
                        );
                        return;
                    }
                }
            }
        };

        if ns.metadata.name == self.target {
            self.queue.add(WORK_QUEUE_KEY);
        }
    }
}
