use std::collections::HashSet;
use std::collections::VecDeque;
use std::fmt::Debug;
use std::hash::Hash;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::Notify;
use tokio::time::sleep;
use tracing::debug;
use tracing::trace;

use super::WorkRateLimiter;
use crate::metrics::QUEUE_ADDS;
use crate::metrics::QUEUE_DEPTH;
use crate::metrics::QUEUE_RETRIES;

struct QueueState<T> {
    /// Pending items in FIFO order
    queue: VecDeque<T>,
    /// Items that need processing, pending or not yet re-queued
    dirty: HashSet<T>,
    /// Items handed out by `get` and not yet marked `done`
    processing: HashSet<T>,
    shutting_down: bool,
}

struct QueueInner<T> {
    name: String,
    state: Mutex<QueueState<T>>,
    notify: Notify,
    rate_limiter: Box<dyn WorkRateLimiter<T>>,
}

/// Work queue that deduplicates items and delays retries.
///
/// Cloning yields another handle to the same queue; all methods are safe
/// for concurrent use.
pub struct RateLimitingQueue<T> {
    inner: Arc<QueueInner<T>>,
}

impl<T> Clone for RateLimitingQueue<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T> RateLimitingQueue<T>
where
    T: Clone + Eq + Hash + Debug + Send + Sync + 'static,
{
    pub fn new(
        name: impl Into<String>,
        rate_limiter: Box<dyn WorkRateLimiter<T>>,
    ) -> Self {
        Self {
            inner: Arc::new(QueueInner {
                name: name.into(),
                state: Mutex::new(QueueState {
                    queue: VecDeque::new(),
                    dirty: HashSet::new(),
                    processing: HashSet::new(),
                    shutting_down: false,
                }),
                notify: Notify::new(),
                rate_limiter,
            }),
        }
    }

    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// Marks `item` as needing processing. No-op if it is already pending,
    /// or if the queue is shutting down.
    pub fn add(
        &self,
        item: T,
    ) {
        let mut state = self.inner.state.lock();
        if state.shutting_down {
            return;
        }
        if state.dirty.contains(&item) {
            trace!(queue = %self.inner.name, ?item, "item already pending");
            return;
        }

        QUEUE_ADDS.with_label_values(&[self.inner.name.as_str()]).inc();
        state.dirty.insert(item.clone());
        if state.processing.contains(&item) {
            // Re-queued by `done`.
            return;
        }

        state.queue.push_back(item);
        self.record_depth(&state);
        drop(state);
        self.inner.notify.notify_one();
    }

    /// Waits for the next item. Returns `None` once the queue is shut down.
    pub async fn get(&self) -> Option<T> {
        loop {
            let notified = self.inner.notify.notified();
            {
                let mut state = self.inner.state.lock();
                if state.shutting_down {
                    return None;
                }
                if let Some(item) = state.queue.pop_front() {
                    state.dirty.remove(&item);
                    state.processing.insert(item.clone());
                    self.record_depth(&state);
                    return Some(item);
                }
            }
            notified.await;
        }
    }

    /// Marks processing of `item` finished. If it was added again in the
    /// meantime it goes back onto the queue.
    pub fn done(
        &self,
        item: &T,
    ) {
        let mut state = self.inner.state.lock();
        state.processing.remove(item);
        if state.dirty.contains(item) {
            state.queue.push_back(item.clone());
            self.record_depth(&state);
            drop(state);
            self.inner.notify.notify_one();
        }
    }

    /// Adds `item` after `delay` has elapsed.
    pub fn add_after(
        &self,
        item: T,
        delay: Duration,
    ) {
        if self.shutting_down() {
            return;
        }
        if delay.is_zero() {
            self.add(item);
            return;
        }

        let inner = Arc::downgrade(&self.inner);
        tokio::spawn(async move {
            sleep(delay).await;
            if let Some(inner) = inner.upgrade() {
                RateLimitingQueue { inner }.add(item);
            }
        });
    }

    /// Adds `item` once the rate limiter says it may be retried.
    pub fn add_rate_limited(
        &self,
        item: T,
    ) {
        if self.shutting_down() {
            return;
        }
        let delay = self.inner.rate_limiter.when(&item);
        QUEUE_RETRIES.with_label_values(&[self.inner.name.as_str()]).inc();
        debug!(queue = %self.inner.name, ?item, ?delay, "requeue after failure");
        self.add_after(item, delay);
    }

    /// Clears the retry history of `item`, resetting its backoff.
    pub fn forget(
        &self,
        item: &T,
    ) {
        self.inner.rate_limiter.forget(item);
    }

    pub fn num_requeues(
        &self,
        item: &T,
    ) -> u32 {
        self.inner.rate_limiter.num_requeues(item)
    }

    /// Number of items waiting to be handed out.
    pub fn len(&self) -> usize {
        self.inner.state.lock().queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Stops handing out items and wakes every waiting `get`.
    pub fn shut_down(&self) {
        self.inner.state.lock().shutting_down = true;
        self.inner.notify.notify_waiters();
    }

    pub fn shutting_down(&self) -> bool {
        self.inner.state.lock().shutting_down
    }

    fn record_depth(
        &self,
        state: &QueueState<T>,
    ) {
        QUEUE_DEPTH
            .with_label_values(&[self.inner.name.as_str()])
            .set(state.queue.len() as i64);
    }
}
