//! Coalescing work queue with rate limited retries.
//!
//! An item is held at most once while pending and at most once while being
//! processed. Re-adding an item that is being processed marks it dirty; it
//! is queued again when the worker calls [`RateLimitingQueue::done`].

mod rate_limiter;
mod rate_limiting_queue;
pub use rate_limiter::*;
pub use rate_limiting_queue::*;


/// The controller's queue; it only ever carries [`crate::constants::WORK_QUEUE_KEY`].
pub type WorkQueue = RateLimitingQueue<&'static str>;
