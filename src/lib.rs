//! Config observer: keeps the `observedConfig` of an operator config in line
//! with the cluster records it is derived from.
//!
//! Watch caches ([`cache::Store`]) feed change notifications through the
//! [`router`] onto a single-key work queue. The [`ConfigObserver`] worker
//! drains that queue, re-derives the document with the observer chain
//! ([`observe`]) and writes it back only when it differs from the stored copy.

pub mod cache;
pub mod client;
mod config;
pub mod constants;
mod controller;
mod document;
mod errors;
pub mod flowcontrol;
pub mod metrics;
pub mod observe;
pub mod queue;
pub mod reporter;
mod resources;
pub mod router;

pub use config::*;
pub use controller::*;
pub use document::*;
pub use errors::*;
pub use resources::*;

//-----------------------------------------------------------
// Test utils

#[cfg(test)]
pub mod test_utils;
