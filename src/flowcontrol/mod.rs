//! Flow control for reconciliation attempts.
mod token_bucket;
pub use token_bucket::*;
