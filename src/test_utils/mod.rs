//! the test_utils folder here shares fixtures and fakes between the unit
//! tests of every module
mod common;
mod fake_client;
mod fixtures;

pub use common::*;
pub use fake_client::*;
pub use fixtures::*;
