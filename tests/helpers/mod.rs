//! Test helpers module
//!
//! Shared setup for the integration tests: an in-memory application context
//! with a fixed clock, a recording mail transport and user factories.

#![allow(dead_code)]

pub mod mail_mock;
pub mod test_context;
pub mod test_data;

pub use mail_mock::*;
pub use test_context::*;
pub use test_data::*;
