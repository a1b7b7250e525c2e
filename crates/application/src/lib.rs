//! Hello Application - Test harness and ports
//!
//! This crate holds the test-registration facility (named cases, the
//! assertion context handed to each case, and the harness that runs them
//! under a timeout) together with the ports the harness and the cases
//! depend on.

pub mod error;
pub mod harness;
pub mod ports;

pub use error::{ApplicationError, ApplicationResult};
pub use harness::{FnCase, Harness, TestCase, TestContext};
