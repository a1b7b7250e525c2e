//! Test-registration facility.
//!
//! Cases are named values collected into a [`Harness`]; nothing is
//! registered as a side effect of loading code. Each case receives a
//! [`TestContext`] to assert through and signals completion with
//! [`TestContext::end`].

mod case;
mod context;
mod runner;

pub use case::{FnCase, TestCase};
pub use context::TestContext;
pub use runner::Harness;
