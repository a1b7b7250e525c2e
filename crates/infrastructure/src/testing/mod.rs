//! Request simulation for test cases.
//!
//! [`RequestTest`] wraps an HTTP client with a fluent builder: pick a
//! method and path, declare expectations, then `end()` to send the request
//! and check them.

mod expectations;
mod request;

pub use expectations::ExpectationChecker;
pub use request::{PendingRequest, RequestError, RequestTest};
