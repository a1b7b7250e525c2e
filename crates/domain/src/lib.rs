//! Hello Domain - Core test harness types
//!
//! This crate defines the domain model for the Hello smoke-test harness:
//! simulated HTTP exchanges, the expectations declared against them, and
//! the records a test run produces. All types here are pure Rust with no
//! I/O dependencies.

pub mod error;
pub mod report;
pub mod request;
pub mod response;
pub mod testing;

pub use error::{DomainError, DomainResult};
pub use report::{AssertionRecord, CaseOutcome, CaseReport, Operator, RunReport};
pub use request::{Header, HttpMethod, RequestSpec};
pub use response::HttpExchange;
pub use testing::{CaseOptions, Expectation, ExpectationResult, StatusExpectation};
