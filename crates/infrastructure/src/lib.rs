//! Hello Infrastructure - Adapters and implementations
//!
//! This crate provides the concrete HTTP clients and clock behind the
//! application ports, the fluent request tester used inside cases, and the
//! reporters that render a finished run.

pub mod adapters;
pub mod report;
pub mod testing;

pub use adapters::{ReqwestHttpClient, RouterClient, SystemClock};
pub use report::{JsonReporter, ReportError, ReportFormat, TapReporter, render};
pub use testing::{ExpectationChecker, PendingRequest, RequestError, RequestTest};
