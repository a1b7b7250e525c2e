//! Hello Smoke - test-runner entry point
//!
//! Declares the smoke cases run against the Hello application and the
//! settings of the runner binary.

pub mod cases;
pub mod settings;

pub use cases::{EXAMPLE_TEST, SERVER_TEST, SERVER_TEST_TIMEOUT_MS, smoke_suite};
pub use settings::{RunnerSettings, SettingsError};
