//! Clock port

use chrono::{DateTime, Utc};

/// Port for getting the current wall-clock time.
///
/// Only used to stamp run reports; case timeouts run on the tokio clock.
pub trait Clock: Send + Sync {
    /// Returns the current UTC timestamp.
    fn now(&self) -> DateTime<Utc>;
}
