//! Runner settings.
//!
//! Read from `HELLO_SMOKE_`-prefixed environment variables:
//! `HELLO_SMOKE_FORMAT` (`tap` or `json`) and
//! `HELLO_SMOKE_DEFAULT_TIMEOUT_MS`.

use std::time::Duration;

use config::{Config, Environment};
use hello_infrastructure::ReportFormat;
use serde::Deserialize;

/// Errors raised while loading settings.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    /// A variable is missing a usable value.
    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// A case timeout of zero would fail every case before it starts.
    #[error("default_timeout_ms must be greater than zero")]
    ZeroTimeout,
}

/// Settings of the runner binary.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RunnerSettings {
    /// Report format written to stdout.
    pub format: ReportFormat,
    /// Timeout for cases that don't set their own.
    pub default_timeout_ms: u64,
}

impl RunnerSettings {
    /// Prefix of the environment variables read by [`from_env`](Self::from_env).
    pub const ENV_PREFIX: &'static str = "HELLO_SMOKE";

    /// Loads settings from the process environment.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable has an unusable value or the default
    /// timeout is zero.
    pub fn from_env() -> Result<Self, SettingsError> {
        Self::load(Environment::with_prefix(Self::ENV_PREFIX))
    }

    pub(crate) fn load(environment: Environment) -> Result<Self, SettingsError> {
        let config = Config::builder()
            .set_default("format", "tap")?
            .set_default("default_timeout_ms", 30_000)?
            .add_source(environment.try_parsing(true))
            .build()?;
        let settings: Self = config.try_deserialize()?;
        if settings.default_timeout_ms == 0 {
            return Err(SettingsError::ZeroTimeout);
        }
        Ok(settings)
    }

    /// Default case timeout as a duration.
    #[must_use]
    pub const fn default_timeout(&self) -> Duration {
        Duration::from_millis(self.default_timeout_ms)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn env(vars: &[(&str, &str)]) -> Environment {
        let map = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        Environment::with_prefix(RunnerSettings::ENV_PREFIX).source(Some(map))
    }

    #[test]
    fn defaults() {
        let settings = RunnerSettings::load(env(&[])).unwrap();
        assert_eq!(settings.format, ReportFormat::Tap);
        assert_eq!(settings.default_timeout(), Duration::from_secs(30));
    }

    #[test]
    fn overrides() {
        let settings = RunnerSettings::load(env(&[
            ("HELLO_SMOKE_FORMAT", "json"),
            ("HELLO_SMOKE_DEFAULT_TIMEOUT_MS", "1500"),
        ]))
        .unwrap();
        assert_eq!(settings.format, ReportFormat::Json);
        assert_eq!(settings.default_timeout_ms, 1500);
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let result = RunnerSettings::load(env(&[("HELLO_SMOKE_DEFAULT_TIMEOUT_MS", "0")]));
        assert!(matches!(result, Err(SettingsError::ZeroTimeout)));
    }

    #[test]
    fn unknown_format_is_rejected() {
        let result = RunnerSettings::load(env(&[("HELLO_SMOKE_FORMAT", "xml")]));
        assert!(result.is_err());
    }
}
