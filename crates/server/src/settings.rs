//! Server configuration.
//!
//! Defaults overlaid with `HELLO_`-prefixed environment variables:
//! `HELLO_HOST` and `HELLO_PORT`.

use std::net::{IpAddr, SocketAddr};

use config::{Config, Environment};
use serde::Deserialize;

use crate::error::ServerError;

/// Address the server binds to.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ServerConfig {
    /// Interface to bind.
    pub host: String,
    /// TCP port.
    pub port: u16,
}

impl ServerConfig {
    /// Prefix of the environment variables read by [`from_env`](Self::from_env).
    pub const ENV_PREFIX: &'static str = "HELLO";

    /// Loads the configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable cannot be converted, e.g. a
    /// non-numeric port.
    pub fn from_env() -> Result<Self, ServerError> {
        Self::load(Environment::with_prefix(Self::ENV_PREFIX))
    }

    pub(crate) fn load(environment: Environment) -> Result<Self, ServerError> {
        let config = Config::builder()
            .set_default("host", "0.0.0.0")?
            .set_default("port", 8888)?
            .add_source(environment.try_parsing(true))
            .build()?;
        Ok(config.try_deserialize()?)
    }

    /// The socket address to bind.
    ///
    /// # Errors
    ///
    /// Returns `ServerError::InvalidAddress` if `host` is not an IP address.
    pub fn socket_addr(&self) -> Result<SocketAddr, ServerError> {
        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|_| ServerError::InvalidAddress(format!("{}:{}", self.host, self.port)))?;
        Ok(SocketAddr::new(ip, self.port))
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
        Environment::with_prefix(ServerConfig::ENV_PREFIX).source(Some(map))
    }

    #[test]
    fn defaults_apply() {
        let config = ServerConfig::load(env(&[])).unwrap();
        assert_eq!(
            config,
            ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 8888,
            }
        );
    }

    #[test]
    fn environment_overrides() {
        let config =
            ServerConfig::load(env(&[("HELLO_HOST", "127.0.0.1"), ("HELLO_PORT", "9000")]))
                .unwrap();
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 9000);
        assert_eq!(config.socket_addr().unwrap().to_string(), "127.0.0.1:9000");
    }

    #[test]
    fn bad_port_is_an_error() {
        let result = ServerConfig::load(env(&[("HELLO_PORT", "eighty")]));
        assert!(matches!(result, Err(ServerError::Config(_))));
    }

    #[test]
    fn host_must_be_an_ip() {
        let config = ServerConfig {
            host: "localhost".to_string(),
            port: 80,
        };
        assert!(matches!(config.socket_addr(), Err(ServerError::InvalidAddress(_))));
    }
}
