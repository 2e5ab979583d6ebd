//! Dashboard listener configuration.

use crate::error::DashboardError;
use serde::{Deserialize, Serialize};
use std::net::{IpAddr, SocketAddr};

/// Environment variable overriding [`DashboardConfig::host`].
pub const HOST_ENV: &str = "GOVFLOW_DASHBOARD_HOST";
/// Environment variable overriding [`DashboardConfig::port`].
pub const PORT_ENV: &str = "GOVFLOW_DASHBOARD_PORT";

/// Where the dashboard listens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardConfig {
    /// IP address to bind.
    #[serde(default = "default_host")]
    pub host: String,
    /// TCP port to bind; 0 picks an ephemeral port.
    #[serde(default)]
    pub port: u16,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: 0,
        }
    }
}

impl DashboardConfig {
    /// Creates a configuration for the given host and port.
    #[must_use]
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }

    /// Reads `GOVFLOW_DASHBOARD_HOST` and `GOVFLOW_DASHBOARD_PORT`, falling
    /// back to the defaults for unset or unparsable values.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        if let Some(host) = lookup(HOST_ENV).filter(|h| !h.trim().is_empty()) {
            config.host = host.trim().to_string();
        }
        if let Some(raw) = lookup(PORT_ENV) {
            match raw.trim().parse() {
                Ok(port) => config.port = port,
                Err(e) => tracing::warn!("{PORT_ENV}: invalid port '{raw}': {e}"),
            }
        }
        config
    }

    /// Resolves the socket address to bind.
    pub fn socket_addr(&self) -> Result<SocketAddr, DashboardError> {
        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|_| DashboardError::InvalidAddress(self.host.clone()))?;
        Ok(SocketAddr::new(ip, self.port))
    }
}
