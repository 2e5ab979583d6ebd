//! Dashboard errors.

use std::net::SocketAddr;
use thiserror::Error;

/// Errors raised while starting or running the dashboard.
#[derive(Debug, Error)]
pub enum DashboardError {
    /// The configured host is not an IP address.
    #[error("invalid dashboard address: {0}")]
    InvalidAddress(String),

    /// The listener could not be bound.
    #[error("failed to bind dashboard on {addr}: {source}")]
    Bind {
        /// Address that was requested.
        addr: SocketAddr,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The server stopped with an I/O error.
    #[error("dashboard server error: {0}")]
    Serve(#[source] std::io::Error),
}
