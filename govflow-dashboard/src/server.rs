//! Listener lifecycle.

use crate::{create_router, DashboardConfig, DashboardError, DashboardState};
use axum::Router;
use std::future::Future;
use std::net::SocketAddr;
use tokio::net::TcpListener;

/// A bound dashboard, ready to serve.
#[derive(Debug)]
pub struct DashboardServer {
    listener: TcpListener,
    local_addr: SocketAddr,
    router: Router,
}

impl DashboardServer {
    /// Binds the listener. Port 0 picks an ephemeral port; the bound port is
    /// logged and available from [`Self::port`].
    pub async fn bind(
        config: &DashboardConfig,
        state: DashboardState,
    ) -> Result<Self, DashboardError> {
        let addr = config.socket_addr()?;
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|source| DashboardError::Bind { addr, source })?;
        let local_addr = listener
            .local_addr()
            .map_err(|source| DashboardError::Bind { addr, source })?;

        tracing::info!(addr = %local_addr, port = local_addr.port(), "Dashboard listening");

        Ok(Self {
            listener,
            local_addr,
            router: create_router(state),
        })
    }

    /// The bound port.
    #[must_use]
    pub const fn port(&self) -> u16 {
        self.local_addr.port()
    }

    /// The bound address.
    #[must_use]
    pub const fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Serves requests until the process exits or an I/O error occurs.
    pub async fn serve(self) -> Result<(), DashboardError> {
        axum::serve(self.listener, self.router)
            .await
            .map_err(DashboardError::Serve)
    }

    /// Serves requests until `signal` resolves, then drains and returns.
    pub async fn serve_with_shutdown<F>(self, signal: F) -> Result<(), DashboardError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr = self.local_addr;
        axum::serve(self.listener, self.router)
            .with_graceful_shutdown(signal)
            .await
            .map_err(DashboardError::Serve)?;
        tracing::info!(%addr, "Dashboard stopped");
        Ok(())
    }
}
