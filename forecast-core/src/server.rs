use std::{future::Future, net::SocketAddr};

use anyhow::{Context, Result};
use tokio::net::TcpListener;

use crate::controller::{SharedBroker, router};

/// Bind the API listener.
pub async fn bind(addr: SocketAddr) -> Result<TcpListener> {
    TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind forecast API to {addr}"))
}

/// Serve the forecast API on `listener` until `shutdown` resolves.
pub async fn serve<F>(listener: TcpListener, broker: SharedBroker, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let addr = listener.local_addr()?;
    tracing::info!(%addr, ?broker, "forecast API listening");

    axum::serve(listener, router(broker))
        .with_graceful_shutdown(shutdown)
        .await
        .context("Forecast API server failed")?;

    tracing::info!("forecast API stopped");
    Ok(())
}

/// Resolves on Ctrl-C.
pub async fn ctrl_c() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %err, "failed to listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
}
