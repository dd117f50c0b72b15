//! Wiring and serving.

use std::sync::Arc;

use anyhow::Context;
use boulders_app::ProxyRequestHandler;
use boulders_core::config::EdgeConfig;
use boulders_infra::ReqwestUpstream;
use tokio::net::TcpListener;
use tokio::signal;
use tracing::{error, info};

use crate::server::build_router;

pub fn build_proxy_handler(config: &EdgeConfig) -> anyhow::Result<ProxyRequestHandler> {
    let upstream = ReqwestUpstream::new()?;
    Ok(ProxyRequestHandler::new(
        config.cors.clone(),
        config.upstream.clone(),
        Arc::new(upstream),
    ))
}

/// Serve the edge proxy until Ctrl-C or SIGTERM.
pub async fn serve(config: EdgeConfig) -> anyhow::Result<()> {
    let handler = build_proxy_handler(&config)?;
    let app = build_router(Arc::new(handler));

    let address = &config.server.bind_address;
    let listener = TcpListener::bind(address)
        .await
        .with_context(|| format!("Failed to bind {address}"))?;
    info!(%address, "edge proxy listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Edge server terminated with an error")?;

    info!("edge proxy stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, shutting down"),
            Err(e) => {
                error!(error = %e, "Failed to install Ctrl+C handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
