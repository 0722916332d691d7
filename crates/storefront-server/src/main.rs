//! storefront server binary.
//!
//! - Config: `storefront.yaml` (or the path given as the first argument)
//! - Routes: `/users`, `/products`, plus `/metrics`, `/healthz`, `/readyz`
//! - Graceful shutdown on Ctrl+C / SIGTERM; readiness flips to draining first

use std::process::ExitCode;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use storefront_core::error::{Result, StorefrontError};
use storefront_server::{app_state::AppState, config, router};

const DEFAULT_CONFIG_PATH: &str = "storefront.yaml";

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, code = e.client_code().as_str(), "storefront-server failed");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<()> {
    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());
    let cfg = config::load_from_file(&path)?;
    let listen = cfg.server.listen_addr()?;

    let app = router::build_app(cfg)?;

    let listener = tokio::net::TcpListener::bind(listen)
        .await
        .map_err(|e| StorefrontError::Internal(format!("bind {listen} failed: {e}")))?;
    tracing::info!(%listen, config = %path, "storefront-server listening");

    axum::serve(listener, app.router)
        .with_graceful_shutdown(shutdown_signal(app.state))
        .await
        .map_err(|e| StorefrontError::Internal(format!("server failed: {e}")))?;

    tracing::info!("storefront-server stopped");
    Ok(())
}

async fn shutdown_signal(state: AppState) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
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

    state.set_draining();
    tracing::info!("shutdown signal received, draining");
}
