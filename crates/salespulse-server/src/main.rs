//! SalesPulse server binary.
//!
//! - Config: `SALESPULSE_CONFIG` or `./salespulse.yaml` (defaults when absent)
//! - Logging: `RUST_LOG`, defaults to `salespulse_server=info,tower_http=info`
//! - Shutdown: Ctrl+C / SIGTERM flips readiness to draining, then drains

use tracing_subscriber::{fmt, EnvFilter};

use salespulse_core::error::{Result, SalesError};
use salespulse_server::{app_state::AppState, config, router};

#[tokio::main]
async fn main() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("salespulse_server=info,tower_http=info"));
    fmt().with_env_filter(filter).init();

    if let Err(e) = run().await {
        tracing::error!(error = %e, "salespulse-server failed");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let path = config::config_path();
    let cfg = config::load_from_file(&path)?;
    let listen = cfg.server.listen_addr()?;

    let state = AppState::new(cfg)?;
    let app = router::build_router(state.clone())?;

    let listener = tokio::net::TcpListener::bind(listen)
        .await
        .map_err(|e| SalesError::Internal(format!("failed to bind {listen}: {e}")))?;
    tracing::info!(%listen, config = %path, "salespulse-server starting");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(state))
        .await
        .map_err(|e| SalesError::Internal(format!("server failed: {e}")))?;

    tracing::info!("salespulse-server stopped");
    Ok(())
}

async fn shutdown_signal(state: AppState) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "failed to listen for Ctrl+C");
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
                tracing::warn!(error = %e, "failed to install SIGTERM handler");
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
    tracing::info!("signal received, draining");
}
