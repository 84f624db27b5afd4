//! HTTP side of the push protocol.

pub mod routes;
pub mod state;

use crate::errors::AppResult;
use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::get;
use routes::{handshake_handler, health_handler, poll_handler, upload_handler};
use std::future::Future;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal::ctrl_c;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt};

pub use state::AppState;

/// Largest upload accepted. A terminal flushing its whole backlog stays far
/// below this.
pub const MAX_BODY_BYTES: usize = 1024 * 1024;

/// Install the global `tracing` subscriber. `RUST_LOG` wins over `default`.
pub fn init_tracing(default: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    // a second init (tests, embedding) keeps the first subscriber
    let _ = fmt().with_env_filter(filter).try_init();
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/iclock/cdata", get(handshake_handler).post(upload_handler))
        .route("/iclock/getrequest", get(poll_handler))
        .route("/health", get(health_handler))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serve until `shutdown` resolves. In-flight event work is not awaited
/// here; the caller drains the dispatcher afterwards.
pub async fn serve<F>(listener: TcpListener, state: Arc<AppState>, shutdown: F) -> AppResult<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let addr = listener.local_addr()?;
    info!("Server running on {addr}");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown)
        .await?;

    Ok(())
}

pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = ctrl_c().await {
            tracing::error!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
                info!("Received terminate signal, shutting down");
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
}
