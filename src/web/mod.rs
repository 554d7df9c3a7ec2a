//! HTTP front door: `GET /?url=<site>[&refresh=true]` returns the site's favicon.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use favicon_core::config::AppConfig;
//! use favicon_core::service::FaviconService;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = AppConfig::default();
//! let service = Arc::new(FaviconService::from_config(&config)?);
//! favicon_core::web::serve(service, config.listen_addr).await?;
//! # Ok(())
//! # }
//! ```

mod handler;

pub use handler::{
    CACHE_CONTROL_VALUE, CLIENT_CACHE_SECS, FaviconQuery, ROBOTS_TAG_VALUE, X_CACHE_TYPE,
    favicon_handler,
};

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::service::FaviconService;

/// Builds the application router.
#[must_use]
pub fn router(service: Arc<FaviconService>) -> Router {
    Router::new()
        .route("/", get(favicon_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(service)
}

/// Binds `addr` and serves until Ctrl-C or SIGTERM.
///
/// # Errors
///
/// Returns the I/O error if the listener cannot be bound or the server fails.
pub async fn serve(service: Arc<FaviconService>, addr: SocketAddr) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(addr = %listener.local_addr()?, "favicon service listening");

    axum::serve(listener, router(service))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("favicon service stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(error) = tokio::signal::ctrl_c().await {
            warn!(error = %error, "cannot install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(error) => {
                warn!(error = %error, "cannot install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
    info!("shutdown signal received, draining connections");
}
