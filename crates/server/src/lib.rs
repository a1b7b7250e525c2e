//! Hello Server - the application under test
//!
//! Exposes a single route, `GET /`, answering `200 Hello, world!`. The
//! router is public so tests can drive it in-process; [`run_server`] serves
//! it on a socket.

pub mod error;
mod routes;
pub mod settings;

use std::future::Future;

use axum::Router;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

pub use error::ServerError;
pub use routes::GREETING;
pub use settings::ServerConfig;

/// Builds the application router.
#[must_use]
pub fn app() -> Router {
    routes::router().layer(TraceLayer::new_for_http())
}

/// Binds the configured address and serves until Ctrl-C.
///
/// # Errors
///
/// Returns an error if the address is invalid or cannot be bound.
pub async fn run_server(config: ServerConfig) -> Result<(), ServerError> {
    let addr = config.socket_addr()?;
    let listener = TcpListener::bind(addr).await?;
    serve(listener, shutdown_signal()).await
}

/// Serves the application on an already bound listener until `shutdown`
/// resolves.
///
/// # Errors
///
/// Returns an error if the listener fails.
pub async fn serve<F>(listener: TcpListener, shutdown: F) -> Result<(), ServerError>
where
    F: Future<Output = ()> + Send + 'static,
{
    info!(addr = %listener.local_addr()?, "listening");
    axum::serve(listener, app())
        .with_graceful_shutdown(shutdown)
        .await?;
    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
