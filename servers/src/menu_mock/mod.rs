//! # Mock Menu Backend
//!
//! Serves the menu HTTP contract from an in-memory catalog: item listing,
//! nutrition facts, QR images, AR view analytics and the admin routes
//! guarded by `X-Admin-Key`. Used for local front-end runs and by the
//! integration tests, which can also inject `/items` failures.

/// Demo catalog and custom catalog loading.
pub mod catalog;
/// CLI, environment and file configuration of the binary.
pub mod config;
/// Routes and handlers.
pub mod routes;
/// Shared in-memory state.
pub mod state;

use std::future::Future;

use tokio::net::TcpListener;
use tracing::info;

pub use routes::router;
pub use state::{ArView, MockState};

/// Serves `state` on `listener` until `shutdown` resolves.
pub async fn serve<F>(listener: TcpListener, state: MockState, shutdown: F) -> std::io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    if let Ok(addr) = listener.local_addr() {
        info!("Mock menu backend listening on {}", addr);
    }
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown)
        .await
}
