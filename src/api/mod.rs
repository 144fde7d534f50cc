pub mod error;
pub mod routes;

pub use error::ApiError;
pub use routes::{create_router, AppState};

use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;

use crate::config::Settings;

pub async fn serve(settings: Settings, state: AppState) -> anyhow::Result<()> {
    let addr: SocketAddr = format!("{}:{}", settings.server.host, settings.server.port).parse()?;
    let app = create_router(Arc::new(state), settings.server.body_limit_bytes);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
    info!("Shutdown signal received");
}
