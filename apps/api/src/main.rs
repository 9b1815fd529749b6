mod auth;
mod config;
mod errors;
mod export;
mod models;
mod preview;
mod resume;
mod routes;
mod state;
mod store;

use anyhow::Result;
use std::net::SocketAddr;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use std::sync::Arc;

use crate::auth::MockAuthProvider;
use crate::config::{Config, StorageBackend};
use crate::export::compose::TypstComposer;
use crate::export::pagination::A4_PORTRAIT;
use crate::export::Exporter;
use crate::routes::build_router;
use crate::state::AppState;
use crate::store::persistence::{DocumentStorage, FileStorage, MemoryStorage};
use crate::store::ResumeStore;

#[tokio::main]
async fn main() -> Result<()> {
    // Malformed env values fail startup before anything else happens
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Resume Builder API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize document storage
    let storage: Arc<dyn DocumentStorage> = match config.storage_backend {
        StorageBackend::File => {
            info!("Persisting resume under {}", config.storage_dir.display());
            Arc::new(FileStorage::new(&config.storage_dir))
        }
        StorageBackend::Memory => {
            warn!("Using in-memory storage; the resume will not survive a restart");
            Arc::new(MemoryStorage::new())
        }
    };

    // Hydrate the document (falls back to an empty resume on bad data)
    let store = ResumeStore::hydrate(storage, config.autosave_debounce).await;

    let exporter = Arc::new(Exporter::new(
        Arc::new(TypstComposer),
        A4_PORTRAIT,
        config.export_timeout,
    ));

    let state = AppState {
        store: store.clone(),
        auth: Arc::new(MockAuthProvider::new()),
        exporter,
        config: config.clone(),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins once the client has a fixed host

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // A pending autosave would otherwise be lost with the process
    match store.flush().await {
        Ok(true) => info!("Flushed pending resume changes"),
        Ok(false) => {}
        Err(e) => warn!("Could not flush pending resume changes: {e}"),
    }

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
