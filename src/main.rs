mod access;
mod api_doc;
mod app;
mod config;
mod error;
mod handlers;
mod models;
mod record;
mod routes;
mod service;
mod state;
mod store;

use access::AccessGate;
use anyhow::Context;
use config::{Config, StoreBackend};
use record::RecordStore;
use service::ListService;
use state::AppState;
use std::sync::Arc;
use store::{KvStore, MemoryStore, SpannerStore};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    tracing::info!("tv-list starting");

    let config = Config::from_env()?;
    config.log_startup();

    let store: Arc<dyn KvStore> = match (config.store_backend, &config.spanner) {
        (StoreBackend::Spanner, Some(spanner)) => Arc::new(SpannerStore::from_config(spanner).await?),
        (StoreBackend::Spanner, None) => anyhow::bail!("Spanner backend selected without Spanner settings"),
        (StoreBackend::Memory, _) => {
            tracing::warn!("Using in-memory store; the list is lost on restart");
            Arc::new(MemoryStore::new())
        }
    };

    let state = AppState {
        list_service: ListService::new(RecordStore::new(
            store,
            config.store_timeout,
            config.store_max_retries,
        )),
        gate: AccessGate::new(config.access_code.clone()),
        config: Arc::new(config),
    };

    let addr = format!("{}:{}", state.config.service_host, state.config.service_port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!("Listening on {}", listener.local_addr()?);

    axum::serve(listener, app::build_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    tracing::info!("tv-list stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {}", e);
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

    tracing::info!("Shutdown signal received");
}
