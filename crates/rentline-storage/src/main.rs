//! # rentline-storage server
//!
//! Standalone object server: stores uploaded chat attachments on disk and
//! serves them back at their durable public URLs.

use std::sync::Arc;

use tracing::info;
use tracing_subscriber::EnvFilter;

use rentline_storage::http::{self, AppState};
use rentline_storage::{ObjectStore, StorageConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing (respects RUST_LOG env var)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,rentline_storage=debug")),
        )
        .init();

    info!(
        "Starting Rentline object server v{}",
        env!("CARGO_PKG_VERSION")
    );

    // Load configuration
    let config = StorageConfig::from_env();
    info!(?config, "Loaded configuration");

    // Object store (creates directory if missing)
    let store = Arc::new(
        ObjectStore::new(
            config.object_root.clone(),
            config.public_base_url.clone(),
            config.max_object_size,
        )
        .await?,
    );

    http::serve(AppState { store }, config.http_addr).await
}
