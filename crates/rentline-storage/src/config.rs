//! Storage configuration loaded from environment variables.
//!
//! All settings have sensible defaults so the object server can start with
//! zero configuration for local development.

use std::net::SocketAddr;
use std::path::PathBuf;

/// Object storage configuration.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Socket address for the HTTP (axum) object server.
    /// Env: `HTTP_ADDR`
    /// Default: `0.0.0.0:8080`
    pub http_addr: SocketAddr,

    /// Filesystem path where objects are stored.
    /// Env: `OBJECT_ROOT`
    /// Default: `./objects`
    pub object_root: PathBuf,

    /// Base URL prepended when deriving an object's public URL.
    /// Env: `PUBLIC_BASE_URL`
    /// Default: `http://localhost:8080`
    pub public_base_url: String,

    /// Maximum object size in bytes (10 MiB).
    pub max_object_size: usize,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            http_addr: ([0, 0, 0, 0], 8080).into(),
            object_root: PathBuf::from("./objects"),
            public_base_url: "http://localhost:8080".to_string(),
            max_object_size: 10 * 1024 * 1024, // 10 MiB
        }
    }
}

impl StorageConfig {
    /// Load configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(addr) = std::env::var("HTTP_ADDR") {
            if let Ok(parsed) = addr.parse::<SocketAddr>() {
                config.http_addr = parsed;
            } else {
                tracing::warn!(
                    value = %addr,
                    "Invalid HTTP_ADDR, using default"
                );
            }
        }

        if let Ok(path) = std::env::var("OBJECT_ROOT") {
            config.object_root = PathBuf::from(path);
        }

        if let Ok(url) = std::env::var("PUBLIC_BASE_URL") {
            config.public_base_url = url.trim_end_matches('/').to_string();
        }

        // RUST_LOG is handled directly by tracing-subscriber's EnvFilter,
        // so we do not store it here.

        config
    }
}
