use clap::{Parser, ValueEnum};
use std::net::SocketAddr;
use url::Url;

use crate::error::StartupError;

pub const DEFAULT_MAX_BODY_BYTES: usize = 20 * 1024 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StorageBackend {
    /// Supabase Storage over its REST API
    Supabase,
    /// Process-local storage served by this server
    Memory,
}

/// Sketch API server.
#[derive(Debug, Clone, Parser)]
#[command(name = "sketchboard-server", version, about)]
pub struct ServerConfig {
    /// Address to bind to
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port to listen on
    #[arg(short, long, env = "PORT", default_value_t = 3000)]
    pub port: u16,

    /// SQLite connection string for sketch metadata
    #[arg(long, env = "DB_URI", default_value = "sqlite://sketchboard.db")]
    pub db_uri: String,

    /// Where image blobs are stored
    #[arg(long, env = "STORAGE_BACKEND", value_enum, default_value_t = StorageBackend::Supabase)]
    pub storage_backend: StorageBackend,

    #[arg(long, env = "SUPABASE_URL")]
    pub supabase_url: Option<Url>,

    #[arg(long, env = "SUPABASE_SERVICE_ROLE_KEY", hide_env_values = true)]
    pub supabase_service_role_key: Option<String>,

    #[arg(long, env = "SUPABASE_STORAGE_BUCKET", default_value = "sketches")]
    pub supabase_storage_bucket: String,

    /// Base URL public image links point at when using the memory backend
    /// (defaults to http://localhost:<port>)
    #[arg(long, env = "PUBLIC_BASE_URL")]
    pub public_base_url: Option<Url>,

    /// Path prefix the sketch routes are mounted under
    #[arg(long, env = "API_PREFIX", default_value = "/api")]
    pub api_prefix: String,

    /// Largest accepted request body in bytes
    #[arg(long, env = "MAX_BODY_BYTES", default_value_t = DEFAULT_MAX_BODY_BYTES)]
    pub max_body_bytes: usize,

    /// Enable debug logging
    #[arg(short, long)]
    pub debug: bool,
}

impl ServerConfig {
    pub fn bind_addr(&self) -> Result<SocketAddr, StartupError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| {
                StartupError::InvalidBindAddress(format!("{}:{} ({e})", self.host, self.port))
            })
    }

    pub fn public_base_url(&self) -> Result<Url, StartupError> {
        match &self.public_base_url {
            Some(url) => Ok(url.clone()),
            None => Url::parse(&format!("http://localhost:{}", self.port))
                .map_err(|e| StartupError::InvalidPublicUrl(e.to_string())),
        }
    }
}
