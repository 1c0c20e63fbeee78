//! Content server configuration

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::sync::Arc;

use chrono::Duration;

use crate::auth::{AdminAuth, Clock, SystemClock, DEFAULT_TOKEN_TTL_MS};
use crate::store::ContentStore;

/// Origins allowed when `CORS_ORIGINS` is unset
pub const DEFAULT_CORS_ORIGINS: [&str; 4] = [
    "http://localhost:3000",
    "http://127.0.0.1:3000",
    "http://localhost:5173",
    "http://127.0.0.1:5173",
];

/// Maximum accepted JSON body size (2 MiB)
pub const MAX_BODY_BYTES: usize = 2 * 1024 * 1024;

/// Configuration for the content server
#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// Interface to bind
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Location of the persisted content document
    pub data_path: PathBuf,
    /// Shared admin passkey; admin access is disabled when absent
    pub admin_key: Option<String>,
    /// Lifetime of an issued admin token
    pub token_ttl: Duration,
    /// Browser origins allowed to call the API
    pub cors_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: 3000,
            data_path: vitae_common::data_path(),
            admin_key: None,
            token_ttl: Duration::milliseconds(DEFAULT_TOKEN_TTL_MS),
            cors_origins: DEFAULT_CORS_ORIGINS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl ServerConfig {
    /// Build the configuration from environment variables, falling back to
    /// defaults for anything unset or unparsable.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(host) = lookup("HOST").and_then(|s| s.trim().parse().ok()) {
            config.host = host;
        }
        if let Some(port) = lookup("PORT").and_then(|s| s.trim().parse().ok()) {
            config.port = port;
        }
        if let Some(path) = lookup("VITAE_DATA_PATH").filter(|s| !s.trim().is_empty()) {
            config.data_path = PathBuf::from(path.trim());
        }
        config.admin_key = lookup("ADMIN_KEY")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());
        if let Some(ms) = lookup("ADMIN_TOKEN_TTL_MS")
            .and_then(|s| s.trim().parse::<i64>().ok())
            .filter(|ms| *ms > 0)
        {
            config.token_ttl = Duration::milliseconds(ms);
        }
        if let Some(origins) = lookup("CORS_ORIGINS") {
            let origins: Vec<String> = origins
                .split(',')
                .map(|o| o.trim().to_string())
                .filter(|o| !o.is_empty())
                .collect();
            if !origins.is_empty() {
                config.cors_origins = origins;
            }
        }

        config
    }

    pub fn with_data_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.data_path = path.into();
        self
    }

    pub fn with_admin_key(mut self, key: impl Into<String>) -> Self {
        self.admin_key = Some(key.into());
        self
    }

    pub fn addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

/// App state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServerConfig>,
    pub store: Arc<ContentStore>,
    pub auth: Arc<AdminAuth>,
}

impl AppState {
    /// Wire the store and auth service from configuration using the system clock.
    pub fn new(config: ServerConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// Wire the state with an explicit clock.
    pub fn with_clock(config: ServerConfig, clock: Arc<dyn Clock>) -> Self {
        let store = Arc::new(ContentStore::new(config.data_path.clone()));
        let auth = Arc::new(AdminAuth::new(
            config.admin_key.clone(),
            clock,
            config.token_ttl,
        ));
        Self {
            config: Arc::new(config),
            store,
            auth,
        }
    }
}
