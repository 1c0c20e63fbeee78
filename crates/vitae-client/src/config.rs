//! Configuration for the content client.

use std::path::PathBuf;

/// Configuration for the content client.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientConfig {
    /// Server origin, without a trailing slash.
    pub base_url: String,
    /// Request timeout in milliseconds.
    pub request_timeout_ms: u64,
    /// Directory holding the per-field cache entries.
    pub cache_dir: PathBuf,
}

impl Default for ClientConfig {
    fn default() -> Self {
        ClientConfig {
            base_url: "http://localhost:3000".to_string(),
            request_timeout_ms: 30000,
            cache_dir: vitae_common::cache_dir(),
        }
    }
}

impl ClientConfig {
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_cache_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cache_dir = dir.into();
        self
    }
}
