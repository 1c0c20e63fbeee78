use crate::error::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A bearer token handed out by `POST /api/auth`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Abstraction for the content server API.
#[async_trait]
pub trait ContentApi: Send + Sync + 'static {
    /// Fetch the stored bundle. `Ok(None)` means the server has nothing stored.
    async fn fetch_bundle(&self) -> Result<Option<Value>>;
    async fn save_bundle(&self, token: &str, bundle: &Value) -> Result<()>;
    async fn authenticate(&self, passkey: &str) -> Result<IssuedToken>;
    async fn verify(&self, token: &str) -> Result<()>;
    async fn logout(&self, token: &str) -> Result<()>;
}

/// Abstraction for the local per-field cache.
///
/// Entries are raw strings; callers decide what counts as well-formed.
#[async_trait]
pub trait ContentCache: Send + Sync + 'static {
    async fn get(&self, key: &str) -> Result<Option<String>>;
    async fn set(&self, key: &str, value: &str) -> Result<()>;
    async fn remove(&self, key: &str) -> Result<()>;
}
