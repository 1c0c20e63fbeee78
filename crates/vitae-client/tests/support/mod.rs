#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{Duration, Utc};
use parking_lot::Mutex;
use serde_json::Value;
use vitae_client::{ClientError, ContentApi, ContentCache, IssuedToken, Result};

pub const PASSKEY: &str = "lux-in-tenebris";
pub const TOKEN: &str = "0123456789abcdef0123456789abcdef0123456789abcdef0123456789abcdef";

/// In-process stand-in for the content server.
pub struct FakeApi {
    pub remote: Mutex<Result<Option<Value>>>,
    pub save_reply: Mutex<Result<()>>,
    pub saved: Mutex<Vec<(String, Value)>>,
    pub revoked: Mutex<Vec<String>>,
}

impl FakeApi {
    pub fn new(remote: Result<Option<Value>>) -> Self {
        Self {
            remote: Mutex::new(remote),
            save_reply: Mutex::new(Ok(())),
            saved: Mutex::new(Vec::new()),
            revoked: Mutex::new(Vec::new()),
        }
    }

    pub fn reply_to_save(&self, reply: Result<()>) {
        *self.save_reply.lock() = reply;
    }

    pub fn save_count(&self) -> usize {
        self.saved.lock().len()
    }
}

#[async_trait]
impl ContentApi for FakeApi {
    async fn fetch_bundle(&self) -> Result<Option<Value>> {
        self.remote.lock().clone()
    }

    async fn save_bundle(&self, token: &str, bundle: &Value) -> Result<()> {
        self.saved.lock().push((token.to_string(), bundle.clone()));
        self.save_reply.lock().clone()
    }

    async fn authenticate(&self, passkey: &str) -> Result<IssuedToken> {
        match passkey {
            "" => Err(ClientError::MissingPasskey),
            PASSKEY => Ok(IssuedToken {
                token: TOKEN.to_string(),
                expires_at: Utc::now() + Duration::hours(6),
            }),
            _ => Err(ClientError::InvalidPasskey),
        }
    }

    async fn verify(&self, token: &str) -> Result<()> {
        if token == TOKEN && !self.revoked.lock().iter().any(|t| t == token) {
            Ok(())
        } else {
            Err(ClientError::Unauthorized)
        }
    }

    async fn logout(&self, token: &str) -> Result<()> {
        self.revoked.lock().push(token.to_string());
        Ok(())
    }
}

/// A cache whose writes always fail.
#[derive(Default)]
pub struct ReadOnlyCache;

#[async_trait]
impl ContentCache for ReadOnlyCache {
    async fn get(&self, _key: &str) -> Result<Option<String>> {
        Ok(None)
    }

    async fn set(&self, key: &str, _value: &str) -> Result<()> {
        Err(ClientError::Cache(format!("{}: read-only", key)))
    }

    async fn remove(&self, _key: &str) -> Result<()> {
        Ok(())
    }
}
