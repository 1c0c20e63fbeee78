//! Admin Authentication Module
//!
//! A single shared passkey gates every mutation. A successful passkey check
//! mints an opaque bearer token that lives in memory until its TTL elapses
//! or it is revoked. Nothing is persisted: a restart logs every admin out.

pub mod clock;
pub mod middleware;

pub use clock::{Clock, ManualClock, SystemClock};

use chrono::{DateTime, Duration, Utc};
use parking_lot::Mutex;
use rand::rngs::OsRng;
use rand::RngCore;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use subtle::ConstantTimeEq;
use tracing::{debug, info, warn};

/// Default lifetime of an admin token: six hours.
pub const DEFAULT_TOKEN_TTL_MS: i64 = 6 * 60 * 60 * 1000;

const TOKEN_BYTES: usize = 32;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    #[error("Admin key not configured")]
    Disabled,
    #[error("Missing passkey")]
    MissingPasskey,
    #[error("Invalid passkey")]
    InvalidPasskey,
    #[error("Unauthorized")]
    Unauthorized,
}

/// A freshly minted bearer token
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// In-memory token table with lazy expiry.
///
/// Expired entries are pruned inline on every verification; there is no
/// background sweeper.
pub struct TokenStore {
    clock: Arc<dyn Clock>,
    ttl: Duration,
    tokens: Mutex<HashMap<String, DateTime<Utc>>>,
}

impl TokenStore {
    pub fn new(clock: Arc<dyn Clock>, ttl: Duration) -> Self {
        Self {
            clock,
            ttl,
            tokens: Mutex::new(HashMap::new()),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Mint and record a new random token.
    pub fn issue(&self) -> IssuedToken {
        let mut bytes = [0u8; TOKEN_BYTES];
        OsRng.fill_bytes(&mut bytes);
        let token = hex::encode(bytes);
        let expires_at = self.clock.now() + self.ttl;

        self.tokens.lock().insert(token.clone(), expires_at);

        IssuedToken { token, expires_at }
    }

    /// True if the token is known and unexpired.
    pub fn verify(&self, token: &str) -> bool {
        let now = self.clock.now();
        let mut tokens = self.tokens.lock();

        let before = tokens.len();
        tokens.retain(|_, expires_at| *expires_at > now);
        let pruned = before - tokens.len();
        if pruned > 0 {
            debug!("[Auth] Pruned {} expired token(s)", pruned);
        }

        !token.is_empty() && tokens.contains_key(token)
    }

    /// Forget a token. Returns whether it was present.
    pub fn revoke(&self, token: &str) -> bool {
        self.tokens.lock().remove(token).is_some()
    }

    /// Number of tracked tokens, including expired ones not yet pruned.
    pub fn len(&self) -> usize {
        self.tokens.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Passkey check plus token bookkeeping for the admin surface.
pub struct AdminAuth {
    secret: Option<String>,
    tokens: TokenStore,
}

impl AdminAuth {
    /// Create the auth service. A missing or blank secret disables admin
    /// access entirely.
    pub fn new(secret: Option<String>, clock: Arc<dyn Clock>, ttl: Duration) -> Self {
        let secret = secret
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        if secret.is_none() {
            warn!("[Auth] ADMIN_KEY is not configured. Admin actions will be disabled.");
        }

        Self {
            secret,
            tokens: TokenStore::new(clock, ttl),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.secret.is_some()
    }

    pub fn tokens(&self) -> &TokenStore {
        &self.tokens
    }

    /// Exchange the shared passkey for a bearer token.
    pub fn authenticate(&self, passkey: &str) -> Result<IssuedToken, AuthError> {
        let secret = self.secret.as_deref().ok_or(AuthError::Disabled)?;

        if passkey.is_empty() {
            return Err(AuthError::MissingPasskey);
        }

        let matches: bool = passkey.as_bytes().ct_eq(secret.as_bytes()).into();
        if !matches {
            warn!("[Auth] Rejected admin passkey");
            return Err(AuthError::InvalidPasskey);
        }

        let issued = self.tokens.issue();
        info!("[Auth] Admin token issued, expires {}", issued.expires_at);
        Ok(issued)
    }

    pub fn verify(&self, token: &str) -> Result<(), AuthError> {
        if self.tokens.verify(token) {
            Ok(())
        } else {
            Err(AuthError::Unauthorized)
        }
    }

    pub fn revoke(&self, token: &str) {
        if self.tokens.revoke(token) {
            info!("[Auth] Admin token revoked");
        }
    }
}
