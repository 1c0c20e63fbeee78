//! Admin save pipeline.
//!
//! Edits happen on a working copy taken from [`LiveContent`]. A commit
//! validates locally, sends the copy under the admin's bearer token, and
//! only replaces live state once the server has accepted it.

use crate::error::ClientError;
use crate::traits::{ContentApi, ContentCache, IssuedToken};
use chrono::{DateTime, Utc};
use serde_json::Value;
use std::sync::Arc;
use tracing::{info, warn};
use vitae_common::{validate_bundle, BundleField, ContentBundle};

/// The last-known-good content, as shown to visitors.
///
/// Only [`crate::hydrate::hydrate`] creates one.
#[derive(Debug, Clone, PartialEq)]
pub struct LiveContent {
    bundle: ContentBundle,
}

impl LiveContent {
    pub(crate) fn new(bundle: ContentBundle) -> Self {
        Self { bundle }
    }

    pub fn bundle(&self) -> &ContentBundle {
        &self.bundle
    }

    /// An isolated copy to edit. Changes to it never reach live state until
    /// committed.
    pub fn working_copy(&self) -> ContentBundle {
        self.bundle.clone()
    }

    fn replace(&mut self, bundle: ContentBundle) {
        self.bundle = bundle;
    }
}

/// Client-side admin login state.
#[derive(Debug, Default)]
pub struct AdminSession {
    issued: Option<IssuedToken>,
}

impl AdminSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(issued: IssuedToken) -> Self {
        Self {
            issued: Some(issued),
        }
    }

    pub async fn login(&mut self, api: &dyn ContentApi, passkey: &str) -> Result<(), ClientError> {
        let issued = api.authenticate(passkey).await?;
        info!("[Publish] Admin session opened, expires {}", issued.expires_at);
        self.issued = Some(issued);
        Ok(())
    }

    /// Revoke the token on the server and forget it locally. The local
    /// session is cleared even if the server call fails.
    pub async fn logout(&mut self, api: &dyn ContentApi) {
        if let Some(issued) = self.issued.take() {
            if let Err(e) = api.logout(&issued.token).await {
                warn!("[Publish] Server logout failed: {}", e);
            }
        }
    }

    /// Ask the server whether the token is still good. A rejected token is
    /// discarded.
    pub async fn verify(&mut self, api: &dyn ContentApi) -> bool {
        let Some(token) = self.token().map(str::to_string) else {
            return false;
        };
        match api.verify(&token).await {
            Ok(()) => true,
            Err(ClientError::Unauthorized) => {
                self.discard();
                false
            }
            Err(e) => {
                warn!("[Publish] Token check failed: {}", e);
                false
            }
        }
    }

    pub fn token(&self) -> Option<&str> {
        self.token_at(Utc::now())
    }

    pub fn token_at(&self, now: DateTime<Utc>) -> Option<&str> {
        self.issued
            .as_ref()
            .filter(|issued| issued.expires_at > now)
            .map(|issued| issued.token.as_str())
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.issued.as_ref().map(|issued| issued.expires_at)
    }

    pub fn is_authenticated(&self) -> bool {
        self.token().is_some()
    }

    pub fn discard(&mut self) {
        self.issued = None;
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CommitError {
    #[error("Invalid content: {}", .0.join("; "))]
    Invalid(Vec<String>),
    #[error("Not authenticated")]
    NotAuthenticated,
    #[error("Access denied")]
    AccessDenied,
    #[error("Rejected by server: {}", .0.join("; "))]
    Rejected(Vec<String>),
    #[error("Server error: {0}")]
    ServerFailure(String),
}

/// What the admin is told after a failed commit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitOutcome {
    AccessDenied,
    PayloadInvalid,
    ServerError,
}

impl CommitError {
    pub fn outcome(&self) -> CommitOutcome {
        match self {
            CommitError::NotAuthenticated | CommitError::AccessDenied => CommitOutcome::AccessDenied,
            CommitError::Invalid(_) | CommitError::Rejected(_) => CommitOutcome::PayloadInvalid,
            CommitError::ServerFailure(_) => CommitOutcome::ServerError,
        }
    }
}

pub struct Publisher {
    api: Arc<dyn ContentApi>,
    cache: Arc<dyn ContentCache>,
}

impl Publisher {
    pub fn new(api: Arc<dyn ContentApi>, cache: Arc<dyn ContentCache>) -> Self {
        Self { api, cache }
    }

    pub async fn commit(
        &self,
        live: &mut LiveContent,
        working: ContentBundle,
        session: &mut AdminSession,
    ) -> Result<(), CommitError> {
        let payload = working.to_value();
        if let Err(violations) = validate_bundle(&payload) {
            warn!("[Publish] Refusing to send invalid content: {}", violations);
            return Err(CommitError::Invalid(violations.messages()));
        }

        let token = session
            .token()
            .ok_or(CommitError::NotAuthenticated)?
            .to_string();

        match self.api.save_bundle(&token, &payload).await {
            Ok(()) => {}
            Err(ClientError::Unauthorized) => {
                warn!("[Publish] Token rejected, clearing session");
                session.discard();
                return Err(CommitError::AccessDenied);
            }
            Err(ClientError::Rejected(details)) => return Err(CommitError::Rejected(details)),
            Err(e) => return Err(CommitError::ServerFailure(e.to_string())),
        }

        live.replace(working);
        self.mirror(&payload).await;
        info!("[Publish] Content committed");
        Ok(())
    }

    async fn mirror(&self, payload: &Value) {
        for field in BundleField::ALL {
            let Some(value) = payload.get(field.key()) else {
                continue;
            };
            let raw = value.to_string();
            if let Err(e) = self.cache.set(field.cache_key(), &raw).await {
                warn!("[Publish] Failed to cache {}: {}", field.cache_key(), e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn issued(expires_in: Duration) -> IssuedToken {
        IssuedToken {
            token: "a".repeat(64),
            expires_at: Utc::now() + expires_in,
        }
    }

    #[test]
    fn test_working_copy_is_isolated() {
        let live = LiveContent::new(vitae_common::defaults::content_bundle());
        let mut working = live.working_copy();
        working.human_manifesto = "edited".to_string();
        working.albums.clear();

        assert_ne!(live.bundle().human_manifesto, "edited");
        assert!(!live.bundle().albums.is_empty());
    }

    #[test]
    fn test_session_token_expires_locally() {
        let session = AdminSession::with_token(issued(Duration::hours(1)));
        assert!(session.is_authenticated());

        let later = Utc::now() + Duration::hours(2);
        assert_eq!(session.token_at(later), None);
    }

    #[test]
    fn test_expired_session_has_no_token() {
        let session = AdminSession::with_token(issued(Duration::seconds(-1)));
        assert!(!session.is_authenticated());
        assert!(session.expires_at().is_some());
    }

    #[test]
    fn test_outcomes() {
        assert_eq!(CommitError::NotAuthenticated.outcome(), CommitOutcome::AccessDenied);
        assert_eq!(CommitError::AccessDenied.outcome(), CommitOutcome::AccessDenied);
        assert_eq!(CommitError::Invalid(vec![]).outcome(), CommitOutcome::PayloadInvalid);
        assert_eq!(CommitError::Rejected(vec![]).outcome(), CommitOutcome::PayloadInvalid);
        assert_eq!(
            CommitError::ServerFailure("boom".into()).outcome(),
            CommitOutcome::ServerError
        );
    }
}
