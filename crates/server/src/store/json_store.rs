//! Single-document JSON content store
//!
//! The whole site lives in one pretty-printed JSON file. Reads degrade to
//! "no content" on any corruption; writes validate first and replace the
//! file atomically via a temporary sibling and a rename.

use std::io;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info, warn};
use uuid::Uuid;
use vitae_common::{BundleViolations, ValidBundle};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("invalid content: {0}")]
    Invalid(BundleViolations),
    #[error("failed to serialize content: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("failed to write {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// File-backed store for the content bundle.
///
/// There is no application-level lock: concurrent saves race at the
/// filesystem and the last completed rename wins.
pub struct ContentStore {
    path: PathBuf,
}

impl ContentStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the stored bundle.
    ///
    /// Returns `None` when nothing has been saved yet, and also when the
    /// file is unreadable, not JSON, or fails validation. The reason is
    /// logged; it is never propagated.
    pub async fn load(&self) -> Option<ValidBundle> {
        let content = match fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!("[Store] No content at {:?}, using defaults", self.path);
                return None;
            }
            Err(e) => {
                warn!("[Store] Failed to read {:?}: {}", self.path, e);
                return None;
            }
        };

        let value: serde_json::Value = match serde_json::from_str(&content) {
            Ok(value) => value,
            Err(e) => {
                warn!("[Store] Persisted content at {:?} is not JSON: {}", self.path, e);
                return None;
            }
        };

        match ValidBundle::parse(value) {
            Ok(bundle) => Some(bundle),
            Err(violations) => {
                warn!(
                    "[Store] Invalid persisted content ignored: {:?}",
                    violations.messages()
                );
                None
            }
        }
    }

    /// Validate and persist a candidate bundle, replacing whatever was there.
    ///
    /// Nothing touches the disk unless validation passes.
    pub async fn save(&self, candidate: &serde_json::Value) -> Result<ValidBundle, StoreError> {
        let bundle = ValidBundle::parse(candidate.clone()).map_err(StoreError::Invalid)?;
        let json = serde_json::to_string_pretty(bundle.as_value())?;

        self.write_atomic(json.as_bytes()).await?;

        info!("[Store] Content saved to {:?}", self.path);
        Ok(bundle)
    }

    async fn write_atomic(&self, bytes: &[u8]) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await.map_err(io_err(parent))?;
            }
        }

        // Unique per save so concurrent writers never share a temp file
        let temp_path = self
            .path
            .with_extension(format!("{}.tmp", Uuid::new_v4().simple()));

        fs::write(&temp_path, bytes)
            .await
            .map_err(io_err(&temp_path))?;

        if let Err(e) = fs::rename(&temp_path, &self.path).await {
            let _ = fs::remove_file(&temp_path).await;
            return Err(io_err(&self.path)(e));
        }

        Ok(())
    }
}

fn io_err(path: &Path) -> impl FnOnce(io::Error) -> StoreError {
    let path = path.to_path_buf();
    move |source| StoreError::Io { path, source }
}
