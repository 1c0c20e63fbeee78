//! Shared content model, schema validation and directory management for
//! Arcanum Vitae
//!
//! Directory layout:
//! ```text
//! vitae_data/
//! ├── data/            # Server-side content document (db.json)
//! └── cache/           # Client-side content cache, one file per field
//! ```

pub mod defaults;
pub mod model;
pub mod schema;

pub use model::ContentBundle;
pub use schema::{validate_bundle, BundleField, BundleViolations, ValidBundle, ValidationError};

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct VitaeConfig {
    vitae_root: Option<PathBuf>,
}

/// Get the global configuration path
fn get_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("arcanum_vitae").join("config.json"))
}

/// Load the persistent root from config file
pub fn load_persistent_root() -> Option<PathBuf> {
    let path = get_config_path()?;
    if !path.exists() {
        return None;
    }

    match fs::read_to_string(&path) {
        Ok(content) => match serde_json::from_str::<VitaeConfig>(&content) {
            Ok(config) => config.vitae_root,
            Err(e) => {
                warn!("Failed to parse config file at {:?}: {}", path, e);
                None
            }
        },
        Err(e) => {
            warn!("Failed to read config file at {:?}: {}", path, e);
            None
        }
    }
}

/// Get the VITAE_ROOT directory from environment, persistent config, or default
pub fn vitae_root() -> PathBuf {
    if let Ok(val) = std::env::var("VITAE_ROOT") {
        return PathBuf::from(val);
    }

    if let Some(root) = load_persistent_root() {
        return root;
    }

    PathBuf::from("vitae_data")
}

/// Server-side data directory
pub fn data_dir() -> PathBuf {
    vitae_root().join("data")
}

/// Default location of the persisted content document
pub fn data_path() -> PathBuf {
    data_dir().join("db.json")
}

/// Client-side cache directory
pub fn cache_dir() -> PathBuf {
    vitae_root().join("cache")
}

/// Ensure a single directory exists
pub fn ensure_dir(path: &Path) -> anyhow::Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)?;
        info!("Created directory: {:?}", path);
    }
    Ok(())
}

/// Ensure a file's parent directory exists
pub fn ensure_parent(path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            ensure_dir(parent)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths_hang_off_root() {
        let root = vitae_root();
        assert!(data_path().starts_with(&root));
        assert!(data_path().ends_with("data/db.json"));
        assert!(cache_dir().starts_with(&root));
    }

    #[test]
    fn test_ensure_parent_creates_nested_dirs() {
        let tmp = tempfile::tempdir().unwrap();
        let file = tmp.path().join("a").join("b").join("db.json");
        ensure_parent(&file).unwrap();
        assert!(file.parent().unwrap().is_dir());
    }

    #[test]
    fn test_ensure_parent_accepts_bare_file_name() {
        ensure_parent(Path::new("db.json")).unwrap();
    }
}
