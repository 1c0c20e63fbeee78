//! Startup hydration.
//!
//! Every bundle field is resolved on its own through the same cascade:
//! the server's value if it validates, else the cached value if it
//! validates, else the compiled-in default. A bad value in one field never
//! affects another.

use crate::publish::LiveContent;
use crate::traits::{ContentApi, ContentCache};
use serde_json::{Map, Value};
use std::collections::HashMap;
use tracing::{debug, error, info, warn};
use vitae_common::{BundleField, ContentBundle};

/// Where a resolved field came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Source {
    Remote,
    Cache,
    Default,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Resolved {
    pub value: Value,
    pub source: Source,
}

/// Resolve one field. `remote` is the whole bundle returned by the server,
/// `default` is this field's compiled-in value.
pub async fn resolve_field(
    field: BundleField,
    remote: Option<&Value>,
    cache: &dyn ContentCache,
    default: &Value,
) -> Resolved {
    if let Some(value) = remote.and_then(|bundle| bundle.get(field.key())) {
        if field.accepts(value) {
            return Resolved {
                value: value.clone(),
                source: Source::Remote,
            };
        }
        warn!("[Hydrate] Remote {} failed validation", field.key());
    }

    if let Some(value) = read_cached(field, cache).await {
        return Resolved {
            value,
            source: Source::Cache,
        };
    }

    Resolved {
        value: default.clone(),
        source: Source::Default,
    }
}

async fn read_cached(field: BundleField, cache: &dyn ContentCache) -> Option<Value> {
    let key = field.cache_key();
    let raw = match cache.get(key).await {
        Ok(Some(raw)) => raw,
        Ok(None) => return None,
        Err(e) => {
            warn!("[Hydrate] Cache read for {} failed: {}", key, e);
            return None;
        }
    };

    match serde_json::from_str::<Value>(&raw) {
        Ok(value) if field.accepts(&value) => Some(value),
        Ok(_) => {
            purge(cache, key, "failed validation").await;
            None
        }
        Err(_) => {
            purge(cache, key, "is not valid JSON").await;
            None
        }
    }
}

async fn purge(cache: &dyn ContentCache, key: &str, reason: &str) {
    warn!("[Hydrate] Cached {} {}, purging", key, reason);
    if let Err(e) = cache.remove(key).await {
        warn!("[Hydrate] Failed to purge {}: {}", key, e);
    }
}

/// Result of startup hydration.
#[derive(Debug)]
pub struct Hydration {
    pub live: LiveContent,
    sources: HashMap<BundleField, Source>,
}

impl Hydration {
    pub fn source(&self, field: BundleField) -> Source {
        self.sources.get(&field).copied().unwrap_or(Source::Default)
    }

    pub fn sources(&self) -> &HashMap<BundleField, Source> {
        &self.sources
    }

    pub fn into_live(self) -> LiveContent {
        self.live
    }
}

/// Fetch the server bundle once and resolve every field.
///
/// A network failure, an unparsable response and a `null` body all mean
/// "no remote" for every field. Editing is only possible through the
/// returned [`LiveContent`], so nothing can be edited before this finishes.
pub async fn hydrate(
    api: &dyn ContentApi,
    cache: &dyn ContentCache,
    defaults: &ContentBundle,
) -> Hydration {
    let remote = match api.fetch_bundle().await {
        Ok(Some(bundle)) => Some(bundle),
        Ok(None) => {
            info!("[Hydrate] Server has no stored content");
            None
        }
        Err(e) => {
            warn!("[Hydrate] Failed to load server data: {}", e);
            None
        }
    };

    let default_bundle = defaults.to_value();
    let mut resolved = Map::new();
    let mut sources = HashMap::with_capacity(BundleField::ALL.len());

    for field in BundleField::ALL {
        let default = default_bundle
            .get(field.key())
            .cloned()
            .unwrap_or(Value::Null);
        let Resolved { value, source } =
            resolve_field(field, remote.as_ref(), cache, &default).await;

        debug!("[Hydrate] {} <- {:?}", field.key(), source);
        sources.insert(field, source);
        resolved.insert(field.key().to_string(), value);
    }

    let bundle = match serde_json::from_value::<ContentBundle>(Value::Object(resolved)) {
        Ok(bundle) => bundle,
        Err(e) => {
            error!("[Hydrate] Resolved content did not assemble, using defaults: {}", e);
            sources = BundleField::ALL
                .iter()
                .map(|field| (*field, Source::Default))
                .collect();
            defaults.clone()
        }
    };

    Hydration {
        live: LiveContent::new(bundle),
        sources,
    }
}
