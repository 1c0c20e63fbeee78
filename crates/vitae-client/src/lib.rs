//! Content client: startup hydration and the admin save pipeline.

pub mod cache;
pub mod config;
pub mod error;
pub mod hydrate;
pub mod native_network;
pub mod publish;
pub mod traits;

pub use cache::{FileCache, MemoryCache};
pub use config::ClientConfig;
pub use error::{ClientError, Result};
pub use hydrate::{hydrate, resolve_field, Hydration, Resolved, Source};
pub use native_network::NativeApi;
pub use publish::{AdminSession, CommitError, CommitOutcome, LiveContent, Publisher};
pub use traits::{ContentApi, ContentCache, IssuedToken};
