//! In-memory gist lookup cache with moka.
//!
//! Gists never change after creation, so a found gist can be served from
//! memory until it ages out. Misses are not cached: a code that is free now
//! may be allocated a moment later. Creates invalidate their key, which also
//! covers the rare case of a racing create overwriting a stored gist.
//!
//! ## Cache Key Strategy
//!
//! `{directory}/{code}` with both parts percent-encoded, so the separator
//! cannot appear inside either part. The default namespace has an empty
//! directory.

use std::time::Duration;

use gistbin_core::{FullGist, GistStore, Namespace};
use moka::future::Cache;

use crate::error::ApiError;

/// Default cache capacity (number of gists).
pub const DEFAULT_CACHE_CAPACITY: u64 = 10_000;

/// Default TTL for cached gists.
pub const DEFAULT_TTL: Duration = Duration::from_secs(3600);

/// Cached gist with metadata.
#[derive(Clone, Debug)]
pub struct CachedGist {
    pub gist: FullGist,
    /// When this entry was cached.
    pub cached_at: chrono::DateTime<chrono::Utc>,
}

/// Type alias for the gist cache.
pub type GistCache = Cache<String, CachedGist>;

/// Create a new gist cache with default settings.
pub fn new_cache() -> GistCache {
    Cache::builder()
        .max_capacity(DEFAULT_CACHE_CAPACITY)
        .time_to_live(DEFAULT_TTL)
        .build()
}

pub fn cache_key(namespace: &Namespace, code: &str) -> String {
    format!("{}/{}", namespace.as_key(), code)
}

/// Look up a gist, serving from the cache when possible.
pub async fn get_or_fetch(
    cache: &GistCache,
    store: &dyn GistStore,
    namespace: &Namespace,
    code: &str,
) -> Result<Option<FullGist>, ApiError> {
    let key = cache_key(namespace, code);

    if let Some(entry) = cache.get(&key).await {
        tracing::debug!(key = %key, cached_at = %entry.cached_at, "cache hit");
        metrics::counter!("gist_lookups_total", "result" => "cached").increment(1);
        return Ok(Some(entry.gist));
    }

    let gist = match store.get(namespace, code).await {
        Ok(gist) => gist,
        Err(e) => {
            metrics::counter!("gist_lookups_total", "result" => "error").increment(1);
            return Err(e.into());
        }
    };

    let Some(gist) = gist else {
        tracing::debug!(key = %key, "gist not found");
        metrics::counter!("gist_lookups_total", "result" => "miss").increment(1);
        return Ok(None);
    };

    metrics::counter!("gist_lookups_total", "result" => "hit").increment(1);
    let full = FullGist::new(code, gist);
    cache
        .insert(
            key,
            CachedGist {
                gist: full.clone(),
                cached_at: chrono::Utc::now(),
            },
        )
        .await;

    Ok(Some(full))
}
