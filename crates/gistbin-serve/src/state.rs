//! Application state shared across all request handlers.

use std::sync::Arc;

use gistbin_core::{Allocator, GistStore, MemoryStore, SqliteStore};

use crate::cache::{self, GistCache};
use crate::config::{Config, StoreConfig, StoreKind};
use crate::ratelimit::ClientRateLimiter;

/// Shared application state available to all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Arc<Config>,

    /// Allocates codes and writes gists; also owns the store handle.
    pub allocator: Arc<Allocator<dyn GistStore>>,

    /// Lookup cache keyed by namespace and code.
    pub cache: GistCache,

    /// Per-client limiter for create requests.
    pub limiter: Arc<ClientRateLimiter>,
}

impl AppState {
    /// Create application state over an already opened store.
    pub fn new(config: Config, store: Arc<dyn GistStore>) -> Self {
        let allocator = Allocator::new(store, config.validation.clone());
        let limiter = ClientRateLimiter::from_config(&config.rate_limiter);

        tracing::info!(
            cache_capacity = cache::DEFAULT_CACHE_CAPACITY,
            cache_ttl_secs = cache::DEFAULT_TTL.as_secs(),
            "application state initialized"
        );

        Self {
            config: Arc::new(config),
            allocator: Arc::new(allocator),
            cache: cache::new_cache(),
            limiter: Arc::new(limiter),
        }
    }

    /// Open the configured store and build state around it.
    pub fn open(config: Config) -> anyhow::Result<Self> {
        let store = open_store(&config.store)?;
        Ok(Self::new(config, store))
    }

    pub fn store(&self) -> &Arc<dyn GistStore> {
        self.allocator.store()
    }
}

/// Open the gist store selected by `config`.
pub fn open_store(config: &StoreConfig) -> anyhow::Result<Arc<dyn GistStore>> {
    match config.kind {
        StoreKind::Sqlite => {
            let store = SqliteStore::open(&config.path).map_err(|e| {
                anyhow::anyhow!("failed to open gist database {}: {e}", config.path.display())
            })?;
            Ok(Arc::new(store))
        }
        StoreKind::Memory => {
            tracing::warn!("using in-memory gist store; gists are lost on restart");
            Ok(Arc::new(MemoryStore::new()))
        }
    }
}
