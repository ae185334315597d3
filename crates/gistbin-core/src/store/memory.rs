//! In-process gist store.

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::Mutex;

use super::{Gist, GistStore, Namespace};
use crate::error::StoreResult;

/// Gist store backed by a `HashMap`. Contents are lost on restart.
#[derive(Debug, Default)]
pub struct MemoryStore {
    gists: Mutex<HashMap<(Namespace, String), Gist>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored gists across all namespaces.
    pub fn len(&self) -> usize {
        self.gists.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.gists.lock().is_empty()
    }
}

#[async_trait]
impl GistStore for MemoryStore {
    async fn exists(&self, namespace: &Namespace, code: &str) -> StoreResult<bool> {
        Ok(self
            .gists
            .lock()
            .contains_key(&(namespace.clone(), code.to_string())))
    }

    async fn get(&self, namespace: &Namespace, code: &str) -> StoreResult<Option<Gist>> {
        Ok(self
            .gists
            .lock()
            .get(&(namespace.clone(), code.to_string()))
            .cloned())
    }

    async fn set(&self, namespace: &Namespace, code: &str, gist: Gist) -> StoreResult<()> {
        self.gists
            .lock()
            .insert((namespace.clone(), code.to_string()), gist);
        Ok(())
    }
}
