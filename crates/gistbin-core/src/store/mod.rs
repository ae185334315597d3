//! Gist persistence.
//!
//! The allocation protocol only needs three operations from a store:
//! existence check, lookup and unconditional write. Backends are
//! [`MemoryStore`] for tests and ephemeral deployments and [`SqliteStore`]
//! for durable storage.
//!
//! Stores give no multi-operation atomicity. `exists` followed by `set` can
//! interleave with another writer and the later `set` wins.

mod memory;
mod schema;
mod sqlite;

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::code::encode_code;
use crate::error::StoreResult;

pub use memory::MemoryStore;
pub use schema::SCHEMA_VERSION;
pub use sqlite::SqliteStore;

/// A stored gist. The code is the key and is not part of the record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Gist {
    pub content: String,
    pub name: String,
}

/// A gist joined with the code it is stored under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FullGist {
    pub content: String,
    pub name: String,
    pub code: String,
}

impl FullGist {
    pub fn new(code: impl Into<String>, gist: Gist) -> Self {
        Self {
            content: gist.content,
            name: gist.name,
            code: code.into(),
        }
    }
}

/// Partition of the code keyspace.
///
/// Codes are unique per namespace. An absent or empty directory is the
/// default namespace. Directory names are percent-encoded the same way as
/// codes so that create and lookup agree on the key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Namespace(Option<String>);

impl Namespace {
    /// The default (no directory) namespace.
    pub fn root() -> Self {
        Self(None)
    }

    /// Namespace for an optional directory name.
    pub fn from_directory(directory: Option<&str>) -> Self {
        match directory {
            Some(d) if !d.is_empty() => Self(Some(encode_code(d))),
            _ => Self(None),
        }
    }

    /// Encoded directory name, `None` for the default namespace.
    pub fn directory(&self) -> Option<&str> {
        self.0.as_deref()
    }

    /// Column value used by key-value backends; `""` for the default namespace.
    pub fn as_key(&self) -> &str {
        self.0.as_deref().unwrap_or("")
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            Some(dir) => write!(f, "directories/{dir}/gists"),
            None => f.write_str("gists"),
        }
    }
}

/// Storage backend for gists, keyed by namespace and code.
#[async_trait]
pub trait GistStore: Send + Sync {
    /// Whether a gist is stored under `code`.
    async fn exists(&self, namespace: &Namespace, code: &str) -> StoreResult<bool>;

    /// Fetch the gist stored under `code`.
    async fn get(&self, namespace: &Namespace, code: &str) -> StoreResult<Option<Gist>>;

    /// Store `gist` under `code`, replacing any existing record.
    async fn set(&self, namespace: &Namespace, code: &str, gist: Gist) -> StoreResult<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_directory_is_root() {
        assert_eq!(Namespace::from_directory(None), Namespace::root());
        assert_eq!(Namespace::from_directory(Some("")), Namespace::root());
        assert_eq!(Namespace::root().as_key(), "");
    }

    #[test]
    fn directory_is_encoded() {
        let ns = Namespace::from_directory(Some("team notes"));
        assert_eq!(ns.directory(), Some("team%20notes"));
        assert_eq!(ns.to_string(), "directories/team%20notes/gists");
        assert_eq!(Namespace::root().to_string(), "gists");
    }

    #[test]
    fn full_gist_serializes_with_code() {
        let full = FullGist::new(
            "Aabcdefg",
            Gist {
                content: "hello".into(),
                name: "greeting".into(),
            },
        );
        let json = serde_json::to_value(&full).unwrap();
        assert_eq!(json["content"], "hello");
        assert_eq!(json["name"], "greeting");
        assert_eq!(json["code"], "Aabcdefg");
    }
}
