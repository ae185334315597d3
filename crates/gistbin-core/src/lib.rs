//! Core types for gistbin: validation, short code allocation and storage.
//!
//! This crate provides:
//! - Submission validation against configured [`Limits`]
//! - Random code generation and custom/random code classification
//! - The [`GistStore`] trait with in-memory and SQLite backends
//! - The [`Allocator`], which turns a create request into a stored gist
//! - Prometheus metrics helpers
//!
//! # Allocation
//!
//! ```text
//! request ─► pick code ─► encode + classify ─► validate ─► exists? ─┬─ no ─► set ─► code
//!               ▲                                                   │
//!               └──────────── random code, retries left ◄───────────┘ yes
//! ```

mod allocate;
pub mod code;
mod error;
mod limits;
pub mod metrics;
pub mod store;
mod validate;

pub use allocate::{Allocator, Completion, CreateGist};
pub use code::{CodeGenerator, CodeKind, classify, encode_code};
pub use error::{AllocationError, StoreError, StoreResult, ValidationError};
pub use limits::Limits;
pub use store::{FullGist, Gist, GistStore, MemoryStore, Namespace, SqliteStore};
pub use validate::validate_submission;
