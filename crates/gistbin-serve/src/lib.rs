//! Gistbin Serve - HTTP front end for creating and reading gists.
//!
//! Gists are small named pieces of text stored under a short code, optionally
//! inside a directory. Codes are either chosen by the client or generated at
//! random; see [`gistbin_core::Allocator`] for the allocation rules.
//!
//! # Architecture
//!
//! - **Config**: JSON file with defaults backfilled on startup
//! - **AppState**: Shared configuration, allocator, lookup cache and rate limiter
//! - **Rate limiting**: Fixed-window per-client limit applied to `POST /create`
//! - **Routes**: Creator page, create endpoint and the three lookup views

pub mod cache;
pub mod config;
mod error;
pub mod ratelimit;
mod render;
mod routes;
mod state;

pub use self::cache::{GistCache, get_or_fetch, new_cache};
pub use self::config::{Config, Localization, RateLimiterConfig, StoreConfig, StoreKind};
pub use self::error::ApiError;
pub use self::ratelimit::{ClientRateLimiter, limit_creates};
pub use self::routes::{CreateRequest, router};
pub use self::state::{AppState, open_store};
