//! Route definitions for the gist service.
//!
//! ## Routes
//!
//! - `GET /` - Creator page
//! - `GET /index.js`, `GET /index.css` - Creator page assets
//! - `GET /health` - Health check (JSON)
//! - `POST /create` - Create a gist (rate limited)
//! - `GET /{short_url}[/{directory}]` - Rendered gist
//! - `GET /data/{short_url}[/{directory}]` - Gist record as JSON
//! - `GET /raw/{short_url}[/{directory}]` - Gist content as plain text

mod create;
mod gist;
mod health;
mod home;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::middleware;
use axum::routing::{get, post};

use crate::ratelimit::limit_creates;
use crate::state::AppState;

pub use create::CreateRequest;

/// Largest accepted request body. Content length is enforced by validation;
/// this only bounds what is read off the wire.
const MAX_BODY_BYTES: usize = 50 * 1024 * 1024;

/// Build the complete router.
pub fn router(state: AppState) -> Router {
    let create = post(create::create_gist)
        .layer(middleware::from_fn_with_state(state.clone(), limit_creates));

    Router::new()
        .route("/", get(home::home_page))
        .route("/index.js", get(home::index_js))
        .route("/index.css", get(home::index_css))
        .route("/favicon.ico", get(home::favicon))
        .route("/health", get(health::health_check))
        .route("/create", create)
        .route("/data/{short_url}", get(gist::gist_data))
        .route("/data/{short_url}/{directory}", get(gist::gist_data))
        .route("/raw/{short_url}", get(gist::gist_raw))
        .route("/raw/{short_url}/{directory}", get(gist::gist_raw))
        .route("/{short_url}", get(gist::view_gist))
        .route("/{short_url}/{directory}", get(gist::view_gist))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .with_state(state)
}
