//! Gist lookup endpoints: rendered view, JSON record and raw content.
//!
//! Each is routed with and without a trailing directory segment. Path
//! segments arrive percent-decoded and are re-encoded before lookup so they
//! match the stored key.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use gistbin_core::{FullGist, Namespace, encode_code};
use serde::Deserialize;

use crate::cache::get_or_fetch;
use crate::error::ApiError;
use crate::render;
use crate::state::AppState;

/// Cache-Control for found gists; they never change after creation.
const FOUND_CACHE_CONTROL: &str = "public, max-age=300";

#[derive(Debug, Clone, Deserialize)]
pub struct GistPath {
    pub short_url: String,
    pub directory: Option<String>,
}

async fn lookup(state: &AppState, path: &GistPath) -> Result<Option<FullGist>, ApiError> {
    let namespace = Namespace::from_directory(path.directory.as_deref());
    let code = encode_code(&path.short_url);
    get_or_fetch(&state.cache, state.store().as_ref(), &namespace, &code).await
}

fn with_cache_control(mut response: Response) -> Response {
    response.headers_mut().insert(
        header::CACHE_CONTROL,
        HeaderValue::from_static(FOUND_CACHE_CONTROL),
    );
    response
}

fn plain_text(status: StatusCode, text: String) -> Response {
    (
        status,
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        text,
    )
        .into_response()
}

/// `GET /{short_url}` and `GET /{short_url}/{directory}`
pub async fn view_gist(
    State(state): State<AppState>,
    Path(path): Path<GistPath>,
) -> Result<Response, ApiError> {
    let loc = &state.config.localization;
    let mut response = match lookup(&state, &path).await? {
        Some(gist) => {
            let page = render::gist_view(loc, &gist, path.directory.as_deref());
            with_cache_control(page.into_response())
        }
        None => (StatusCode::NOT_FOUND, render::not_found(loc)).into_response(),
    };

    response.headers_mut().insert(
        header::X_CONTENT_TYPE_OPTIONS,
        HeaderValue::from_static("nosniff"),
    );
    Ok(response)
}

/// `GET /data/{short_url}` and `GET /data/{short_url}/{directory}`
///
/// The stored record as JSON, or the text `undefined` with a 404.
pub async fn gist_data(
    State(state): State<AppState>,
    Path(path): Path<GistPath>,
) -> Result<Response, ApiError> {
    Ok(match lookup(&state, &path).await? {
        Some(gist) => with_cache_control(Json(gist).into_response()),
        None => plain_text(StatusCode::NOT_FOUND, "undefined".to_string()),
    })
}

/// `GET /raw/{short_url}` and `GET /raw/{short_url}/{directory}`
///
/// Only the content, as plain text.
pub async fn gist_raw(
    State(state): State<AppState>,
    Path(path): Path<GistPath>,
) -> Result<Response, ApiError> {
    Ok(match lookup(&state, &path).await? {
        Some(gist) => with_cache_control(plain_text(StatusCode::OK, gist.content)),
        None => plain_text(StatusCode::NOT_FOUND, "404 Not found".to_string()),
    })
}
