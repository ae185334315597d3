//! Creator page and its static assets.

use axum::extract::State;
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use maud::Markup;

use crate::error::ApiError;
use crate::render;
use crate::state::AppState;

const INDEX_JS: &str = include_str!("../../assets/index.js");
const INDEX_CSS: &str = include_str!("../../assets/index.css");

/// `GET /`
pub async fn home_page(State(state): State<AppState>) -> Markup {
    render::home(&state.config.localization, &state.config.rate_limiter)
}

/// `GET /index.js`
///
/// The front-end script, prefixed with the validation limits so the form
/// can reject bad input before posting it.
pub async fn index_js(State(state): State<AppState>) -> Result<Response, ApiError> {
    let limits = serde_json::to_string(&state.config.validation)
        .map_err(|e| ApiError::Internal(e.into()))?;
    let script = format!("const LIMITS = {limits};\n{INDEX_JS}");

    Ok((
        [(header::CONTENT_TYPE, "text/javascript; charset=utf-8")],
        script,
    )
        .into_response())
}

/// `GET /index.css`
pub async fn index_css() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "text/css; charset=utf-8")], INDEX_CSS)
}

/// `GET /favicon.ico`
pub async fn favicon() -> impl IntoResponse {
    StatusCode::NOT_FOUND
}
