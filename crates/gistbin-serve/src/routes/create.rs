//! Gist creation endpoint.

use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use gistbin_core::{Completion, CreateGist, Namespace};
use serde::Deserialize;
use serde_json::Value;

use crate::cache::cache_key;
use crate::state::AppState;

/// Body of `POST /create`. Every field is optional on the wire; a missing
/// `data` is reported as a validation failure, not a malformed request.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRequest {
    pub data: Option<String>,
    pub name: Option<String>,
    pub url_short: Option<String>,
    pub directory: Option<String>,
}

/// `POST /create`
///
/// Always answers 200 with `{error, text}`; `text` is the allocated code or
/// the failure message. The content type is not checked, and a body that is
/// not a JSON object is treated as empty.
pub async fn create_gist(State(state): State<AppState>, body: Bytes) -> Json<Completion> {
    let body = parse_body(&body);
    let namespace = Namespace::from_directory(body.directory.as_deref());
    let request = CreateGist {
        content: body.data,
        name: body.name,
        code: body.url_short,
        namespace: namespace.clone(),
    };

    let result = state.allocator.create(request).await;
    if let Ok(code) = &result {
        state.cache.invalidate(&cache_key(&namespace, code)).await;
    }

    Json(Completion::from(result))
}

fn parse_body(body: &[u8]) -> CreateRequest {
    if body.is_empty() {
        return CreateRequest::default();
    }
    let parsed = serde_json::from_slice::<Value>(body).and_then(|value| match value {
        Value::Object(_) => serde_json::from_value(value),
        _ => Err(serde::de::Error::custom("body is not a JSON object")),
    });
    parsed.unwrap_or_else(|e| {
        tracing::debug!(error = %e, "unusable create body, treating as empty");
        CreateRequest::default()
    })
}
