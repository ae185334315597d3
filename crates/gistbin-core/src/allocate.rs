//! Short code allocation.
//!
//! [`Allocator::create`] picks a code (the requested one, or a generated one),
//! validates the submission, checks the store and writes the gist. Generated
//! codes that collide are replaced by fresh ones up to `random_retries` times;
//! a colliding custom code fails immediately with
//! [`AllocationError::CodeTaken`].
//!
//! The existence check and the write are two separate store calls. Two
//! concurrent creates for the same free code can both pass the check, and the
//! second write replaces the first.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::code::{CodeGenerator, CodeKind, classify, encode_code};
use crate::error::AllocationError;
use crate::limits::Limits;
use crate::store::{Gist, GistStore, Namespace};
use crate::validate::validate_submission;

/// A create request as submitted by a client.
#[derive(Debug, Clone, Default)]
pub struct CreateGist {
    /// Gist body; required.
    pub content: Option<String>,
    /// Display name; defaults to the allocated code.
    pub name: Option<String>,
    /// Requested short code; a code is generated when absent or empty.
    pub code: Option<String>,
    /// Namespace to allocate in.
    pub namespace: Namespace,
}

impl CreateGist {
    /// Request with only content set, in the default namespace.
    pub fn content(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            ..Default::default()
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    pub fn in_namespace(mut self, namespace: Namespace) -> Self {
        self.namespace = namespace;
        self
    }
}

/// Wire form of an operation outcome: `text` is the code on success and the
/// error message on failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Completion {
    pub error: bool,
    pub text: String,
}

impl Completion {
    pub fn ok(text: impl Into<String>) -> Self {
        Self {
            error: false,
            text: text.into(),
        }
    }

    pub fn err(text: impl Into<String>) -> Self {
        Self {
            error: true,
            text: text.into(),
        }
    }
}

impl From<Result<String, AllocationError>> for Completion {
    fn from(result: Result<String, AllocationError>) -> Self {
        match result {
            Ok(code) => Self::ok(code),
            Err(e) => Self::err(e.to_string()),
        }
    }
}

/// Allocates codes and persists gists into a [`GistStore`].
pub struct Allocator<S: ?Sized> {
    store: Arc<S>,
    limits: Limits,
    generator: CodeGenerator,
}

impl<S: GistStore + ?Sized> Allocator<S> {
    pub fn new(store: Arc<S>, limits: Limits) -> Self {
        let generator = CodeGenerator::new(limits.random_code_length);
        Self {
            store,
            limits,
            generator,
        }
    }

    pub fn limits(&self) -> &Limits {
        &self.limits
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// Allocate a code for `request` and store the gist under it.
    pub async fn create(&self, request: CreateGist) -> Result<String, AllocationError> {
        let result = self.allocate(request).await;
        match &result {
            Ok(_) => metrics::counter!("gist_create_total").increment(1),
            Err(e) => {
                if let AllocationError::Store(err) = e {
                    tracing::error!(error = %err, "gist store failed during create");
                }
                metrics::counter!("gist_create_failures_total", "reason" => e.reason())
                    .increment(1);
            }
        }
        result
    }

    async fn allocate(&self, request: CreateGist) -> Result<String, AllocationError> {
        let CreateGist {
            content,
            name,
            code,
            namespace,
        } = request;

        let name = name.filter(|n| !n.is_empty());
        let mut requested = code.filter(|c| !c.is_empty());
        let mut retries_left = self.limits.random_retries;

        loop {
            let candidate = match requested.take() {
                Some(code) => encode_code(&code),
                None => self.generator.generate(),
            };
            let kind = classify(&candidate, self.generator.length());

            validate_submission(
                &self.limits,
                content.as_deref(),
                name.as_deref(),
                Some(&candidate),
            )?;

            if !self.store.exists(&namespace, &candidate).await? {
                let gist = Gist {
                    content: content.unwrap_or_default(),
                    name: name.unwrap_or_else(|| candidate.clone()),
                };
                self.store.set(&namespace, &candidate, gist).await?;
                tracing::info!(code = %candidate, namespace = %namespace, "gist created");
                return Ok(candidate);
            }

            metrics::counter!("gist_code_collisions_total").increment(1);

            match kind {
                CodeKind::Custom => {
                    tracing::debug!(code = %candidate, namespace = %namespace, "custom code taken");
                    return Err(AllocationError::CodeTaken);
                }
                CodeKind::Random if retries_left == 0 => {
                    tracing::debug!(namespace = %namespace, "random code retries exhausted");
                    return Err(AllocationError::RandomCodeExhausted);
                }
                CodeKind::Random => {
                    retries_left -= 1;
                    tracing::debug!(
                        code = %candidate,
                        namespace = %namespace,
                        retries_left,
                        "random code collided, regenerating"
                    );
                }
            }
        }
    }
}
