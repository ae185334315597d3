//! Service configuration loaded from a JSON file.
//!
//! Every key has a default. On startup the file is read, any missing keys are
//! filled in from the defaults, and the completed file is written back so
//! operators can see every option. Unknown keys are left untouched.

use std::path::{Path, PathBuf};

use anyhow::Context;
use gistbin_core::Limits;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Config {
    /// Validation and code generation limits.
    pub validation: Limits,

    /// Per-client limit on create requests.
    pub rate_limiter: RateLimiterConfig,

    /// TCP port to listen on.
    pub port: u16,

    /// Interface to bind (e.g., "0.0.0.0").
    pub host: String,

    /// Gist storage backend.
    pub store: StoreConfig,

    /// Port for the Prometheus exporter; 0 disables it.
    pub metrics_port: u16,

    /// User-facing strings for the HTML pages.
    pub localization: Localization,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            validation: Limits::default(),
            rate_limiter: RateLimiterConfig::default(),
            port: 8008,
            host: "0.0.0.0".to_string(),
            store: StoreConfig::default(),
            metrics_port: 0,
            localization: Localization::default(),
        }
    }
}

/// Fixed-window rate limit applied per client to `POST /create`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RateLimiterConfig {
    /// Window length in seconds.
    pub window: u64,
    /// Requests allowed per window.
    pub amount: u32,
}

impl Default for RateLimiterConfig {
    fn default() -> Self {
        Self {
            window: 300,
            amount: 30,
        }
    }
}

/// Which [`gistbin_core::GistStore`] backend to open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreKind {
    Sqlite,
    Memory,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub kind: StoreKind,
    /// Database file for the SQLite backend.
    pub path: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            kind: StoreKind::Sqlite,
            path: PathBuf::from("./data/gists.db"),
        }
    }
}

/// Strings shown on the HTML pages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Localization {
    #[serde(rename = "loc-name-box-p")]
    pub name_placeholder: String,
    #[serde(rename = "loc-long-data-box-p")]
    pub content_placeholder: String,
    #[serde(rename = "loc-surl-box-p")]
    pub code_placeholder: String,
    #[serde(rename = "loc-create-button")]
    pub create_button: String,
    #[serde(rename = "loc-surl-out-box-p")]
    pub result_placeholder: String,
    /// Notice with `%1` (amount) and `%2` (window in minutes) placeholders.
    #[serde(rename = "loc-rate-limits")]
    pub rate_limits: String,
    #[serde(rename = "loc-name")]
    pub creator_title: String,
    #[serde(rename = "loc-view-name")]
    pub view_title: String,
    #[serde(rename = "loc-edit-button")]
    pub edit_button: String,
    #[serde(rename = "loc-not-found")]
    pub not_found: String,
}

impl Default for Localization {
    fn default() -> Self {
        Self {
            name_placeholder: "Name".to_string(),
            content_placeholder: "Enter your text here".to_string(),
            code_placeholder: "Leave empty to get random url".to_string(),
            create_button: "Create".to_string(),
            result_placeholder: "Here will be your gist url".to_string(),
            rate_limits: "Rate limits apply: %1 gists in %2 minutes".to_string(),
            creator_title: "Gist Creator".to_string(),
            view_title: "Gist View".to_string(),
            edit_button: "Edit Gist".to_string(),
            not_found: "Gist not found".to_string(),
        }
    }
}

impl Localization {
    /// Rate limit notice with the placeholders filled in.
    pub fn rate_limit_notice(&self, limiter: &RateLimiterConfig) -> String {
        let minutes = limiter.window as f64 / 60.0;
        self.rate_limits
            .replace("%1", &limiter.amount.to_string())
            .replace("%2", &minutes.to_string())
    }
}

impl Config {
    /// Address to bind the HTTP listener to.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Load configuration from `path`, backfilling and writing back missing keys.
    ///
    /// A missing file is treated as empty. Failing to write the completed file
    /// is logged and otherwise ignored.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let mut value = match std::fs::read_to_string(path) {
            Ok(raw) => serde_json::from_str::<Value>(&raw)
                .with_context(|| format!("invalid JSON in {}", path.display()))?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Value::Object(Default::default()),
            Err(e) => {
                return Err(e).with_context(|| format!("failed to read {}", path.display()));
            }
        };

        if !value.is_object() {
            anyhow::bail!("{} must contain a JSON object", path.display());
        }

        let defaults = serde_json::to_value(Config::default())?;
        if backfill(&mut value, &defaults) {
            if let Err(e) = write_config(path, &value) {
                tracing::warn!(path = %path.display(), error = %e, "failed to write backfilled config");
            }
        }

        let config: Config = serde_json::from_value(value)
            .with_context(|| format!("invalid configuration in {}", path.display()))?;

        tracing::info!(
            path = %path.display(),
            bind_addr = %config.bind_addr(),
            store = ?config.store.kind,
            rate_limit_amount = config.rate_limiter.amount,
            rate_limit_window_secs = config.rate_limiter.window,
            random_retries = config.validation.random_retries,
            "configuration loaded"
        );

        Ok(config)
    }
}

/// Copy keys present in `defaults` but missing from `target`, recursively.
///
/// Returns whether anything was added.
fn backfill(target: &mut Value, defaults: &Value) -> bool {
    let (Value::Object(target), Value::Object(defaults)) = (target, defaults) else {
        return false;
    };

    let mut changed = false;
    for (key, default) in defaults {
        match target.get_mut(key) {
            Some(existing) => changed |= backfill(existing, default),
            None => {
                target.insert(key.clone(), default.clone());
                changed = true;
            }
        }
    }
    changed
}

fn write_config(path: &Path, value: &Value) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, serde_json::to_string_pretty(value)? + "\n")?;
    Ok(())
}
