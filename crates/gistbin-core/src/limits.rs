//! Validation and code-generation limits.
//!
//! This is the `validation` section of the service configuration file. Field
//! names on the wire keep the historical `ShortUrl` spelling.

use serde::{Deserialize, Serialize};

/// Default maximum short code length.
pub const DEFAULT_MAX_SHORT_CODE_LENGTH: usize = 128;

/// Default maximum content length (512 KiB).
pub const DEFAULT_MAX_CONTENT_LENGTH: usize = 512 * 1024;

/// Default minimum length of a custom short code.
pub const DEFAULT_MIN_SHORT_CODE_LENGTH: usize = 5;

/// Default number of regenerations after a random code collides.
pub const DEFAULT_RANDOM_RETRIES: u32 = 5;

/// Default length of a generated code, marker included.
pub const DEFAULT_RANDOM_CODE_LENGTH: usize = 8;

/// Default maximum display name length.
pub const DEFAULT_MAX_NAME_LENGTH: usize = 64;

/// Limits applied to every create request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Limits {
    /// Longest accepted short code, after percent-encoding.
    #[serde(rename = "maxShortUrlLength")]
    pub max_short_code_length: usize,

    /// Longest accepted content.
    #[serde(rename = "maxContentLength")]
    pub max_content_length: usize,

    /// Shortest accepted short code.
    #[serde(rename = "minShortUrlLength")]
    pub min_short_code_length: usize,

    /// How many fresh codes to try after a generated code collides.
    #[serde(rename = "randomRetries")]
    pub random_retries: u32,

    /// Length of generated codes, including the marker character.
    #[serde(rename = "randomShortUrlLength")]
    pub random_code_length: usize,

    /// Longest accepted display name.
    #[serde(rename = "maxNameLength")]
    pub max_name_length: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_short_code_length: DEFAULT_MAX_SHORT_CODE_LENGTH,
            max_content_length: DEFAULT_MAX_CONTENT_LENGTH,
            min_short_code_length: DEFAULT_MIN_SHORT_CODE_LENGTH,
            random_retries: DEFAULT_RANDOM_RETRIES,
            random_code_length: DEFAULT_RANDOM_CODE_LENGTH,
            max_name_length: DEFAULT_MAX_NAME_LENGTH,
        }
    }
}
