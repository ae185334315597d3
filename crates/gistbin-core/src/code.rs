//! Short code generation, encoding and classification.
//!
//! Generated codes are the marker character followed by characters drawn
//! uniformly from [`ALPHABET`]. Any code of the configured length with that
//! shape is treated as generated; everything else is a custom code.

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use rand::Rng;

/// Characters a generated code is drawn from (59 of them: no `I`, `i` or `l`).
pub const ALPHABET: &[u8] = b"ABCDEFGHJKLMNOPQRSTUVWXYZabcdefghjkmnopqrstuvwxyz0123456789";

/// First character of every generated code.
pub const RANDOM_MARKER: char = 'A';

/// Characters left unescaped in storage keys: the `encodeURIComponent` set.
const CODE_KEY_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Which namespace of codes a candidate belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodeKind {
    /// Shaped like a generated code; collisions are retried.
    Random,
    /// Anything else; collisions are final.
    Custom,
}

/// Percent-encode a code for use as a storage key.
pub fn encode_code(code: &str) -> String {
    utf8_percent_encode(code, CODE_KEY_SET).to_string()
}

/// Classify an encoded code given the configured generated-code length.
///
/// A user-supplied code with the generated shape is classified as
/// [`CodeKind::Random`]; there is no way to tell the two apart.
pub fn classify(code: &str, random_length: usize) -> CodeKind {
    let is_random = code.len() == random_length
        && code.starts_with(RANDOM_MARKER)
        && code[RANDOM_MARKER.len_utf8()..]
            .bytes()
            .all(|b| b.is_ascii_alphanumeric());

    if is_random {
        CodeKind::Random
    } else {
        CodeKind::Custom
    }
}

/// Draw `n` characters uniformly, with replacement, from [`ALPHABET`].
pub fn random_string<R: Rng + ?Sized>(rng: &mut R, n: usize) -> String {
    (0..n)
        .map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())] as char)
        .collect()
}

/// Produces marker-prefixed random codes of a fixed length.
#[derive(Debug, Clone, Copy)]
pub struct CodeGenerator {
    length: usize,
}

impl CodeGenerator {
    /// Create a generator for codes of `length` characters, marker included.
    pub fn new(length: usize) -> Self {
        Self { length }
    }

    /// Total length of generated codes.
    pub fn length(&self) -> usize {
        self.length
    }

    /// Generate a code using the thread-local RNG.
    pub fn generate(&self) -> String {
        self.generate_with(&mut rand::thread_rng())
    }

    /// Generate a code using the given RNG.
    pub fn generate_with<R: Rng + ?Sized>(&self, rng: &mut R) -> String {
        let mut code = String::with_capacity(self.length);
        code.push(RANDOM_MARKER);
        code.push_str(&random_string(rng, self.length.saturating_sub(1)));
        code
    }
}
