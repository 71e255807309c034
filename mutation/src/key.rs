//! Business-key generation.
//!
//! Patients and staff are keyed by a fixed prefix followed by random lowercase
//! hex. Keys are drawn before validation and never checked for collisions;
//! a clash surfaces as a unique violation from storage.

use rand::Rng;
use serde::Deserialize;

const HEX_DIGITS: &[u8; 16] = b"0123456789abcdef";

/// Prefix plus random hex suffix.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct KeyScheme {
    pub prefix: String,
    /// Number of hex characters after the prefix.
    pub hex_len: usize,
}

impl KeyScheme {
    pub fn new(prefix: impl Into<String>, hex_len: usize) -> Self {
        Self {
            prefix: prefix.into(),
            hex_len,
        }
    }

    /// Draw a fresh key.
    pub fn generate<R: Rng>(&self, rng: &mut R) -> String {
        let mut key = String::with_capacity(self.prefix.len() + self.hex_len);
        key.push_str(&self.prefix);
        for _ in 0..self.hex_len {
            key.push(HEX_DIGITS[rng.gen_range(0..HEX_DIGITS.len())] as char);
        }
        key
    }

    /// Whether `key` has this scheme's form.
    pub fn matches(&self, key: &str) -> bool {
        key.strip_prefix(self.prefix.as_str()).map_or(false, |suffix| {
            suffix.len() == self.hex_len
                && suffix.bytes().all(|b| HEX_DIGITS.contains(&b))
        })
    }
}
