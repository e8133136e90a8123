//! Algorithm identifiers and parameters

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Case handling for substring matches on algorithm names
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchCase {
    /// Byte-for-byte match: `MD5` does not match `md5WithRSAEncryption`
    #[default]
    Sensitive,
    /// ASCII case-folded match
    Insensitive,
}

/// Name of an algorithm or algorithm family, e.g. `SHA256withRSA`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AlgorithmIdentifier(String);

impl AlgorithmIdentifier {
    /// Create an identifier from any string-like value
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// The name as given
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether `needle` occurs anywhere in the name
    pub fn contains(&self, needle: &str, case: MatchCase) -> bool {
        match case {
            MatchCase::Sensitive => self.0.contains(needle),
            MatchCase::Insensitive => self
                .0
                .to_ascii_lowercase()
                .contains(&needle.to_ascii_lowercase()),
        }
    }
}

impl fmt::Display for AlgorithmIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AlgorithmIdentifier {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for AlgorithmIdentifier {
    fn from(name: String) -> Self {
        Self(name)
    }
}

impl AsRef<str> for AlgorithmIdentifier {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Encoded algorithm parameters.
///
/// Carried through to the constraint object untouched; no current rule reads
/// them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AlgorithmParameters {
    encoded: Bytes,
}

impl AlgorithmParameters {
    /// Wrap DER (or otherwise encoded) parameters
    pub fn new(encoded: impl Into<Bytes>) -> Self {
        Self {
            encoded: encoded.into(),
        }
    }

    /// Raw encoding
    pub fn encoded(&self) -> &[u8] {
        &self.encoded
    }
}
