//! Cryptographic primitive tags

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// Class of cryptographic operation a constraint check is made for.
///
/// Advisory context only: it tells the constraint object why it is being
/// consulted, no rule branches on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CryptoPrimitive {
    /// Hash function
    MessageDigest,
    /// Random number generation
    SecureRandom,
    /// Symmetric block cipher
    BlockCipher,
    /// Symmetric stream cipher
    StreamCipher,
    /// Message authentication code
    Mac,
    /// Key wrapping
    KeyWrap,
    /// Asymmetric encryption
    PublicKeyEncryption,
    /// Signature generation or verification
    Signature,
    /// Key encapsulation
    KeyEncapsulation,
    /// Key agreement
    KeyAgreement,
}

/// Set of primitives handed to a single constraint check
pub type PrimitiveSet = BTreeSet<CryptoPrimitive>;

impl CryptoPrimitive {
    /// All primitive tags
    pub const ALL: [CryptoPrimitive; 10] = [
        CryptoPrimitive::MessageDigest,
        CryptoPrimitive::SecureRandom,
        CryptoPrimitive::BlockCipher,
        CryptoPrimitive::StreamCipher,
        CryptoPrimitive::Mac,
        CryptoPrimitive::KeyWrap,
        CryptoPrimitive::PublicKeyEncryption,
        CryptoPrimitive::Signature,
        CryptoPrimitive::KeyEncapsulation,
        CryptoPrimitive::KeyAgreement,
    ];

    /// Canonical lower-case name
    pub fn as_str(&self) -> &'static str {
        match self {
            CryptoPrimitive::MessageDigest => "message_digest",
            CryptoPrimitive::SecureRandom => "secure_random",
            CryptoPrimitive::BlockCipher => "block_cipher",
            CryptoPrimitive::StreamCipher => "stream_cipher",
            CryptoPrimitive::Mac => "mac",
            CryptoPrimitive::KeyWrap => "key_wrap",
            CryptoPrimitive::PublicKeyEncryption => "public_key_encryption",
            CryptoPrimitive::Signature => "signature",
            CryptoPrimitive::KeyEncapsulation => "key_encapsulation",
            CryptoPrimitive::KeyAgreement => "key_agreement",
        }
    }

    /// Single-element set, the common case for certificate checks
    pub fn only(self) -> PrimitiveSet {
        PrimitiveSet::from([self])
    }
}

impl fmt::Display for CryptoPrimitive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CryptoPrimitive {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        CryptoPrimitive::ALL
            .into_iter()
            .find(|p| p.as_str() == normalized)
            .ok_or_else(|| Error::InvalidArgument(format!("Unknown crypto primitive: {s}")))
    }
}
