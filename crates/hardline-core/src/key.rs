//! Key descriptors
//!
//! A [`KeyDescriptor`] carries just enough about a public key to answer
//! "which family is it, and how big". It never holds key material beyond
//! what is needed to compute the size.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Asymmetric key family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeyFamily {
    /// RSA, including RSASSA-PSS keys
    #[serde(rename = "RSA")]
    Rsa,
    /// Elliptic curve (ECDSA / ECDH)
    #[serde(rename = "EC")]
    Ec,
    /// DSA
    #[serde(rename = "DSA")]
    Dsa,
    /// Edwards / Montgomery curves (Ed25519, Ed448, X25519, X448)
    #[serde(rename = "EdDSA")]
    EdDsa,
    /// Anything else
    #[serde(rename = "other")]
    Other,
}

impl KeyFamily {
    /// Classify a JCA-style key algorithm name
    pub fn from_algorithm(name: &str) -> Self {
        match name.to_ascii_uppercase().as_str() {
            "RSA" | "RSASSA-PSS" | "RSAPSS" => KeyFamily::Rsa,
            "EC" | "ECDSA" | "ECDH" => KeyFamily::Ec,
            "DSA" => KeyFamily::Dsa,
            "ED25519" | "ED448" | "EDDSA" | "X25519" | "X448" | "XDH" => KeyFamily::EdDsa,
            _ => KeyFamily::Other,
        }
    }
}

impl fmt::Display for KeyFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            KeyFamily::Rsa => "RSA",
            KeyFamily::Ec => "EC",
            KeyFamily::Dsa => "DSA",
            KeyFamily::EdDsa => "EdDSA",
            KeyFamily::Other => "other",
        };
        f.write_str(name)
    }
}

/// Description of a public key handed to the algorithm constraints
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyDescriptor {
    algorithm: String,
    family: KeyFamily,
    size_bits: Option<u32>,
}

impl KeyDescriptor {
    /// Generic constructor; the family is derived from `algorithm`
    pub fn new(algorithm: impl Into<String>, size_bits: Option<u32>) -> Self {
        let algorithm = algorithm.into();
        let family = KeyFamily::from_algorithm(&algorithm);
        Self {
            algorithm,
            family,
            size_bits,
        }
    }

    /// RSA key with a known modulus bit length
    pub fn rsa(modulus_bits: u32) -> Self {
        Self {
            algorithm: "RSA".to_string(),
            family: KeyFamily::Rsa,
            size_bits: Some(modulus_bits),
        }
    }

    /// RSA key from its big-endian modulus bytes
    pub fn rsa_from_modulus(modulus: &[u8]) -> Self {
        Self::rsa(modulus_bit_length(modulus))
    }

    /// Elliptic curve key of the given field size
    pub fn ec(field_bits: u32) -> Self {
        Self {
            algorithm: "EC".to_string(),
            family: KeyFamily::Ec,
            size_bits: Some(field_bits),
        }
    }

    /// Key algorithm name, used as the identifier when none is supplied
    pub fn algorithm(&self) -> &str {
        &self.algorithm
    }

    /// Key family
    pub fn family(&self) -> KeyFamily {
        self.family
    }

    /// Key size in bits, if known
    pub fn size_bits(&self) -> Option<u32> {
        self.size_bits
    }
}

/// Bit length of a big-endian unsigned integer, ignoring leading zero bytes
/// (DER integers carry one when the top bit is set).
pub fn modulus_bit_length(modulus: &[u8]) -> u32 {
    let Some(first) = modulus.iter().position(|&b| b != 0) else {
        return 0;
    };
    let significant = &modulus[first..];
    let top_bits = 8 - significant[0].leading_zeros();
    (significant.len() as u32 - 1) * 8 + top_bits
}
