//! Rejection rules

use hardline_core::{AlgorithmIdentifier, KeyDescriptor, KeyFamily, MatchCase};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single rejection rule.
///
/// Rules only ever reject; a request no rule rejects is permitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum Rule {
    /// Reject any algorithm whose name contains `token`
    DisabledToken {
        /// Substring to look for, e.g. `MD5`
        token: String,
        /// How the substring is compared
        #[serde(default)]
        case: MatchCase,
    },

    /// Reject keys of `family` shorter than `bits`
    MinimumKeySize {
        /// Key family the minimum applies to
        family: KeyFamily,
        /// Smallest accepted size in bits
        bits: u32,
    },
}

impl Rule {
    /// Reject MD5-based algorithms
    pub fn weak_digest(case: MatchCase) -> Self {
        Rule::DisabledToken {
            token: "MD5".to_string(),
            case,
        }
    }

    /// Reject RSA keys with a modulus shorter than `bits`
    pub fn minimum_rsa_key_size(bits: u32) -> Self {
        Rule::MinimumKeySize {
            family: KeyFamily::Rsa,
            bits,
        }
    }

    /// Short name used in logs
    pub fn kind(&self) -> &'static str {
        match self {
            Rule::DisabledToken { .. } => "disabled_token",
            Rule::MinimumKeySize { .. } => "minimum_key_size",
        }
    }

    /// Whether this rule rejects the request.
    ///
    /// `algorithm` is the already-resolved identifier. Size rules only fire
    /// when a key of their family is supplied; a key of that family whose
    /// size is unknown cannot be shown to meet the minimum and is rejected.
    pub fn rejects(&self, algorithm: &AlgorithmIdentifier, key: Option<&KeyDescriptor>) -> bool {
        match self {
            Rule::DisabledToken { token, case } => algorithm.contains(token, *case),
            Rule::MinimumKeySize { family, bits } => match key {
                Some(key) if key.family() == *family => {
                    key.size_bits().map_or(true, |size| size < *bits)
                }
                _ => false,
            },
        }
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rule::DisabledToken { token, case } => match case {
                MatchCase::Sensitive => write!(f, "{token}"),
                MatchCase::Insensitive => write!(f, "{token} (any case)"),
            },
            Rule::MinimumKeySize { family, bits } => write!(f, "{family} keySize < {bits}"),
        }
    }
}
