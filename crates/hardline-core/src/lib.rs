//! # Hardline Core
//!
//! Core types, traits, and error handling for Hardline.
//!
//! This crate provides the foundational abstractions shared by the policy,
//! configuration and TLS crates:
//! - Error types
//! - Cryptographic primitive tags
//! - Algorithm identifiers and opaque parameters
//! - Key descriptors
//! - The [`AlgorithmConstraints`] trait

#![forbid(unsafe_code)]
#![warn(
    missing_docs,
    missing_debug_implementations,
    rust_2018_idioms,
    unreachable_pub
)]

pub mod algorithm;
pub mod constraints;
pub mod error;
pub mod key;
pub mod primitive;

pub use algorithm::{AlgorithmIdentifier, AlgorithmParameters, MatchCase};
pub use constraints::AlgorithmConstraints;
pub use error::{Error, Result};
pub use key::{KeyDescriptor, KeyFamily};
pub use primitive::{CryptoPrimitive, PrimitiveSet};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::algorithm::{AlgorithmIdentifier, AlgorithmParameters, MatchCase};
    pub use crate::constraints::AlgorithmConstraints;
    pub use crate::error::{Error, Result};
    pub use crate::key::{KeyDescriptor, KeyFamily};
    pub use crate::primitive::{CryptoPrimitive, PrimitiveSet};
}
