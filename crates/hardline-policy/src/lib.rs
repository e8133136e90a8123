//! # Hardline Policy
//!
//! Algorithm and key acceptability policy for hardened TLS handshakes.
//!
//! [`AlgorithmPolicy`] is a pure, default-allow predicate over an ordered
//! list of [`Rule`]s. The stock baseline rejects exactly two things:
//! - algorithm names containing `MD5`
//! - RSA keys with a modulus shorter than 2048 bits
//!
//! Further rules are added explicitly, either in code or from a
//! JDK-style disabled-algorithm list.

#![forbid(unsafe_code)]
#![warn(
    missing_docs,
    missing_debug_implementations,
    rust_2018_idioms,
    unreachable_pub
)]

pub mod disabled;
pub mod policy;
pub mod rule;

pub use disabled::{parse_disabled_algorithms, policy_from_disabled_algorithms};
pub use policy::{resolve_algorithm, AlgorithmPolicy, MIN_RSA_MODULUS_BITS};
pub use rule::Rule;
