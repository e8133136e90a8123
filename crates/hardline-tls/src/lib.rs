//! Hardened TLS handshakes for Hardline
//!
//! Configures rustls to an RFC 7525 style baseline:
//! - TLS 1.2 only
//! - AES-GCM cipher suites with forward secrecy, server order preferred
//! - SNI and HTTPS-style hostname verification
//! - Algorithm constraints consulted for every certificate in the presented
//!   chain and every handshake signature
//!
//! # Features
//!
//! - Overridable construction hooks ([`HandshakeCustomizer`])
//! - Configuration-driven factories and acceptors
//! - Trust anchors from the platform store or PEM files
//! - Server-side acceptor that refuses to start with rejected key material

#![forbid(unsafe_code)]
#![warn(
    missing_docs,
    missing_debug_implementations,
    rust_2018_idioms,
    unreachable_pub
)]

pub mod acceptor;
pub mod engine;
pub mod factory;
pub mod handshake;
pub mod inspect;
pub mod loader;
pub mod parameters;
pub mod verifier;

#[cfg(any(test, feature = "test-support"))]
#[doc(hidden)]
pub mod test_support;

pub use acceptor::TlsAcceptor;
pub use factory::{
    build_parameters, Capabilities, ConfiguredCustomizer, HandshakeCustomizer,
    Rfc7525Defaults, Rfc7525HandshakeFactory,
};
pub use handshake::{Handshake, SessionSummary};
pub use inspect::{describe_certificate, signature_scheme_algorithm, CertificateAlgorithms};
pub use loader::{load_certificates, load_private_key, load_root_store, Identity};
pub use parameters::{EndpointIdentification, HandshakeParameters};
pub use verifier::{enforce_certificate, enforce_chain, PolicyServerVerifier};
