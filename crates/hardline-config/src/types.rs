//! Configuration types

use hardline_core::{MatchCase, Result};
use hardline_policy::{policy_from_disabled_algorithms, AlgorithmPolicy};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Protocols allowed by the baseline
pub const RFC7525_PROTOCOLS: &[&str] = &["TLSv1.2"];

/// Cipher suites allowed by the baseline, in preference order
pub const RFC7525_CIPHER_SUITES: &[&str] = &[
    "TLS_DHE_RSA_WITH_AES_128_GCM_SHA256",
    "TLS_ECDHE_RSA_WITH_AES_128_GCM_SHA256",
    "TLS_DHE_RSA_WITH_AES_256_GCM_SHA384",
    "TLS_ECDHE_RSA_WITH_AES_256_GCM_SHA384",
];

/// Endpoint identification algorithm for HTTPS-style hostname checks
pub const HTTPS_ENDPOINT_IDENTIFICATION: &str = "HTTPS";

/// Main configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Config {
    /// Handshake configuration
    #[serde(default)]
    pub tls: TlsConfig,

    /// Algorithm constraints
    #[serde(default)]
    pub policy: PolicyConfig,

    /// Logging
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Handshake configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TlsConfig {
    /// Allowed protocol names (`TLSv1.2`, `TLSv1.3`)
    #[serde(default = "default_protocols")]
    pub protocols: Vec<String>,

    /// Allowed cipher suite names, most preferred first
    #[serde(default = "default_cipher_suites")]
    pub cipher_suites: Vec<String>,

    /// Hostname verification algorithm
    #[serde(default = "default_endpoint_identification")]
    pub endpoint_identification: String,

    /// Prefer the server's cipher suite order over the client's
    #[serde(default = "default_true")]
    pub honor_server_cipher_order: bool,

    /// Trust anchors
    #[serde(default)]
    pub trust: TrustConfig,

    /// Local certificate chain and key (server side)
    #[serde(default)]
    pub identity: Option<IdentityConfig>,
}

fn default_protocols() -> Vec<String> {
    RFC7525_PROTOCOLS.iter().map(|s| s.to_string()).collect()
}

fn default_cipher_suites() -> Vec<String> {
    RFC7525_CIPHER_SUITES.iter().map(|s| s.to_string()).collect()
}

fn default_endpoint_identification() -> String {
    HTTPS_ENDPOINT_IDENTIFICATION.to_string()
}

fn default_true() -> bool {
    true
}

impl Default for TlsConfig {
    fn default() -> Self {
        Self {
            protocols: default_protocols(),
            cipher_suites: default_cipher_suites(),
            endpoint_identification: default_endpoint_identification(),
            honor_server_cipher_order: true,
            trust: TrustConfig::default(),
            identity: None,
        }
    }
}

/// Trust anchor sources
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TrustConfig {
    /// Load the platform's native root certificates
    #[serde(default = "default_true")]
    pub native_roots: bool,

    /// Additional CA certificates (PEM)
    #[serde(default)]
    pub ca_file: Option<PathBuf>,
}

impl Default for TrustConfig {
    fn default() -> Self {
        Self {
            native_roots: true,
            ca_file: None,
        }
    }
}

/// Certificate chain and private key files (PEM)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IdentityConfig {
    /// Path to certificate chain file
    pub cert_file: PathBuf,

    /// Path to private key file
    pub key_file: PathBuf,
}

/// Algorithm constraint configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PolicyConfig {
    /// How `MD5` (and any listed token) is matched
    #[serde(default)]
    pub digest_match: MatchCase,

    /// Replace the baseline with a JDK-style list,
    /// e.g. `"MD2, MD4, MD5, RSA keySize < 2048"`
    #[serde(default)]
    pub disabled_algorithms: Option<String>,
}

impl PolicyConfig {
    /// Build the policy this configuration describes
    pub fn build_policy(&self) -> Result<AlgorithmPolicy> {
        match self.disabled_algorithms.as_deref() {
            Some(list) => policy_from_disabled_algorithms(list, self.digest_match),
            None => Ok(AlgorithmPolicy::rfc7525_with_digest_match(self.digest_match)),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level
    pub level: String,

    /// Log format (json, text)
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "text".to_string(),
        }
    }
}
