//! Handshake parameters

use hardline_core::{AlgorithmConstraints, Error};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Hostname verification algorithm
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EndpointIdentification {
    /// RFC 2818 style: the server name must match a subject alternative name
    #[default]
    Https,
}

impl fmt::Display for EndpointIdentification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EndpointIdentification::Https => f.write_str("HTTPS"),
        }
    }
}

impl FromStr for EndpointIdentification {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("HTTPS") {
            Ok(EndpointIdentification::Https)
        } else {
            Err(Error::Config(format!(
                "Unsupported endpoint identification algorithm: {s}"
            )))
        }
    }
}

/// Everything the engine needs to set up one handshake
#[derive(Debug, Clone)]
pub struct HandshakeParameters {
    /// Allowed protocol names
    pub protocols: Vec<String>,
    /// Allowed cipher suite names, most preferred first
    pub cipher_suites: Vec<String>,
    /// Hostname verification mode
    pub endpoint_identification: EndpointIdentification,
    /// Server cipher order wins over client preference
    pub use_cipher_suites_order: bool,
    /// Constraint object consulted during path validation and negotiation
    pub algorithm_constraints: Option<Arc<dyn AlgorithmConstraints>>,
    /// Host name sent as SNI
    pub server_name: Option<String>,
}

impl Default for HandshakeParameters {
    fn default() -> Self {
        Self {
            protocols: Vec::new(),
            cipher_suites: Vec::new(),
            endpoint_identification: EndpointIdentification::Https,
            use_cipher_suites_order: false,
            algorithm_constraints: None,
            server_name: None,
        }
    }
}
