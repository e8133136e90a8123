//! Error types for Hardline

/// Result type alias using [`Error`]
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Main error type for Hardline
///
/// A policy rejection is normally reported as a `false` decision, not as an
/// error. [`Error::PolicyRejected`] exists for the TLS adapter, which has to
/// turn that decision into a handshake abort.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Caller handed the policy neither an algorithm identifier nor a key,
    /// or passed an argument that can never be valid (e.g. a malformed host)
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The runtime lacks a capability the baseline requires
    #[error("Feature unavailable: {0}")]
    FeatureUnavailable(String),

    /// The algorithm constraints refused an algorithm or key
    #[error("Algorithm constraints rejected '{algorithm}'")]
    PolicyRejected {
        /// Algorithm (or key algorithm) that was refused
        algorithm: String,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Certificate or key material could not be read or understood
    #[error("Certificate error: {0}")]
    Certificate(String),

    /// TLS engine error
    #[error("TLS error: {0}")]
    Tls(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Internal error (should not happen in production)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create a policy rejection error
    pub fn rejected(algorithm: impl Into<String>) -> Self {
        Error::PolicyRejected {
            algorithm: algorithm.into(),
        }
    }
}
