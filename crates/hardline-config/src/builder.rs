//! Configuration builder

use crate::types::{Config, IdentityConfig};
use hardline_core::{MatchCase, Result};
use std::path::PathBuf;

/// Builder for constructing configuration programmatically
#[derive(Debug, Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Start from the baseline defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the allowed protocol list
    pub fn protocols<I, S>(mut self, protocols: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.tls.protocols = protocols.into_iter().map(Into::into).collect();
        self
    }

    /// Replace the allowed cipher suite list
    pub fn cipher_suites<I, S>(mut self, suites: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.tls.cipher_suites = suites.into_iter().map(Into::into).collect();
        self
    }

    /// Whether the server's cipher order wins
    pub fn honor_server_cipher_order(mut self, honor: bool) -> Self {
        self.config.tls.honor_server_cipher_order = honor;
        self
    }

    /// Use only the given CA file as trust anchor
    pub fn ca_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.tls.trust.native_roots = false;
        self.config.tls.trust.ca_file = Some(path.into());
        self
    }

    /// Set the local certificate chain and key
    pub fn identity(mut self, cert_file: impl Into<PathBuf>, key_file: impl Into<PathBuf>) -> Self {
        self.config.tls.identity = Some(IdentityConfig {
            cert_file: cert_file.into(),
            key_file: key_file.into(),
        });
        self
    }

    /// Set how disabled tokens are matched
    pub fn digest_match(mut self, case: MatchCase) -> Self {
        self.config.policy.digest_match = case;
        self
    }

    /// Replace the baseline rules with a disabled-algorithm list
    pub fn disabled_algorithms(mut self, list: impl Into<String>) -> Self {
        self.config.policy.disabled_algorithms = Some(list.into());
        self
    }

    /// Build and validate the configuration
    pub fn build(self) -> Result<Config> {
        crate::validator::validate_config(&self.config)?;
        Ok(self.config)
    }
}
