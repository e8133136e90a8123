//! # Hardline Configuration
//!
//! Loads the handshake baseline, algorithm policy and logging settings from
//! YAML, TOML or JSON. `${VAR}` and `${VAR:-default}` references are
//! substituted before parsing, and [`load_config`] validates the result.
//! Every field has a default, so an empty document yields the RFC 7525
//! baseline.

#![forbid(unsafe_code)]
#![warn(
    missing_docs,
    missing_debug_implementations,
    rust_2018_idioms,
    unreachable_pub
)]

pub mod builder;
pub mod loader;
pub mod types;
pub mod validator;

pub use builder::ConfigBuilder;
pub use loader::{load_config, load_from_file, load_from_str};
pub use types::{
    Config, IdentityConfig, LoggingConfig, PolicyConfig, TlsConfig, TrustConfig,
    HTTPS_ENDPOINT_IDENTIFICATION, RFC7525_CIPHER_SUITES, RFC7525_PROTOCOLS,
};
pub use validator::validate_config;

use hardline_core::{Error, Result};
use std::path::Path;

/// Load configuration from a file without validating it
pub fn load<P: AsRef<Path>>(path: P) -> Result<Config> {
    load_from_file(path)
}

/// Parse configuration text without validating it
pub fn load_str(content: &str, format: ConfigFormat) -> Result<Config> {
    load_from_str(content, format)
}

/// Serialization format of a configuration document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// `.yaml` / `.yml`
    Yaml,
    /// `.toml`
    Toml,
    /// `.json`
    Json,
}

impl ConfigFormat {
    /// Pick the format from a file extension, ignoring case
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);

        match extension.as_deref() {
            Some("yaml" | "yml") => Ok(ConfigFormat::Yaml),
            Some("toml") => Ok(ConfigFormat::Toml),
            Some("json") => Ok(ConfigFormat::Json),
            Some(other) => Err(Error::Config(format!(
                "Unsupported configuration extension '.{other}' for {}",
                path.display()
            ))),
            None => Err(Error::Config(format!(
                "Cannot tell the configuration format of {} without an extension",
                path.display()
            ))),
        }
    }
}
