//! Configuration loading

use crate::validator::validate_config;
use crate::{Config, ConfigFormat};
use hardline_core::{Error, Result};
use regex::{Captures, Regex};
use std::env;
use std::fs;
use std::path::Path;

/// Read and parse a configuration file; the format follows the extension
pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Config> {
    let path = path.as_ref();
    let format = ConfigFormat::from_path(path)?;

    let content = fs::read_to_string(path).map_err(|e| {
        Error::Config(format!("Cannot read {}: {e}", path.display()))
    })?;

    load_from_str(&content, format)
}

/// Substitute `${VAR}` and `${VAR:-default}` references.
///
/// Every reference is resolved before failing, so the error names the first
/// unset variable without a default.
fn expand_env_vars(content: &str) -> Result<String> {
    let pattern = Regex::new(r"\$\{(?P<name>[A-Za-z_][A-Za-z0-9_]*)(?::-(?P<default>[^}]*))?\}")
        .map_err(|e| Error::Internal(format!("Invalid substitution pattern: {e}")))?;

    let mut missing: Option<String> = None;
    let expanded = pattern.replace_all(content, |caps: &Captures<'_>| {
        let name = &caps["name"];
        match (env::var(name), caps.name("default")) {
            (Ok(value), _) => value,
            (Err(_), Some(default)) => default.as_str().to_string(),
            (Err(_), None) => {
                missing.get_or_insert_with(|| name.to_string());
                String::new()
            }
        }
    });

    match missing {
        Some(name) => Err(Error::Config(format!(
            "Environment variable '{name}' is not set and has no default"
        ))),
        None => Ok(expanded.into_owned()),
    }
}

/// Parse configuration text after environment substitution
pub fn load_from_str(content: &str, format: ConfigFormat) -> Result<Config> {
    let content = expand_env_vars(content)?;

    match format {
        ConfigFormat::Yaml => serde_yaml::from_str(&content)
            .map_err(|e| Error::Config(format!("Invalid YAML configuration: {e}"))),
        ConfigFormat::Toml => toml::from_str(&content)
            .map_err(|e| Error::Config(format!("Invalid TOML configuration: {e}"))),
        ConfigFormat::Json => serde_json::from_str(&content)
            .map_err(|e| Error::Config(format!("Invalid JSON configuration: {e}"))),
    }
}

/// Load and validate configuration from a file
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config> {
    let path = path.as_ref();
    let config = load_from_file(path)?;
    validate_config(&config)?;

    tracing::debug!(
        path = %path.display(),
        protocols = ?config.tls.protocols,
        cipher_suites = config.tls.cipher_suites.len(),
        "Configuration loaded"
    );

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use hardline_core::MatchCase;
    use std::io::Write;

    const SAMPLE: &str = r#"
tls:
  protocols: ["TLSv1.2"]
  cipher_suites:
    - TLS_ECDHE_RSA_WITH_AES_256_GCM_SHA384
    - TLS_ECDHE_RSA_WITH_AES_128_GCM_SHA256
  endpoint_identification: "HTTPS"
  honor_server_cipher_order: true
  trust:
    native_roots: false
    ca_file: "/etc/hardline/ca.pem"

policy:
  digest_match: insensitive

logging:
  level: "debug"
  format: "json"
"#;

    #[test]
    fn test_load_yaml() {
        let config = load_from_str(SAMPLE, ConfigFormat::Yaml).unwrap();

        assert_eq!(config.tls.cipher_suites.len(), 2);
        assert_eq!(
            config.tls.cipher_suites[0],
            "TLS_ECDHE_RSA_WITH_AES_256_GCM_SHA384"
        );
        assert!(!config.tls.trust.native_roots);
        assert_eq!(config.policy.digest_match, MatchCase::Insensitive);
        assert_eq!(config.logging.format, "json");
    }

    #[test]
    fn test_empty_document_uses_defaults() {
        let config = load_from_str("{}", ConfigFormat::Json).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_load_toml() {
        let toml = r#"
[tls]
protocols = ["TLSv1.2", "TLSv1.3"]

[policy]
disabled_algorithms = "MD2, MD5, RSA keySize < 3072"
"#;
        let config = load_from_str(toml, ConfigFormat::Toml).unwrap();
        assert_eq!(config.tls.protocols.len(), 2);
        assert_eq!(config.tls.cipher_suites.len(), 4);
        assert_eq!(
            config.policy.disabled_algorithms.as_deref(),
            Some("MD2, MD5, RSA keySize < 3072")
        );
    }

    #[test]
    fn test_malformed_yaml() {
        assert!(load_from_str("tls: [yaml", ConfigFormat::Yaml).is_err());
    }

    #[test]
    fn test_env_reference_resolved() {
        env::set_var("HARDLINE_TEST_CA", "/srv/ca.pem");

        let config = load_from_str(
            r#"{"tls": {"trust": {"native_roots": false, "ca_file": "${HARDLINE_TEST_CA}"}}}"#,
            ConfigFormat::Json,
        )
        .unwrap();
        assert_eq!(
            config.tls.trust.ca_file.as_deref(),
            Some(Path::new("/srv/ca.pem"))
        );

        env::remove_var("HARDLINE_TEST_CA");
    }

    #[test]
    fn test_env_reference_falls_back_to_default() {
        env::remove_var("HARDLINE_UNDEFINED_LEVEL");

        let config = load_from_str(
            "logging:\n  level: \"${HARDLINE_UNDEFINED_LEVEL:-warn}\"\n  format: text\n",
            ConfigFormat::Yaml,
        )
        .unwrap();
        assert_eq!(config.logging.level, "warn");
    }

    #[test]
    fn test_unset_env_reference_is_an_error() {
        env::remove_var("HARDLINE_MISSING_VAR");

        let result = load_from_str(
            "logging:\n  level: \"${HARDLINE_MISSING_VAR}\"\n",
            ConfigFormat::Yaml,
        );
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("HARDLINE_MISSING_VAR"));
    }

    #[test]
    fn test_several_env_references_in_one_value() {
        env::set_var("HARDLINE_A", "TLS_ECDHE");
        env::set_var("HARDLINE_B", "AES_128_GCM");

        let expanded = expand_env_vars("${HARDLINE_A}_RSA_WITH_${HARDLINE_B}_SHA256").unwrap();
        assert_eq!(expanded, "TLS_ECDHE_RSA_WITH_AES_128_GCM_SHA256");

        env::remove_var("HARDLINE_A");
        env::remove_var("HARDLINE_B");
    }

    #[test]
    fn test_load_config_validates() {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        writeln!(file, "tls:\n  protocols: [\"SSLv3\"]").unwrap();

        let result = load_config(file.path());
        assert!(result.is_err());
    }

    #[test]
    fn test_load_config_from_file() {
        let mut file = tempfile::Builder::new().suffix(".yml").tempfile().unwrap();
        write!(file, "{SAMPLE}").unwrap();

        let config = load_config(file.path()).unwrap();
        assert_eq!(config.logging.level, "debug");
    }
}
