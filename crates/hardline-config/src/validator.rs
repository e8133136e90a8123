//! Configuration validation

use crate::types::{Config, HTTPS_ENDPOINT_IDENTIFICATION};
use hardline_core::{Error, Result};

/// Protocol names the TLS engine can be configured with
pub const KNOWN_PROTOCOLS: &[&str] = &["TLSv1.2", "TLSv1.3"];

/// Validate configuration
pub fn validate_config(config: &Config) -> Result<()> {
    validate_tls(config)?;
    validate_policy(config)?;
    validate_logging(config)?;

    Ok(())
}

fn validate_tls(config: &Config) -> Result<()> {
    let tls = &config.tls;

    if tls.protocols.is_empty() {
        return Err(Error::Config("protocols cannot be empty".to_string()));
    }

    for protocol in &tls.protocols {
        if !KNOWN_PROTOCOLS.contains(&protocol.as_str()) {
            return Err(Error::Config(format!(
                "Unsupported protocol: {protocol} (must be one of {})",
                KNOWN_PROTOCOLS.join(", ")
            )));
        }
    }

    if tls.protocols.iter().any(|p| p == "TLSv1.3") {
        tracing::warn!("TLSv1.3 is enabled; the baseline only requires TLSv1.2");
    }

    if tls.cipher_suites.is_empty() {
        return Err(Error::Config("cipher_suites cannot be empty".to_string()));
    }

    if let Some(empty) = tls.cipher_suites.iter().position(|s| s.trim().is_empty()) {
        return Err(Error::Config(format!(
            "cipher_suites[{empty}] cannot be empty"
        )));
    }

    // Hostname verification is mandatory
    if !tls
        .endpoint_identification
        .eq_ignore_ascii_case(HTTPS_ENDPOINT_IDENTIFICATION)
    {
        return Err(Error::Config(format!(
            "Unsupported endpoint_identification: {} (must be {HTTPS_ENDPOINT_IDENTIFICATION})",
            tls.endpoint_identification
        )));
    }

    if !tls.honor_server_cipher_order {
        tracing::warn!("honor_server_cipher_order is disabled; client preference will win");
    }

    if !tls.trust.native_roots && tls.trust.ca_file.is_none() {
        return Err(Error::Config(
            "trust requires native_roots or a ca_file".to_string(),
        ));
    }

    if let Some(ref ca_file) = tls.trust.ca_file {
        if ca_file.as_os_str().is_empty() {
            return Err(Error::Config("trust ca_file cannot be empty".to_string()));
        }
    }

    if let Some(ref identity) = tls.identity {
        if identity.cert_file.as_os_str().is_empty() {
            return Err(Error::Config("identity cert_file cannot be empty".to_string()));
        }
        if identity.key_file.as_os_str().is_empty() {
            return Err(Error::Config("identity key_file cannot be empty".to_string()));
        }
    }

    Ok(())
}

fn validate_policy(config: &Config) -> Result<()> {
    let policy = config.policy.build_policy()?;

    if policy.rules().is_empty() {
        tracing::warn!("Algorithm policy has no rules; every algorithm will be permitted");
    }

    Ok(())
}

fn validate_logging(config: &Config) -> Result<()> {
    match config.logging.format.as_str() {
        "text" | "json" => Ok(()),
        other => Err(Error::Config(format!(
            "Invalid log format: {other} (must be text or json)"
        ))),
    }
}
