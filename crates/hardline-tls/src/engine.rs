//! Mapping handshake parameters onto the rustls engine

use crate::loader::Identity;
use crate::parameters::HandshakeParameters;
use crate::verifier::{enforce_chain, PolicyServerVerifier};
use hardline_core::{Error, Result};
use rustls::client::danger::ServerCertVerifier;
use rustls::client::WebPkiServerVerifier;
use rustls::crypto::CryptoProvider;
use rustls::{
    ClientConfig, RootCertStore, ServerConfig, SupportedCipherSuite, SupportedProtocolVersion,
};
use std::sync::Arc;
use tracing::{debug, warn};

/// Crypto provider backing every handshake
pub fn crypto_provider() -> CryptoProvider {
    rustls::crypto::ring::default_provider()
}

/// Standard name of a cipher suite, e.g. `TLS_ECDHE_RSA_WITH_AES_128_GCM_SHA256`
pub fn suite_name(suite: &SupportedCipherSuite) -> String {
    format!("{:?}", suite.suite())
}

/// Protocol name for a rustls protocol version
pub fn protocol_name(version: &SupportedProtocolVersion) -> &'static str {
    if version.version == rustls::ProtocolVersion::TLSv1_3 {
        "TLSv1.3"
    } else {
        "TLSv1.2"
    }
}

/// Resolve protocol names to engine versions, keeping the given order
pub fn protocol_versions(names: &[String]) -> Result<Vec<&'static SupportedProtocolVersion>> {
    if names.is_empty() {
        return Err(Error::Config("No protocols enabled".to_string()));
    }

    names
        .iter()
        .map(|name| match name.as_str() {
            "TLSv1.2" => Ok(&rustls::version::TLS12),
            "TLSv1.3" => Ok(&rustls::version::TLS13),
            other => Err(Error::Config(format!("Unsupported protocol: {other}"))),
        })
        .collect()
}

/// Pick the allowed suites out of `available`, in allowlist order.
///
/// Names the engine does not implement (the DHE suites, for one) are
/// skipped; an allowlist with nothing implementable is an error.
pub fn select_cipher_suites(
    available: &[SupportedCipherSuite],
    allowed: &[String],
) -> Result<Vec<SupportedCipherSuite>> {
    let mut selected = Vec::with_capacity(allowed.len());

    for name in allowed {
        match available.iter().find(|suite| suite_name(suite) == *name) {
            Some(suite) => selected.push(*suite),
            None => warn!(cipher_suite = %name, "Cipher suite not supported by TLS engine, skipping"),
        }
    }

    if selected.is_empty() {
        return Err(Error::Config(format!(
            "None of the allowed cipher suites are supported: {}",
            allowed.join(", ")
        )));
    }

    Ok(selected)
}

/// Provider restricted to the parameters' cipher suites
pub fn provider_for(parameters: &HandshakeParameters) -> Result<CryptoProvider> {
    let mut provider = crypto_provider();
    provider.cipher_suites = select_cipher_suites(&provider.cipher_suites, &parameters.cipher_suites)?;

    debug!(
        cipher_suites = ?provider.cipher_suites.iter().map(suite_name).collect::<Vec<_>>(),
        "Cipher suites selected"
    );

    Ok(provider)
}

/// Build the client side of a handshake
pub fn build_client_config(
    parameters: &HandshakeParameters,
    roots: Arc<RootCertStore>,
    identity: Option<&Identity>,
) -> Result<ClientConfig> {
    let provider = Arc::new(provider_for(parameters)?);
    let versions = protocol_versions(&parameters.protocols)?;

    let builder = ClientConfig::builder_with_provider(Arc::clone(&provider))
        .with_protocol_versions(&versions)
        .map_err(|e| Error::Tls(format!("Incompatible protocols and cipher suites: {e}")))?;

    let verifier: Arc<dyn ServerCertVerifier> = match parameters.algorithm_constraints {
        Some(ref constraints) => Arc::new(PolicyServerVerifier::new(
            roots,
            provider,
            Arc::clone(constraints),
        )?),
        None => WebPkiServerVerifier::builder_with_provider(roots, provider)
            .build()
            .map_err(|e| Error::Tls(format!("Failed to build certificate verifier: {e}")))?,
    };

    let builder = builder.dangerous().with_custom_certificate_verifier(verifier);

    let mut config = match identity {
        Some(identity) => builder
            .with_client_auth_cert(identity.certs.clone(), identity.key.clone_key())
            .map_err(|e| Error::Tls(format!("Invalid client certificate: {e}")))?,
        None => builder.with_no_client_auth(),
    };

    config.enable_sni = true;

    Ok(config)
}

/// Build the server side of a handshake.
///
/// The local chain is checked against the algorithm constraints first, so a
/// server never starts with material its own peers would refuse.
pub fn build_server_config(
    parameters: &HandshakeParameters,
    identity: &Identity,
) -> Result<ServerConfig> {
    if let Some(ref constraints) = parameters.algorithm_constraints {
        enforce_chain(constraints.as_ref(), &identity.certs)?;
    }

    let provider = Arc::new(provider_for(parameters)?);
    let versions = protocol_versions(&parameters.protocols)?;

    let mut config = ServerConfig::builder_with_provider(provider)
        .with_protocol_versions(&versions)
        .map_err(|e| Error::Tls(format!("Incompatible protocols and cipher suites: {e}")))?
        .with_no_client_auth()
        .with_single_cert(identity.certs.clone(), identity.key.clone_key())
        .map_err(|e| Error::Tls(format!("Failed to build TLS config: {e}")))?;

    config.ignore_client_order = parameters.use_cipher_suites_order;

    Ok(config)
}
