//! RFC 7525 handshake factory
//!
//! Builds client handshakes that are pinned to a hardened baseline: TLS 1.2,
//! AES-GCM suites with forward secrecy, SNI, HTTPS hostname verification,
//! server cipher order, and an [`AlgorithmPolicy`] consulted during
//! certificate path validation.
//!
//! Each step is a method on [`HandshakeCustomizer`] with a default, so a
//! deployment can override one choice without restating the others.

use crate::engine::build_client_config;
use crate::handshake::Handshake;
use crate::loader::{load_root_store, Identity};
use crate::parameters::{EndpointIdentification, HandshakeParameters};
use hardline_config::{validate_config, Config, TlsConfig, RFC7525_CIPHER_SUITES, RFC7525_PROTOCOLS};
use hardline_core::{AlgorithmConstraints, Error, Result};
use hardline_policy::AlgorithmPolicy;
use rustls::pki_types::ServerName;
use rustls::RootCertStore;
use std::sync::Arc;
use tracing::{info, warn};

/// Overridable steps of handshake construction
pub trait HandshakeCustomizer: Send + Sync {
    /// Allowed protocol names
    fn protocols(&self) -> Vec<String> {
        RFC7525_PROTOCOLS.iter().map(|s| s.to_string()).collect()
    }

    /// Allowed cipher suites, most preferred first
    fn cipher_suites(&self) -> Vec<String> {
        RFC7525_CIPHER_SUITES.iter().map(|s| s.to_string()).collect()
    }

    /// Constraint object installed into the handshake
    fn algorithm_constraints(&self) -> Arc<dyn AlgorithmConstraints> {
        Arc::new(AlgorithmPolicy::rfc7525())
    }

    /// Last chance to adjust the assembled parameters
    fn extend_parameters(&self, parameters: HandshakeParameters) -> HandshakeParameters {
        parameters
    }
}

/// The stock baseline, no overrides
#[derive(Debug, Clone, Copy, Default)]
pub struct Rfc7525Defaults;

impl HandshakeCustomizer for Rfc7525Defaults {}

/// Customizer driven by a loaded [`Config`]
#[derive(Debug, Clone)]
pub struct ConfiguredCustomizer {
    tls: TlsConfig,
    endpoint_identification: EndpointIdentification,
    constraints: Arc<dyn AlgorithmConstraints>,
}

impl ConfiguredCustomizer {
    /// Validate `config` and capture what the handshake needs from it
    pub fn from_config(config: &Config) -> Result<Self> {
        validate_config(config)?;

        let policy = config.policy.build_policy()?;
        info!(policy = %policy, "Algorithm constraints configured");

        Ok(Self {
            tls: config.tls.clone(),
            endpoint_identification: config.tls.endpoint_identification.parse()?,
            constraints: Arc::new(policy),
        })
    }
}

impl HandshakeCustomizer for ConfiguredCustomizer {
    fn protocols(&self) -> Vec<String> {
        self.tls.protocols.clone()
    }

    fn cipher_suites(&self) -> Vec<String> {
        self.tls.cipher_suites.clone()
    }

    fn algorithm_constraints(&self) -> Arc<dyn AlgorithmConstraints> {
        Arc::clone(&self.constraints)
    }

    fn extend_parameters(&self, mut parameters: HandshakeParameters) -> HandshakeParameters {
        parameters.endpoint_identification = self.endpoint_identification;
        parameters.use_cipher_suites_order = self.tls.honor_server_cipher_order;
        parameters
    }
}

/// Assemble parameters through `customizer`'s hooks
pub fn build_parameters<C>(customizer: &C, server_name: Option<&str>) -> HandshakeParameters
where
    C: HandshakeCustomizer + ?Sized,
{
    let parameters = HandshakeParameters {
        protocols: customizer.protocols(),
        cipher_suites: customizer.cipher_suites(),
        endpoint_identification: EndpointIdentification::Https,
        use_cipher_suites_order: true,
        algorithm_constraints: Some(customizer.algorithm_constraints()),
        server_name: server_name.map(str::to_string),
    };

    customizer.extend_parameters(parameters)
}

/// What the TLS engine can do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    /// Server Name Indication (RFC 6066)
    pub server_name_indication: bool,
}

impl Capabilities {
    /// Capabilities of the linked engine. The rustls client always sends
    /// the `server_name` extension for DNS names.
    pub fn detect() -> Self {
        Self {
            server_name_indication: true,
        }
    }
}

impl Default for Capabilities {
    fn default() -> Self {
        Self::detect()
    }
}

/// Creates hardened client handshakes
pub struct Rfc7525HandshakeFactory<C = Rfc7525Defaults> {
    customizer: C,
    roots: Arc<RootCertStore>,
    client_identity: Option<Identity>,
    capabilities: Capabilities,
}

impl<C> std::fmt::Debug for Rfc7525HandshakeFactory<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Rfc7525HandshakeFactory")
            .field("roots", &self.roots.len())
            .field("client_identity", &self.client_identity.is_some())
            .field("capabilities", &self.capabilities)
            .finish()
    }
}

impl Rfc7525HandshakeFactory<Rfc7525Defaults> {
    /// Baseline factory trusting `roots`
    pub fn new(roots: RootCertStore) -> Self {
        Self::with_customizer(Rfc7525Defaults, roots)
    }
}

impl Rfc7525HandshakeFactory<ConfiguredCustomizer> {
    /// Factory whose choices and trust anchors come from `config`
    pub fn from_config(config: &Config) -> Result<Self> {
        let customizer = ConfiguredCustomizer::from_config(config)?;
        let roots = load_root_store(&config.tls.trust)?;
        Ok(Self::with_customizer(customizer, roots))
    }
}

impl<C: HandshakeCustomizer> Rfc7525HandshakeFactory<C> {
    /// Factory with custom hooks
    pub fn with_customizer(customizer: C, roots: RootCertStore) -> Self {
        Self {
            customizer,
            roots: Arc::new(roots),
            client_identity: None,
            capabilities: Capabilities::detect(),
        }
    }

    /// Present `identity` when the server asks for a client certificate
    pub fn client_identity(mut self, identity: Identity) -> Self {
        self.client_identity = Some(identity);
        self
    }

    /// Override detected engine capabilities
    pub fn capabilities(mut self, capabilities: Capabilities) -> Self {
        self.capabilities = capabilities;
        self
    }

    /// The hooks in use
    pub fn customizer(&self) -> &C {
        &self.customizer
    }

    /// Build a handshake for `host:port`.
    ///
    /// Fails with [`Error::FeatureUnavailable`] before doing anything else
    /// when the engine cannot send SNI.
    pub fn create_handshake(&self, host: &str, port: u16) -> Result<Handshake> {
        if !self.capabilities.server_name_indication {
            return Err(Error::FeatureUnavailable(
                "This TLS engine does not support Server Name Indication".to_string(),
            ));
        }

        let server_name = ServerName::try_from(host.to_string())
            .map_err(|e| Error::InvalidArgument(format!("Invalid host '{host}': {e}")))?;
        if matches!(server_name, ServerName::IpAddress(_)) {
            warn!(host = %host, "SNI is not sent for IP address targets");
        }

        let parameters = build_parameters(&self.customizer, Some(host));
        let config = build_client_config(
            &parameters,
            Arc::clone(&self.roots),
            self.client_identity.as_ref(),
        )?;

        let handshake = Handshake::new(host.to_string(), server_name, port, parameters, Arc::new(config));

        info!(
            host = %host,
            port,
            protocols = ?handshake.enabled_protocols(),
            cipher_suites = ?handshake.enabled_cipher_suites(),
            "Handshake configured"
        );

        Ok(handshake)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::TestPki;
    use hardline_config::ConfigBuilder;
    use hardline_core::{CryptoPrimitive, KeyDescriptor, MatchCase};

    #[test]
    fn test_baseline_handshake() {
        let pki = TestPki::new("localhost");
        let factory = Rfc7525HandshakeFactory::new(pki.roots());

        let handshake = factory.create_handshake("localhost", 443).unwrap();
        let parameters = handshake.parameters();

        assert_eq!(parameters.protocols, vec!["TLSv1.2"]);
        assert_eq!(parameters.cipher_suites.len(), 4);
        assert_eq!(parameters.endpoint_identification, EndpointIdentification::Https);
        assert!(parameters.use_cipher_suites_order);
        assert_eq!(parameters.server_name.as_deref(), Some("localhost"));
        assert!(handshake.client_config().enable_sni);

        assert_eq!(handshake.enabled_protocols(), vec!["TLSv1.2"]);
        assert_eq!(
            handshake.enabled_cipher_suites(),
            vec![
                "TLS_ECDHE_RSA_WITH_AES_128_GCM_SHA256",
                "TLS_ECDHE_RSA_WITH_AES_256_GCM_SHA384"
            ]
        );
    }

    #[test]
    fn test_installed_constraints_are_the_baseline() {
        let pki = TestPki::new("localhost");
        let handshake = Rfc7525HandshakeFactory::new(pki.roots())
            .create_handshake("localhost", 443)
            .unwrap();

        let constraints = handshake.parameters().algorithm_constraints.clone().unwrap();
        let primitives = CryptoPrimitive::Signature.only();
        assert!(!constraints
            .permits_algorithm(&primitives, &"MD5withRSA".into(), None)
            .unwrap());
        assert!(!constraints
            .permits_key(&primitives, &KeyDescriptor::rsa(1024))
            .unwrap());
    }

    #[test]
    fn test_sni_unavailable_is_fatal() {
        let pki = TestPki::new("localhost");
        let factory = Rfc7525HandshakeFactory::new(pki.roots()).capabilities(Capabilities {
            server_name_indication: false,
        });

        let result = factory.create_handshake("localhost", 443);
        assert!(matches!(result, Err(Error::FeatureUnavailable(_))));
    }

    #[test]
    fn test_invalid_host() {
        let pki = TestPki::new("localhost");
        let factory = Rfc7525HandshakeFactory::new(pki.roots());

        let result = factory.create_handshake("not a host", 443);
        assert!(matches!(result, Err(Error::InvalidArgument(_))));
    }

    #[derive(Debug)]
    struct Tls13Only;

    impl HandshakeCustomizer for Tls13Only {
        fn protocols(&self) -> Vec<String> {
            vec!["TLSv1.3".to_string()]
        }

        fn cipher_suites(&self) -> Vec<String> {
            vec!["TLS13_AES_256_GCM_SHA384".to_string()]
        }

        fn extend_parameters(&self, mut parameters: HandshakeParameters) -> HandshakeParameters {
            parameters.use_cipher_suites_order = false;
            parameters
        }
    }

    #[test]
    fn test_customizer_hooks() {
        let pki = TestPki::new("localhost");
        let factory = Rfc7525HandshakeFactory::with_customizer(Tls13Only, pki.roots());

        let handshake = factory.create_handshake("localhost", 8443).unwrap();
        assert_eq!(handshake.enabled_protocols(), vec!["TLSv1.3"]);
        assert_eq!(handshake.enabled_cipher_suites(), vec!["TLS13_AES_256_GCM_SHA384"]);
        assert!(!handshake.parameters().use_cipher_suites_order);
        assert_eq!(handshake.port(), 8443);
    }

    #[test]
    fn test_mismatched_protocols_and_suites() {
        struct Mismatch;
        impl HandshakeCustomizer for Mismatch {
            fn protocols(&self) -> Vec<String> {
                vec!["TLSv1.3".to_string()]
            }
        }

        let pki = TestPki::new("localhost");
        let factory = Rfc7525HandshakeFactory::with_customizer(Mismatch, pki.roots());
        assert!(factory.create_handshake("localhost", 443).is_err());
    }

    #[test]
    fn test_configured_customizer() {
        let dir = tempfile::tempdir().unwrap();
        let pki = TestPki::new("localhost");
        let files = pki.write_pem(dir.path());

        let config = ConfigBuilder::new()
            .cipher_suites(["TLS_ECDHE_RSA_WITH_AES_256_GCM_SHA384"])
            .honor_server_cipher_order(false)
            .ca_file(&files.ca)
            .digest_match(MatchCase::Insensitive)
            .build()
            .unwrap();

        let factory = Rfc7525HandshakeFactory::from_config(&config).unwrap();
        let handshake = factory.create_handshake("localhost", 443).unwrap();

        assert_eq!(
            handshake.enabled_cipher_suites(),
            vec!["TLS_ECDHE_RSA_WITH_AES_256_GCM_SHA384"]
        );
        assert!(!handshake.parameters().use_cipher_suites_order);

        let constraints = factory.customizer().algorithm_constraints();
        assert!(!constraints
            .permits_algorithm(
                &CryptoPrimitive::Signature.only(),
                &"md5WithRSAEncryption".into(),
                None
            )
            .unwrap());
    }
}
