//! TLS acceptor implementation

use crate::engine::build_server_config;
use crate::factory::{build_parameters, ConfiguredCustomizer};
use crate::handshake::SessionSummary;
use crate::loader::Identity;
use crate::parameters::HandshakeParameters;
use hardline_config::Config;
use hardline_core::{Error, Result};
use std::sync::Arc;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio_rustls::TlsAcceptor as RustlsAcceptor;
use tracing::{debug, info};

/// Server-side TLS acceptor that honours the same baseline as the client
#[derive(Clone)]
pub struct TlsAcceptor {
    inner: RustlsAcceptor,
    parameters: HandshakeParameters,
}

impl std::fmt::Debug for TlsAcceptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TlsAcceptor")
            .field("parameters", &self.parameters)
            .finish_non_exhaustive()
    }
}

impl TlsAcceptor {
    /// Create an acceptor presenting `identity`
    pub fn new(parameters: HandshakeParameters, identity: &Identity) -> Result<Self> {
        let server_config = build_server_config(&parameters, identity)?;

        info!(
            protocols = ?parameters.protocols,
            honor_server_cipher_order = server_config.ignore_client_order,
            "TLS acceptor initialized"
        );

        Ok(Self {
            inner: RustlsAcceptor::from(Arc::new(server_config)),
            parameters,
        })
    }

    /// Create an acceptor from configuration; `tls.identity` is required
    pub fn from_config(config: &Config) -> Result<Self> {
        let identity_config = config
            .tls
            .identity
            .as_ref()
            .ok_or_else(|| Error::Config("tls.identity is required to accept connections".to_string()))?;

        let customizer = ConfiguredCustomizer::from_config(config)?;
        let identity = Identity::from_pem_files(&identity_config.cert_file, &identity_config.key_file)?;

        Self::new(build_parameters(&customizer, None), &identity)
    }

    /// Parameters the acceptor was built from
    pub fn parameters(&self) -> &HandshakeParameters {
        &self.parameters
    }

    /// Accept a TLS connection
    pub async fn accept<IO>(&self, stream: IO) -> Result<tokio_rustls::server::TlsStream<IO>>
    where
        IO: AsyncRead + AsyncWrite + Unpin,
    {
        let stream = self
            .inner
            .accept(stream)
            .await
            .map_err(|e| Error::Tls(format!("TLS handshake failed: {}", e)))?;

        let session = SessionSummary::from_state(stream.get_ref().1);
        debug!(
            protocol = session.protocol.as_deref().unwrap_or("unknown"),
            cipher_suite = session.cipher_suite.as_deref().unwrap_or("unknown"),
            "Accepted TLS connection"
        );

        Ok(stream)
    }
}
