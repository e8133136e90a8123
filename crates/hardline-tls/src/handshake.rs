//! A configured client handshake

use crate::engine::{protocol_name, suite_name};
use crate::parameters::HandshakeParameters;
use hardline_core::{Error, Result};
use rustls::pki_types::ServerName;
use rustls::{ClientConfig, CommonState, ProtocolVersion};
use std::sync::Arc;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::TcpStream;
use tokio_rustls::client::TlsStream;
use tokio_rustls::TlsConnector;
use tracing::info;

/// Client handshake context for one connection.
///
/// Owned by the connection-setup call that created it.
#[derive(Debug)]
pub struct Handshake {
    host: String,
    server_name: ServerName<'static>,
    port: u16,
    parameters: HandshakeParameters,
    config: Arc<ClientConfig>,
}

impl Handshake {
    pub(crate) fn new(
        host: String,
        server_name: ServerName<'static>,
        port: u16,
        parameters: HandshakeParameters,
        config: Arc<ClientConfig>,
    ) -> Self {
        Self {
            host,
            server_name,
            port,
            parameters,
            config,
        }
    }

    /// Target host
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Target port
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Name used for SNI and hostname verification
    pub fn server_name(&self) -> &ServerName<'static> {
        &self.server_name
    }

    /// Parameters the handshake was built from
    pub fn parameters(&self) -> &HandshakeParameters {
        &self.parameters
    }

    /// Engine configuration
    pub fn client_config(&self) -> Arc<ClientConfig> {
        Arc::clone(&self.config)
    }

    /// Cipher suites the engine will offer, in order
    pub fn enabled_cipher_suites(&self) -> Vec<String> {
        self.config
            .crypto_provider()
            .cipher_suites
            .iter()
            .filter(|suite| {
                let version = protocol_name(suite.version());
                self.parameters.protocols.iter().any(|p| p == version)
            })
            .map(suite_name)
            .collect()
    }

    /// Protocols the engine will offer
    pub fn enabled_protocols(&self) -> Vec<String> {
        self.parameters.protocols.clone()
    }

    /// Run the handshake over an established stream
    pub async fn connect<IO>(&self, stream: IO) -> Result<TlsStream<IO>>
    where
        IO: AsyncRead + AsyncWrite + Unpin,
    {
        let connector = TlsConnector::from(Arc::clone(&self.config));
        let stream = connector
            .connect(self.server_name.clone(), stream)
            .await
            .map_err(|e| Error::Tls(format!("TLS handshake failed: {e}")))?;

        let session = SessionSummary::from_state(stream.get_ref().1);
        info!(
            host = %self.host,
            protocol = session.protocol.as_deref().unwrap_or("unknown"),
            cipher_suite = session.cipher_suite.as_deref().unwrap_or("unknown"),
            "TLS handshake complete"
        );

        Ok(stream)
    }

    /// Open a TCP connection to `host:port` and run the handshake over it
    pub async fn connect_tcp(&self) -> Result<TlsStream<TcpStream>> {
        let stream = TcpStream::connect((self.host.as_str(), self.port)).await?;
        self.connect(stream).await
    }
}

/// What a completed handshake negotiated
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionSummary {
    /// Negotiated protocol name
    pub protocol: Option<String>,
    /// Negotiated cipher suite name
    pub cipher_suite: Option<String>,
}

impl SessionSummary {
    /// Read the negotiated values off a connection
    pub fn from_state(state: &CommonState) -> Self {
        Self {
            protocol: state.protocol_version().map(|v| match v {
                ProtocolVersion::TLSv1_2 => "TLSv1.2".to_string(),
                ProtocolVersion::TLSv1_3 => "TLSv1.3".to_string(),
                other => format!("{other:?}"),
            }),
            cipher_suite: state.negotiated_cipher_suite().map(|s| suite_name(&s)),
        }
    }
}
