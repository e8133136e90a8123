//! Server certificate verifier that consults the algorithm constraints
//!
//! Chain building, signature checks and hostname verification stay with
//! `webpki`; this wrapper only adds the constraint checks on top.

use crate::inspect::{describe_certificate, signature_scheme_algorithm};
use hardline_core::{AlgorithmConstraints, CryptoPrimitive, Error, Result};
use rustls::client::danger::{HandshakeSignatureValid, ServerCertVerified, ServerCertVerifier};
use rustls::client::WebPkiServerVerifier;
use rustls::crypto::CryptoProvider;
use rustls::pki_types::{CertificateDer, ServerName, UnixTime};
use rustls::{DigitallySignedStruct, RootCertStore, SignatureScheme};
use std::sync::Arc;
use tracing::warn;

/// Check one certificate's signature algorithm and public key
pub fn enforce_certificate(
    constraints: &dyn AlgorithmConstraints,
    cert: &CertificateDer<'_>,
) -> Result<()> {
    let described = describe_certificate(cert)?;
    let primitives = CryptoPrimitive::Signature.only();

    if !constraints.permits_algorithm(&primitives, &described.signature_algorithm, None)? {
        return Err(Error::rejected(described.signature_algorithm.as_str()));
    }

    if !constraints.permits_key(&primitives, &described.public_key)? {
        let key = &described.public_key;
        return Err(Error::rejected(match key.size_bits() {
            Some(bits) => format!("{} {bits}-bit key", key.algorithm()),
            None => format!("{} key", key.algorithm()),
        }));
    }

    Ok(())
}

/// Check every certificate of a presented chain
pub fn enforce_chain<'a>(
    constraints: &dyn AlgorithmConstraints,
    chain: impl IntoIterator<Item = &'a CertificateDer<'a>>,
) -> Result<()> {
    chain
        .into_iter()
        .try_for_each(|cert| enforce_certificate(constraints, cert))
}

fn to_tls_error(err: Error) -> rustls::Error {
    rustls::Error::General(err.to_string())
}

/// `webpki` verification plus algorithm constraints
#[derive(Debug)]
pub struct PolicyServerVerifier {
    inner: Arc<WebPkiServerVerifier>,
    constraints: Arc<dyn AlgorithmConstraints>,
}

impl PolicyServerVerifier {
    /// Create a verifier over `roots`
    pub fn new(
        roots: Arc<RootCertStore>,
        provider: Arc<CryptoProvider>,
        constraints: Arc<dyn AlgorithmConstraints>,
    ) -> Result<Self> {
        let inner = WebPkiServerVerifier::builder_with_provider(roots, provider)
            .build()
            .map_err(|e| Error::Tls(format!("Failed to build certificate verifier: {e}")))?;

        Ok(Self { inner, constraints })
    }

    /// A constraint error counts as a rejection, after being logged
    fn scheme_permitted(&self, scheme: SignatureScheme) -> bool {
        let algorithm = signature_scheme_algorithm(scheme);
        match self
            .constraints
            .permits_algorithm(&CryptoPrimitive::Signature.only(), &algorithm, None)
        {
            Ok(permitted) => permitted,
            Err(e) => {
                warn!(
                    algorithm = %algorithm,
                    error = %e,
                    "Algorithm constraints failed to evaluate signature scheme"
                );
                false
            }
        }
    }

    fn check_scheme(&self, scheme: SignatureScheme) -> std::result::Result<(), rustls::Error> {
        if self.scheme_permitted(scheme) {
            return Ok(());
        }
        let algorithm = signature_scheme_algorithm(scheme);
        warn!(algorithm = %algorithm, "Handshake signature rejected by algorithm constraints");
        Err(to_tls_error(Error::rejected(algorithm.as_str())))
    }
}

impl ServerCertVerifier for PolicyServerVerifier {
    fn verify_server_cert(
        &self,
        end_entity: &CertificateDer<'_>,
        intermediates: &[CertificateDer<'_>],
        server_name: &ServerName<'_>,
        ocsp_response: &[u8],
        now: UnixTime,
    ) -> std::result::Result<ServerCertVerified, rustls::Error> {
        let verified = self.inner.verify_server_cert(
            end_entity,
            intermediates,
            server_name,
            ocsp_response,
            now,
        )?;

        enforce_chain(
            self.constraints.as_ref(),
            std::iter::once(end_entity).chain(intermediates),
        )
        .map_err(|e| {
            warn!(
                server_name = ?server_name,
                error = %e,
                "Certificate chain rejected by algorithm constraints"
            );
            to_tls_error(e)
        })?;

        Ok(verified)
    }

    fn verify_tls12_signature(
        &self,
        message: &[u8],
        cert: &CertificateDer<'_>,
        dss: &DigitallySignedStruct,
    ) -> std::result::Result<HandshakeSignatureValid, rustls::Error> {
        self.check_scheme(dss.scheme)?;
        self.inner.verify_tls12_signature(message, cert, dss)
    }

    fn verify_tls13_signature(
        &self,
        message: &[u8],
        cert: &CertificateDer<'_>,
        dss: &DigitallySignedStruct,
    ) -> std::result::Result<HandshakeSignatureValid, rustls::Error> {
        self.check_scheme(dss.scheme)?;
        self.inner.verify_tls13_signature(message, cert, dss)
    }

    fn supported_verify_schemes(&self) -> Vec<SignatureScheme> {
        self.inner
            .supported_verify_schemes()
            .into_iter()
            .filter(|scheme| self.scheme_permitted(*scheme))
            .collect()
    }
}
