//! Certificate, key and trust anchor loading

use hardline_config::TrustConfig;
use hardline_core::{Error, Result};
use rustls::pki_types::{CertificateDer, PrivateKeyDer};
use rustls::RootCertStore;
use rustls_pemfile::{certs, private_key};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::{debug, info, warn};

/// Certificate chain plus private key presented to the peer
#[derive(Debug)]
pub struct Identity {
    /// Chain, end-entity first
    pub certs: Vec<CertificateDer<'static>>,
    /// Private key for the end-entity certificate
    pub key: PrivateKeyDer<'static>,
}

impl Identity {
    /// Load an identity from PEM files
    pub fn from_pem_files(cert_file: &Path, key_file: &Path) -> Result<Self> {
        Ok(Self {
            certs: load_certificates(cert_file)?,
            key: load_private_key(key_file)?,
        })
    }
}

impl Clone for Identity {
    fn clone(&self) -> Self {
        Self {
            certs: self.certs.clone(),
            key: self.key.clone_key(),
        }
    }
}

fn pem_reader(path: &Path, what: &str) -> Result<BufReader<File>> {
    File::open(path)
        .map(BufReader::new)
        .map_err(|e| Error::Certificate(format!("Cannot open {what} {}: {e}", path.display())))
}

/// Every certificate in a PEM file, in file order
pub fn load_certificates(path: &Path) -> Result<Vec<CertificateDer<'static>>> {
    let mut reader = pem_reader(path, "certificate file")?;
    let chain = certs(&mut reader)
        .collect::<std::io::Result<Vec<_>>>()
        .map_err(|e| Error::Certificate(format!("Malformed PEM in {}: {e}", path.display())))?;

    if chain.is_empty() {
        return Err(Error::Certificate(format!(
            "{} contains no certificates",
            path.display()
        )));
    }

    debug!(path = %path.display(), count = chain.len(), "Certificates loaded");
    Ok(chain)
}

/// First private key (PKCS#8, PKCS#1 or SEC1) in a PEM file
pub fn load_private_key(path: &Path) -> Result<PrivateKeyDer<'static>> {
    let mut reader = pem_reader(path, "private key file")?;

    match private_key(&mut reader) {
        Ok(Some(key)) => {
            debug!(path = %path.display(), "Private key loaded");
            Ok(key)
        }
        Ok(None) => Err(Error::Certificate(format!(
            "{} contains no private key",
            path.display()
        ))),
        Err(e) => Err(Error::Certificate(format!(
            "Malformed PEM in {}: {e}",
            path.display()
        ))),
    }
}

/// Build the trust anchor store described by `trust`
pub fn load_root_store(trust: &TrustConfig) -> Result<RootCertStore> {
    let mut roots = RootCertStore::empty();

    if trust.native_roots {
        let native = rustls_native_certs::load_native_certs()
            .map_err(|e| Error::Certificate(format!("Failed to load native roots: {e}")))?;
        let (added, ignored) = roots.add_parsable_certificates(native);
        if ignored > 0 {
            warn!(ignored, "Skipped unparsable native root certificates");
        }
        info!(count = added, "Loaded native root certificates");
    }

    if let Some(ref ca_file) = trust.ca_file {
        for cert in load_certificates(ca_file)? {
            roots.add(cert).map_err(|e| {
                Error::Certificate(format!(
                    "Invalid CA certificate in {}: {e}",
                    ca_file.display()
                ))
            })?;
        }
    }

    if roots.is_empty() {
        return Err(Error::Config("No trust anchors available".to_string()));
    }

    Ok(roots)
}
