//! Throwaway PKI for tests
//!
//! Compiled for this crate's unit tests and, through the `test-support`
//! feature, for its integration tests. Panics on any failure.

use rustls::pki_types::{CertificateDer, PrivateKeyDer, PrivatePkcs8KeyDer};
use rustls::RootCertStore;
use std::path::{Path, PathBuf};

use crate::loader::Identity;

/// ECDSA P-256 CA plus one leaf it signed
pub struct TestPki {
    ca_cert: rcgen::Certificate,
    leaf_cert: rcgen::Certificate,
    leaf_key: rcgen::KeyPair,
}

impl std::fmt::Debug for TestPki {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TestPki").finish_non_exhaustive()
    }
}

/// Where [`TestPki::write_pem`] put its files
#[derive(Debug)]
pub struct PemFiles {
    /// CA certificate
    pub ca: PathBuf,
    /// Leaf certificate
    pub cert: PathBuf,
    /// Leaf private key (PKCS#8)
    pub key: PathBuf,
}

impl TestPki {
    /// CA and a leaf for `host` signed by it
    pub fn new(host: &str) -> Self {
        let ca_key = rcgen::KeyPair::generate().unwrap();
        let mut ca_params = rcgen::CertificateParams::new(Vec::<String>::new()).unwrap();
        ca_params
            .distinguished_name
            .push(rcgen::DnType::CommonName, "Hardline Test CA");
        ca_params.is_ca = rcgen::IsCa::Ca(rcgen::BasicConstraints::Unconstrained);
        let ca_cert = ca_params.self_signed(&ca_key).unwrap();

        let leaf_key = rcgen::KeyPair::generate().unwrap();
        let leaf_params = rcgen::CertificateParams::new(vec![host.to_string()]).unwrap();
        let leaf_cert = leaf_params.signed_by(&leaf_key, &ca_cert, &ca_key).unwrap();

        Self {
            ca_cert,
            leaf_cert,
            leaf_key,
        }
    }

    /// CA certificate
    pub fn ca_der(&self) -> CertificateDer<'static> {
        self.ca_cert.der().clone()
    }

    /// Leaf certificate
    pub fn leaf_der(&self) -> CertificateDer<'static> {
        self.leaf_cert.der().clone()
    }

    /// Trust store holding only the CA
    pub fn roots(&self) -> RootCertStore {
        let mut roots = RootCertStore::empty();
        roots.add(self.ca_der()).unwrap();
        roots
    }

    /// Leaf chain and key, ready for an acceptor
    pub fn identity(&self) -> Identity {
        Identity {
            certs: vec![self.leaf_der()],
            key: PrivateKeyDer::Pkcs8(PrivatePkcs8KeyDer::from(self.leaf_key.serialize_der())),
        }
    }

    /// Write CA, leaf and key as PEM files under `dir`
    pub fn write_pem(&self, dir: &Path) -> PemFiles {
        let files = PemFiles {
            ca: dir.join("ca.pem"),
            cert: dir.join("server.pem"),
            key: dir.join("server.key"),
        };
        std::fs::write(&files.ca, self.ca_cert.pem()).unwrap();
        std::fs::write(&files.cert, self.leaf_cert.pem()).unwrap();
        std::fs::write(&files.key, self.leaf_key.serialize_pem()).unwrap();
        files
    }
}
