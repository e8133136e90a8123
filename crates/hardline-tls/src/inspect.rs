//! Extract algorithm identifiers and key descriptors from what the TLS
//! engine hands us, so the algorithm constraints never have to look at a
//! certificate themselves.

use hardline_core::{AlgorithmIdentifier, Error, KeyDescriptor, Result};
use rustls::pki_types::CertificateDer;
use rustls::SignatureScheme;
use x509_parser::prelude::*;
use x509_parser::public_key::PublicKey;

/// Algorithms found in one certificate
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CertificateAlgorithms {
    /// Algorithm the issuer signed this certificate with
    pub signature_algorithm: AlgorithmIdentifier,
    /// Subject public key
    pub public_key: KeyDescriptor,
}

const SIGNATURE_ALGORITHMS: &[(&str, &str)] = &[
    ("1.2.840.113549.1.1.2", "MD2withRSA"),
    ("1.2.840.113549.1.1.3", "MD4withRSA"),
    ("1.2.840.113549.1.1.4", "MD5withRSA"),
    ("1.2.840.113549.1.1.5", "SHA1withRSA"),
    ("1.2.840.113549.1.1.10", "RSASSA-PSS"),
    ("1.2.840.113549.1.1.11", "SHA256withRSA"),
    ("1.2.840.113549.1.1.12", "SHA384withRSA"),
    ("1.2.840.113549.1.1.13", "SHA512withRSA"),
    ("1.2.840.113549.1.1.14", "SHA224withRSA"),
    ("1.2.840.10045.4.1", "SHA1withECDSA"),
    ("1.2.840.10045.4.3.1", "SHA224withECDSA"),
    ("1.2.840.10045.4.3.2", "SHA256withECDSA"),
    ("1.2.840.10045.4.3.3", "SHA384withECDSA"),
    ("1.2.840.10045.4.3.4", "SHA512withECDSA"),
    ("1.2.840.10040.4.3", "SHA1withDSA"),
    ("2.16.840.1.101.3.4.3.2", "SHA256withDSA"),
    ("1.3.101.112", "Ed25519"),
    ("1.3.101.113", "Ed448"),
];

const KEY_ALGORITHMS: &[(&str, &str)] = &[
    ("1.2.840.113549.1.1.1", "RSA"),
    ("1.2.840.113549.1.1.10", "RSASSA-PSS"),
    ("1.2.840.10045.2.1", "EC"),
    ("1.2.840.10040.4.1", "DSA"),
    ("1.3.101.110", "X25519"),
    ("1.3.101.111", "X448"),
    ("1.3.101.112", "Ed25519"),
    ("1.3.101.113", "Ed448"),
];

const NAMED_CURVES: &[(&str, u32)] = &[
    ("1.2.840.10045.3.1.7", 256),
    ("1.3.132.0.10", 256),
    ("1.3.132.0.34", 384),
    ("1.3.132.0.35", 521),
];

fn lookup<'a, T: Copy>(table: &'a [(&'a str, T)], oid: &str) -> Option<T> {
    table.iter().find(|(id, _)| *id == oid).map(|(_, v)| *v)
}

/// Describe the signature algorithm and subject key of a DER certificate
pub fn describe_certificate(der: &CertificateDer<'_>) -> Result<CertificateAlgorithms> {
    let (_, cert) = X509Certificate::from_der(der.as_ref())
        .map_err(|e| Error::Certificate(format!("Failed to parse certificate: {e}")))?;

    let sig_oid = cert.signature_algorithm.algorithm.to_id_string();
    let signature_algorithm = lookup(SIGNATURE_ALGORITHMS, &sig_oid)
        .map(AlgorithmIdentifier::from)
        .unwrap_or_else(|| AlgorithmIdentifier::new(sig_oid));

    Ok(CertificateAlgorithms {
        signature_algorithm,
        public_key: describe_public_key(cert.public_key())?,
    })
}

fn describe_public_key(spki: &SubjectPublicKeyInfo<'_>) -> Result<KeyDescriptor> {
    let key_oid = spki.algorithm.algorithm.to_id_string();
    let Some(algorithm) = lookup(KEY_ALGORITHMS, &key_oid) else {
        return Ok(KeyDescriptor::new(key_oid, None));
    };

    let key = match algorithm {
        "RSA" | "RSASSA-PSS" => match spki.parsed() {
            Ok(PublicKey::RSA(rsa)) => {
                let modulus_bits = KeyDescriptor::rsa_from_modulus(rsa.modulus).size_bits();
                KeyDescriptor::new(algorithm, modulus_bits)
            }
            _ => {
                return Err(Error::Certificate(
                    "Malformed RSA subject public key".to_string(),
                ))
            }
        },
        "EC" => {
            let curve_bits = spki
                .algorithm
                .parameters
                .as_ref()
                .and_then(|p| p.as_oid().ok())
                .and_then(|oid| lookup(NAMED_CURVES, &oid.to_id_string()));
            KeyDescriptor::new(algorithm, curve_bits)
        }
        "Ed25519" | "X25519" => KeyDescriptor::new(algorithm, Some(255)),
        "Ed448" | "X448" => KeyDescriptor::new(algorithm, Some(448)),
        _ => KeyDescriptor::new(algorithm, None),
    };

    Ok(key)
}

/// Algorithm name for a TLS handshake signature scheme
pub fn signature_scheme_algorithm(scheme: SignatureScheme) -> AlgorithmIdentifier {
    let name = match scheme {
        SignatureScheme::RSA_PKCS1_SHA1 => "SHA1withRSA",
        SignatureScheme::ECDSA_SHA1_Legacy => "SHA1withECDSA",
        SignatureScheme::RSA_PKCS1_SHA256 => "SHA256withRSA",
        SignatureScheme::RSA_PKCS1_SHA384 => "SHA384withRSA",
        SignatureScheme::RSA_PKCS1_SHA512 => "SHA512withRSA",
        SignatureScheme::ECDSA_NISTP256_SHA256 => "SHA256withECDSA",
        SignatureScheme::ECDSA_NISTP384_SHA384 => "SHA384withECDSA",
        SignatureScheme::ECDSA_NISTP521_SHA512 => "SHA512withECDSA",
        SignatureScheme::RSA_PSS_SHA256 => "SHA256withRSAandMGF1",
        SignatureScheme::RSA_PSS_SHA384 => "SHA384withRSAandMGF1",
        SignatureScheme::RSA_PSS_SHA512 => "SHA512withRSAandMGF1",
        SignatureScheme::ED25519 => "Ed25519",
        SignatureScheme::ED448 => "Ed448",
        other => return AlgorithmIdentifier::new(format!("{other:?}")),
    };
    AlgorithmIdentifier::new(name)
}
