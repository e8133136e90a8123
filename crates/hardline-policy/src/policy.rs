//! The algorithm acceptability policy

use crate::rule::Rule;
use hardline_core::{
    AlgorithmConstraints, AlgorithmIdentifier, AlgorithmParameters, Error, KeyDescriptor,
    MatchCase, PrimitiveSet, Result,
};
use std::fmt;
use tracing::debug;

/// Minimum RSA modulus length admitted by the baseline
pub const MIN_RSA_MODULUS_BITS: u32 = 2048;

/// Ordered, default-allow rejection policy.
///
/// Holds no mutable state, so one instance can be shared by any number of
/// concurrent handshakes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlgorithmPolicy {
    rules: Vec<Rule>,
}

impl AlgorithmPolicy {
    /// The hardened baseline: reject `MD5` (case-sensitive), reject RSA keys
    /// below 2048 bits. Nothing else.
    pub fn rfc7525() -> Self {
        Self::rfc7525_with_digest_match(MatchCase::Sensitive)
    }

    /// Baseline with an explicit choice of how `MD5` is matched
    pub fn rfc7525_with_digest_match(case: MatchCase) -> Self {
        Self {
            rules: vec![
                Rule::weak_digest(case),
                Rule::minimum_rsa_key_size(MIN_RSA_MODULUS_BITS),
            ],
        }
    }

    /// Policy made of exactly `rules`, evaluated in order
    pub fn from_rules(rules: Vec<Rule>) -> Self {
        Self { rules }
    }

    /// Append a rule after the existing ones
    pub fn with_rule(mut self, rule: Rule) -> Self {
        self.rules.push(rule);
        self
    }

    /// Rules in evaluation order
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Run the rules against an already-resolved identifier
    pub fn evaluate(&self, algorithm: &AlgorithmIdentifier, key: Option<&KeyDescriptor>) -> bool {
        match self.rules.iter().find(|rule| rule.rejects(algorithm, key)) {
            Some(rule) => {
                debug!(
                    algorithm = %algorithm,
                    key_family = ?key.map(KeyDescriptor::family),
                    key_bits = ?key.and_then(KeyDescriptor::size_bits),
                    rule = rule.kind(),
                    constraint = %rule,
                    "Algorithm rejected"
                );
                false
            }
            None => true,
        }
    }
}

impl Default for AlgorithmPolicy {
    fn default() -> Self {
        Self::rfc7525()
    }
}

impl fmt::Display for AlgorithmPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, rule) in self.rules.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{rule}")?;
        }
        Ok(())
    }
}

impl AlgorithmConstraints for AlgorithmPolicy {
    fn permits(
        &self,
        _primitives: &PrimitiveSet,
        algorithm: Option<&AlgorithmIdentifier>,
        key: Option<&KeyDescriptor>,
        _parameters: Option<&AlgorithmParameters>,
    ) -> Result<bool> {
        let algorithm = resolve_algorithm(algorithm, key)?;
        Ok(self.evaluate(&algorithm, key))
    }
}

/// Pick the identifier to evaluate: the explicit one, else the key's own
/// algorithm name.
pub fn resolve_algorithm(
    algorithm: Option<&AlgorithmIdentifier>,
    key: Option<&KeyDescriptor>,
) -> Result<AlgorithmIdentifier> {
    match (algorithm, key) {
        (Some(algorithm), _) => Ok(algorithm.clone()),
        (None, Some(key)) => Ok(AlgorithmIdentifier::new(key.algorithm())),
        (None, None) => Err(Error::InvalidArgument(
            "either an algorithm identifier or a key is required".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hardline_core::{CryptoPrimitive, KeyFamily};
    use proptest::prelude::*;
    use std::sync::Arc;

    fn signature() -> PrimitiveSet {
        CryptoPrimitive::Signature.only()
    }

    #[test]
    fn test_scenario_a_strong_rsa_signature() {
        let policy = AlgorithmPolicy::rfc7525();
        let permitted = policy
            .permits(
                &signature(),
                Some(&"SHA256withRSA".into()),
                Some(&KeyDescriptor::rsa(2048)),
                None,
            )
            .unwrap();
        assert!(permitted);
    }

    #[test]
    fn test_scenario_b_md5_signature() {
        let policy = AlgorithmPolicy::rfc7525();
        let permitted = policy
            .permits(
                &signature(),
                Some(&"MD5withRSA".into()),
                Some(&KeyDescriptor::rsa(2048)),
                None,
            )
            .unwrap();
        assert!(!permitted);
    }

    #[test]
    fn test_scenario_c_short_rsa_key_agreement() {
        let policy = AlgorithmPolicy::rfc7525();
        let permitted = policy
            .permits(
                &CryptoPrimitive::KeyAgreement.only(),
                None,
                Some(&KeyDescriptor::rsa(1024)),
                None,
            )
            .unwrap();
        assert!(!permitted);
    }

    #[test]
    fn test_scenario_d_ec_signature() {
        let policy = AlgorithmPolicy::rfc7525();
        let permitted = policy
            .permits(
                &signature(),
                Some(&"SHA256withECDSA".into()),
                Some(&KeyDescriptor::ec(256)),
                None,
            )
            .unwrap();
        assert!(permitted);
    }

    #[test]
    fn test_missing_algorithm_and_key() {
        let policy = AlgorithmPolicy::rfc7525();
        let result = policy.permits(&signature(), None, None, None);
        assert!(matches!(result, Err(Error::InvalidArgument(_))));
    }

    #[test]
    fn test_rsa_key_with_unknown_modulus_rejected() {
        let policy = AlgorithmPolicy::rfc7525();
        let key = KeyDescriptor::new("RSA", None);
        let permitted = policy
            .permits(&CryptoPrimitive::KeyAgreement.only(), None, Some(&key), None)
            .unwrap();
        assert!(!permitted);
    }

    #[test]
    fn test_resolve_prefers_explicit_identifier() {
        let key = KeyDescriptor::rsa(4096);
        let resolved = resolve_algorithm(Some(&"SHA384withRSA".into()), Some(&key)).unwrap();
        assert_eq!(resolved.as_str(), "SHA384withRSA");

        let resolved = resolve_algorithm(None, Some(&key)).unwrap();
        assert_eq!(resolved.as_str(), "RSA");
    }

    #[test]
    fn test_md5_match_is_case_sensitive_by_default() {
        let policy = AlgorithmPolicy::rfc7525();
        let primitives = signature();
        assert!(policy
            .permits_algorithm(&primitives, &"md5WithRSAEncryption".into(), None)
            .unwrap());
    }

    #[test]
    fn test_md5_match_case_insensitive_option() {
        let policy = AlgorithmPolicy::rfc7525_with_digest_match(MatchCase::Insensitive);
        let primitives = signature();
        assert!(!policy
            .permits_algorithm(&primitives, &"md5WithRSAEncryption".into(), None)
            .unwrap());
        assert!(policy
            .permits_algorithm(&primitives, &"SHA256withRSA".into(), None)
            .unwrap());
    }

    #[test]
    fn test_unknown_inputs_are_permitted() {
        let policy = AlgorithmPolicy::rfc7525();
        let empty = PrimitiveSet::new();
        assert!(policy
            .permits(&empty, Some(&"ML-KEM-768".into()), None, None)
            .unwrap());
        assert!(policy
            .permits_key(&empty, &KeyDescriptor::new("Ed25519", Some(256)))
            .unwrap());
        assert!(policy
            .permits(
                &empty,
                Some(&"SHA256withRSA".into()),
                None,
                Some(&AlgorithmParameters::new(vec![0x05, 0x00]))
            )
            .unwrap());
    }

    #[test]
    fn test_sha1_and_small_ec_are_not_rejected_by_baseline() {
        let policy = AlgorithmPolicy::rfc7525();
        let primitives = signature();
        assert!(policy
            .permits(&primitives, Some(&"SHA1withRSA".into()), None, None)
            .unwrap());
        assert!(policy.permits_key(&primitives, &KeyDescriptor::ec(160)).unwrap());
        assert!(policy
            .permits_key(&primitives, &KeyDescriptor::new("DSA", Some(1024)))
            .unwrap());
    }

    #[test]
    fn test_extra_rules_compose() {
        let policy = AlgorithmPolicy::rfc7525().with_rule(Rule::MinimumKeySize {
            family: KeyFamily::Ec,
            bits: 384,
        });
        let primitives = signature();
        assert!(!policy.permits_key(&primitives, &KeyDescriptor::ec(256)).unwrap());
        assert!(policy.permits_key(&primitives, &KeyDescriptor::ec(384)).unwrap());
        assert_eq!(policy.rules().len(), 3);
    }

    #[test]
    fn test_independent_policies_do_not_interfere() {
        let strict = AlgorithmPolicy::rfc7525_with_digest_match(MatchCase::Insensitive);
        let empty = AlgorithmPolicy::from_rules(Vec::new());
        let primitives = signature();
        let alg: AlgorithmIdentifier = "md5WithRSAEncryption".into();

        assert!(!strict.permits_algorithm(&primitives, &alg, None).unwrap());
        assert!(empty.permits_algorithm(&primitives, &alg, None).unwrap());
        assert!(empty.permits_key(&primitives, &KeyDescriptor::rsa(512)).unwrap());
    }

    #[test]
    fn test_shared_across_threads() {
        let policy: Arc<dyn AlgorithmConstraints> = Arc::new(AlgorithmPolicy::rfc7525());
        let handles: Vec<_> = (0..8u32)
            .map(|i| {
                let policy = Arc::clone(&policy);
                std::thread::spawn(move || {
                    let key = KeyDescriptor::rsa(1024 + i * 256);
                    policy.permits_key(&CryptoPrimitive::Signature.only(), &key).unwrap()
                })
            })
            .collect();

        let results: Vec<bool> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert_eq!(results, vec![false, false, false, false, true, true, true, true]);
    }

    #[test]
    fn test_display() {
        assert_eq!(AlgorithmPolicy::rfc7525().to_string(), "MD5, RSA keySize < 2048");
    }

    fn primitive_set() -> impl Strategy<Value = PrimitiveSet> {
        proptest::sample::subsequence(CryptoPrimitive::ALL.to_vec(), 0..=CryptoPrimitive::ALL.len())
            .prop_map(|v| v.into_iter().collect())
    }

    fn key() -> impl Strategy<Value = Option<KeyDescriptor>> {
        prop_oneof![
            Just(None),
            (1u32..8192).prop_map(|bits| Some(KeyDescriptor::rsa(bits))),
            (128u32..600).prop_map(|bits| Some(KeyDescriptor::ec(bits))),
            (0u32..4096).prop_map(|bits| Some(KeyDescriptor::new("DSA", Some(bits)))),
        ]
    }

    fn non_md5_name() -> impl Strategy<Value = String> {
        "[A-Za-z0-9-]{1,24}".prop_filter("must not mention MD5", |s| {
            !s.to_ascii_uppercase().contains("MD5")
        })
    }

    proptest! {
        #[test]
        fn prop_md5_always_rejected(
            prefix in "[A-Za-z0-9]{0,8}",
            suffix in "[A-Za-z0-9]{0,8}",
            primitives in primitive_set(),
            key in key(),
        ) {
            let policy = AlgorithmPolicy::rfc7525();
            let alg = AlgorithmIdentifier::new(format!("{prefix}MD5{suffix}"));
            prop_assert!(!policy.permits(&primitives, Some(&alg), key.as_ref(), None).unwrap());
        }

        #[test]
        fn prop_md5_any_case_rejected_when_insensitive(
            md5 in "[mM][dD]5",
            prefix in "[A-Za-z0-9]{0,8}",
            suffix in "[A-Za-z0-9]{0,8}",
        ) {
            let policy = AlgorithmPolicy::rfc7525_with_digest_match(MatchCase::Insensitive);
            let alg = AlgorithmIdentifier::new(format!("{prefix}{md5}{suffix}"));
            prop_assert!(!policy.permits_algorithm(&signature(), &alg, None).unwrap());
        }

        #[test]
        fn prop_short_rsa_always_rejected(
            bits in 0u32..2048,
            alg in proptest::option::of(non_md5_name()),
            primitives in primitive_set(),
        ) {
            let policy = AlgorithmPolicy::rfc7525();
            let alg = alg.map(AlgorithmIdentifier::new);
            let key = KeyDescriptor::rsa(bits);
            prop_assert!(!policy.permits(&primitives, alg.as_ref(), Some(&key), None).unwrap());
        }

        #[test]
        fn prop_strong_rsa_permitted(
            bits in 2048u32..16384,
            alg in non_md5_name(),
            primitives in primitive_set(),
        ) {
            let policy = AlgorithmPolicy::rfc7525();
            let key = KeyDescriptor::rsa(bits);
            let alg = AlgorithmIdentifier::new(alg);
            prop_assert!(policy.permits(&primitives, Some(&alg), Some(&key), None).unwrap());
        }

        #[test]
        fn prop_non_rsa_unconstrained(
            bits in 0u32..1024,
            family in prop_oneof![Just("EC"), Just("DSA"), Just("Ed25519"), Just("X25519")],
            alg in non_md5_name(),
        ) {
            let policy = AlgorithmPolicy::rfc7525();
            let key = KeyDescriptor::new(family, Some(bits));
            let alg = AlgorithmIdentifier::new(alg);
            prop_assert!(policy.permits(&signature(), Some(&alg), Some(&key), None).unwrap());
        }

        #[test]
        fn prop_idempotent(
            alg in proptest::option::of("[A-Za-z0-9]{1,16}"),
            key in key(),
            primitives in primitive_set(),
        ) {
            let policy = AlgorithmPolicy::rfc7525();
            let alg = alg.map(AlgorithmIdentifier::new);
            let first = policy.permits(&primitives, alg.as_ref(), key.as_ref(), None);
            let second = policy.permits(&primitives, alg.as_ref(), key.as_ref(), None);
            match (first, second) {
                (Ok(a), Ok(b)) => prop_assert_eq!(a, b),
                (Err(_), Err(_)) => prop_assert!(alg.is_none() && key.is_none()),
                _ => prop_assert!(false, "decisions diverged"),
            }
        }
    }
}
