//! Algorithm constraint trait
//!
//! The seam between a handshake engine and whatever decides which algorithms
//! and keys are acceptable. The engine calls in; implementations answer with
//! a plain admit/reject.

use crate::algorithm::{AlgorithmIdentifier, AlgorithmParameters};
use crate::error::Result;
use crate::key::KeyDescriptor;
use crate::primitive::PrimitiveSet;
use std::fmt::Debug;

/// Pluggable predicate consulted during certificate path validation and
/// parameter negotiation.
///
/// `Ok(false)` is a rejection. `Err` is reserved for malformed requests,
/// such as a call that supplies neither an algorithm nor a key.
pub trait AlgorithmConstraints: Debug + Send + Sync {
    /// Decide whether `algorithm` and/or `key` may be used for `primitives`
    fn permits(
        &self,
        primitives: &PrimitiveSet,
        algorithm: Option<&AlgorithmIdentifier>,
        key: Option<&KeyDescriptor>,
        parameters: Option<&AlgorithmParameters>,
    ) -> Result<bool>;

    /// Check an algorithm name on its own
    fn permits_algorithm(
        &self,
        primitives: &PrimitiveSet,
        algorithm: &AlgorithmIdentifier,
        parameters: Option<&AlgorithmParameters>,
    ) -> Result<bool> {
        self.permits(primitives, Some(algorithm), None, parameters)
    }

    /// Check a key on its own; the identifier is taken from the key
    fn permits_key(&self, primitives: &PrimitiveSet, key: &KeyDescriptor) -> Result<bool> {
        self.permits(primitives, None, Some(key), None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitive::CryptoPrimitive;
    use std::sync::Mutex;

    #[derive(Debug, Default)]
    struct Recorder {
        calls: Mutex<Vec<(Option<String>, Option<String>)>>,
    }

    impl AlgorithmConstraints for Recorder {
        fn permits(
            &self,
            _primitives: &PrimitiveSet,
            algorithm: Option<&AlgorithmIdentifier>,
            key: Option<&KeyDescriptor>,
            _parameters: Option<&AlgorithmParameters>,
        ) -> Result<bool> {
            self.calls.lock().unwrap().push((
                algorithm.map(|a| a.to_string()),
                key.map(|k| k.algorithm().to_string()),
            ));
            Ok(true)
        }
    }

    #[test]
    fn test_default_methods_forward_to_permits() {
        let recorder = Recorder::default();
        let primitives = CryptoPrimitive::Signature.only();

        recorder
            .permits_algorithm(&primitives, &"SHA256withRSA".into(), None)
            .unwrap();
        recorder
            .permits_key(&primitives, &KeyDescriptor::rsa(2048))
            .unwrap();

        let calls = recorder.calls.lock().unwrap();
        assert_eq!(calls[0], (Some("SHA256withRSA".to_string()), None));
        assert_eq!(calls[1], (None, Some("RSA".to_string())));
    }
}
