use crate::address::Address;
use ed25519_dalek::{Signature, Signer, SigningKey, Verifier, VerifyingKey};
use rand::RngCore;

/// A signing identity that acts as transaction source.
#[derive(Clone)]
pub struct Identity {
    signing_key: SigningKey,
}

impl Identity {
    pub fn generate() -> Self {
        let mut seed = [0u8; 32];
        rand::thread_rng().fill_bytes(&mut seed);
        Self::from_seed(seed)
    }

    pub fn from_seed(seed: [u8; 32]) -> Self {
        Self {
            signing_key: SigningKey::from_bytes(&seed),
        }
    }

    pub fn public_key(&self) -> [u8; 32] {
        self.signing_key.verifying_key().to_bytes()
    }

    pub fn address(&self) -> Address {
        Address::Account(self.public_key())
    }

    pub fn sign(&self, digest: &[u8]) -> [u8; 64] {
        self.signing_key.sign(digest).to_bytes()
    }
}

impl std::fmt::Debug for Identity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Identity")
            .field("address", &self.address())
            .finish()
    }
}

/// Check an ed25519 signature produced by [`Identity::sign`].
pub fn verify_signature(public_key: &[u8; 32], digest: &[u8], signature: &[u8; 64]) -> bool {
    let Ok(vk) = VerifyingKey::from_bytes(public_key) else {
        return false;
    };
    vk.verify(digest, &Signature::from_bytes(signature)).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_identities_differ() {
        let a = Identity::generate();
        let b = Identity::generate();
        assert_ne!(a.address(), b.address());
    }

    #[test]
    fn test_seeded_identity_is_stable() {
        let a = Identity::from_seed([5u8; 32]);
        let b = Identity::from_seed([5u8; 32]);
        assert_eq!(a.address(), b.address());
        assert_eq!(a.address(), Address::Account(a.public_key()));
    }

    #[test]
    fn test_sign_and_verify() {
        let id = Identity::from_seed([1u8; 32]);
        let sig = id.sign(b"payload");
        assert!(verify_signature(&id.public_key(), b"payload", &sig));
        assert!(!verify_signature(&id.public_key(), b"tampered", &sig));
    }
}
