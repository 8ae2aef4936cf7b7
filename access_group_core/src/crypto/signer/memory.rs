//! In-memory signer.

use super::sync_signer::SyncSigner;
use crate::{
    crypto::{signed::SigningError, verifiable::Verifiable},
    key::PublicKey,
};
use dupe::Dupe;
use ed25519_dalek::Signer;
use std::hash::Hash;

/// An in-memory signer backed by an Ed25519 signing key.
///
/// <div class="warning">
///
/// An in-memory signing key can be leaked. Wallets should prefer an
/// [`AsyncSigner`] over a non-extractable key.
///
/// </div>
///
/// [`AsyncSigner`]: crate::crypto::signer::async_signer::AsyncSigner
#[derive(Debug, Clone)]
pub struct MemorySigner(
    /// Raw underlying Ed25519 signing key.
    pub ed25519_dalek::SigningKey,
);

impl MemorySigner {
    /// Randomly generates a new in-memory signer.
    ///
    /// # Examples
    ///
    /// ```
    /// # use access_group_core::crypto::{
    /// #    signer::memory::MemorySigner,
    /// #    verifiable::Verifiable
    /// # };
    /// let signer = MemorySigner::generate(&mut rand::rngs::OsRng);
    /// assert_eq!(signer.verifying_key().to_bytes().len(), 32);
    /// ```
    pub fn generate<R: rand::CryptoRng + rand::RngCore>(csprng: &mut R) -> Self {
        Self(ed25519_dalek::SigningKey::generate(csprng))
    }

    /// The [`PublicKey`] this signer signs for.
    pub fn public_key(&self) -> PublicKey {
        self.verifying_key().into()
    }
}

impl SyncSigner for MemorySigner {
    fn try_sign_bytes_sync(
        &self,
        payload_bytes: &[u8],
    ) -> Result<ed25519_dalek::Signature, SigningError> {
        self.0
            .try_sign(payload_bytes)
            .map_err(SigningError::SigningFailed)
    }
}

impl Hash for MemorySigner {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.verifying_key().hash(state);
    }
}

impl Dupe for MemorySigner {
    fn dupe(&self) -> Self {
        Self(self.0.clone())
    }
}

impl PartialEq for MemorySigner {
    fn eq(&self, other: &Self) -> bool {
        self.verifying_key() == other.verifying_key()
    }
}

impl Eq for MemorySigner {}

impl From<ed25519_dalek::SigningKey> for MemorySigner {
    fn from(key: ed25519_dalek::SigningKey) -> Self {
        Self(key)
    }
}

impl Verifiable for MemorySigner {
    fn verifying_key(&self) -> ed25519_dalek::VerifyingKey {
        self.0.verifying_key()
    }
}
