//! Public keys of ledger identities.

use crate::crypto::verifiable::Verifiable;
use dupe::Dupe;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The public half of a ledger identity.
///
/// This is a newtype for a [`VerifyingKey`](ed25519_dalek::VerifyingKey).
/// Every well-formed public key owns a base group, whether or not it has ever
/// appeared on the ledger.
#[derive(Copy, Serialize, Deserialize)]
pub struct PublicKey(pub ed25519_dalek::VerifyingKey);

impl PublicKey {
    /// Parse a public key from its compressed 32-byte encoding.
    ///
    /// # Examples
    ///
    /// ```
    /// # use access_group_core::key::{KeyError, PublicKey};
    /// assert_eq!(
    ///     PublicKey::try_from_slice(&[1, 2, 3]),
    ///     Err(KeyError::InvalidLength(3))
    /// );
    /// ```
    pub fn try_from_slice(bytes: &[u8]) -> Result<Self, KeyError> {
        let arr = <[u8; 32]>::try_from(bytes).map_err(|_| KeyError::InvalidLength(bytes.len()))?;
        let vk = ed25519_dalek::VerifyingKey::from_bytes(&arr).map_err(|_| KeyError::InvalidPoint)?;
        Ok(Self(vk))
    }

    #[cfg(any(feature = "test_utils", test))]
    pub fn generate<R: rand::CryptoRng + rand::RngCore>(csprng: &mut R) -> Self {
        ed25519_dalek::SigningKey::generate(csprng)
            .verifying_key()
            .into()
    }

    /// Lower the [`PublicKey`] to an owned binary representation.
    pub fn to_bytes(&self) -> [u8; 32] {
        self.0.to_bytes()
    }

    /// Lower the [`PublicKey`] to a borrowed binary representation.
    pub fn as_bytes(&self) -> &[u8; 32] {
        self.0.as_bytes()
    }

    pub fn as_slice(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum KeyError {
    #[error("Public key must be 32 bytes, got {0}")]
    InvalidLength(usize),

    #[error("Public key is not a valid curve point")]
    InvalidPoint,

    #[error("Group key {0} is the owner's own key")]
    ReusesOwnerKey(PublicKey),
}

#[cfg(any(test, feature = "arbitrary"))]
impl<'a> arbitrary::Arbitrary<'a> for PublicKey {
    fn arbitrary(u: &mut arbitrary::Unstructured<'a>) -> arbitrary::Result<Self> {
        let bytes = u.bytes(32)?;
        let arr = <[u8; 32]>::try_from(bytes).map_err(|_| arbitrary::Error::NotEnoughData)?;
        let key = ed25519_dalek::SigningKey::from_bytes(&arr);
        Ok(key.verifying_key().into())
    }
}

impl Clone for PublicKey {
    fn clone(&self) -> Self {
        *self
    }
}

impl Dupe for PublicKey {
    fn dupe(&self) -> Self {
        *self
    }
}

impl std::hash::Hash for PublicKey {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.0.as_bytes().hash(state)
    }
}

impl std::fmt::LowerHex for PublicKey {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        crate::util::hex::bytes_as_hex(self.0.as_bytes().iter(), f)
    }
}

impl std::fmt::Display for PublicKey {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{:#x}", self)
    }
}

impl std::fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "PublicKey({})", self)
    }
}

impl PartialEq for PublicKey {
    fn eq(&self, other: &Self) -> bool {
        self.as_bytes() == other.as_bytes()
    }
}

impl Eq for PublicKey {}

impl PartialOrd for PublicKey {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for PublicKey {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.as_bytes().cmp(other.as_bytes())
    }
}

impl Verifiable for PublicKey {
    fn verifying_key(&self) -> ed25519_dalek::VerifyingKey {
        self.0
    }
}

impl From<ed25519_dalek::VerifyingKey> for PublicKey {
    fn from(verifying_key: ed25519_dalek::VerifyingKey) -> Self {
        Self(verifying_key)
    }
}

impl From<&ed25519_dalek::VerifyingKey> for PublicKey {
    fn from(verifying_key: &ed25519_dalek::VerifyingKey) -> Self {
        Self(*verifying_key)
    }
}

impl From<PublicKey> for ed25519_dalek::VerifyingKey {
    fn from(key: PublicKey) -> Self {
        key.0
    }
}

impl TryFrom<&[u8]> for PublicKey {
    type Error = KeyError;

    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        PublicKey::try_from_slice(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_round_trip() {
        let pk = PublicKey::generate(&mut rand::thread_rng());
        assert_eq!(PublicKey::try_from_slice(pk.as_slice()), Ok(pk));
    }

    #[test]
    fn test_rejects_off_curve_bytes() {
        // Roughly half of all y-coordinates have no matching x, so one of these is off the curve
        let off_curve = (0u8..=255)
            .map(|i| {
                let mut bytes = [0u8; 32];
                bytes[0] = i;
                bytes[1] = 0x80;
                bytes
            })
            .find(|bytes| ed25519_dalek::VerifyingKey::from_bytes(bytes).is_err())
            .expect("some candidate to be off the curve");

        assert_eq!(
            PublicKey::try_from_slice(&off_curve),
            Err(KeyError::InvalidPoint)
        );
    }

    #[test]
    fn test_display_is_prefixed_hex() {
        let pk = PublicKey::generate(&mut rand::thread_rng());
        assert_eq!(pk.to_string(), format!("0x{}", hex::encode(pk.to_bytes())));
    }
}
