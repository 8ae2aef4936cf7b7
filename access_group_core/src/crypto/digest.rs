//! Typed hashes.

use serde::{Deserialize, Serialize};
use std::{
    fmt,
    hash::{Hash, Hasher},
    marker::PhantomData,
};

/// A [`blake3::Hash`] tagged with which type it is a hash of.
///
/// Transaction identifiers are `Digest<SignedTxn>`, which keeps them from
/// being confused with hashes of any other payload.
///
/// # Examples
///
/// ```
/// # use access_group_core::crypto::digest::Digest;
/// #
/// let string_hash: Digest<String> = Digest::hash(&"hello world".to_string());
/// let bytes_hash: Digest<Vec<u8>> = Digest::hash(&vec![42, 99]);
/// assert_ne!(string_hash.as_slice(), bytes_hash.as_slice());
/// ```
#[derive(Debug)]
pub struct Digest<T: Serialize> {
    /// The underlying, unparameterized [`blake3::Hash`].
    pub raw: blake3::Hash,

    pub(crate) _phantom: PhantomData<T>,
}

impl<T: Serialize> Digest<T> {
    /// Digest a value over its canonical `bincode` encoding.
    pub fn hash(preimage: &T) -> Self {
        // Every type hashed here is plain data with derived `Serialize`
        let bytes: Vec<u8> = bincode::serialize(&preimage).expect("unable to serialize to bytes");

        Self {
            raw: blake3::hash(bytes.as_slice()),
            _phantom: PhantomData,
        }
    }

    /// Get the hash as a byte slice.
    pub fn as_slice(&self) -> &[u8] {
        self.raw.as_bytes()
    }
}

impl<T: Serialize> Serialize for Digest<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.raw.as_bytes().serialize(serializer)
    }
}

impl<'de, T: Serialize> Deserialize<'de> for Digest<T> {
    fn deserialize<D>(deserializer: D) -> Result<Digest<T>, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let bytes: [u8; 32] = Deserialize::deserialize(deserializer)?;
        Ok(bytes.into())
    }
}

impl<T: Serialize> fmt::Display for Digest<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Digest({})", self.raw.to_hex())
    }
}

impl<T: Serialize> Copy for Digest<T> {}

impl<T: Serialize> Clone for Digest<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: Serialize> PartialEq for Digest<T> {
    fn eq(&self, other: &Self) -> bool {
        self.raw.as_bytes() == other.raw.as_bytes()
    }
}

impl<T: Serialize> Eq for Digest<T> {}

impl<T: Serialize> PartialOrd for Digest<T> {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl<T: Serialize> Ord for Digest<T> {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.raw.as_bytes().cmp(other.raw.as_bytes())
    }
}

impl<T: Serialize> Hash for Digest<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.raw.hash(state)
    }
}

impl<T: Serialize> From<[u8; 32]> for Digest<T> {
    fn from(bytes: [u8; 32]) -> Self {
        Self {
            raw: blake3::Hash::from(bytes),
            _phantom: PhantomData,
        }
    }
}

impl<T: Serialize> From<Digest<T>> for [u8; 32] {
    fn from(hash: Digest<T>) -> [u8; 32] {
        hash.raw.into()
    }
}
