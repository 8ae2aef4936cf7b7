//! Short, opaque group key names.

use dupe::Dupe;
use serde::{Deserialize, Serialize};
use std::{cmp::Ordering, fmt};
use thiserror::Error;

/// The longest permitted group key name, in bytes.
pub const MAX_KEY_NAME_LEN: usize = 32;

/// The name half of a [`GroupId`](super::id::GroupId).
///
/// Names are opaque bytes, at most [`MAX_KEY_NAME_LEN`] long, stored inline so
/// the type stays [`Copy`]. The empty name is the reserved base-group name.
#[derive(Clone, Copy, Dupe, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<u8>", into = "Vec<u8>")]
pub struct GroupKeyName {
    len: u8,
    bytes: [u8; MAX_KEY_NAME_LEN],
}

impl GroupKeyName {
    /// The reserved, empty base-group name.
    pub const BASE: GroupKeyName = GroupKeyName {
        len: 0,
        bytes: [0; MAX_KEY_NAME_LEN],
    };

    /// Copy `name` into a [`GroupKeyName`].
    ///
    /// # Examples
    ///
    /// ```
    /// # use access_group_core::group::key_name::{GroupKeyName, KeyNameTooLong};
    /// let name = GroupKeyName::new(b"friends").unwrap();
    /// assert_eq!(name.as_bytes(), b"friends");
    /// assert_eq!(GroupKeyName::new(&[7; 33]), Err(KeyNameTooLong(33)));
    /// ```
    pub fn new(name: &[u8]) -> Result<Self, KeyNameTooLong> {
        if name.len() > MAX_KEY_NAME_LEN {
            return Err(KeyNameTooLong(name.len()));
        }

        let mut bytes = [0; MAX_KEY_NAME_LEN];
        bytes[..name.len()].copy_from_slice(name);

        Ok(Self {
            len: name.len() as u8,
            bytes,
        })
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.len as usize]
    }

    pub fn len(&self) -> usize {
        self.len as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Group key name is {0} bytes, the maximum is 32")]
pub struct KeyNameTooLong(pub usize);

impl Default for GroupKeyName {
    fn default() -> Self {
        Self::BASE
    }
}

impl PartialOrd for GroupKeyName {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for GroupKeyName {
    fn cmp(&self, other: &Self) -> Ordering {
        self.as_bytes().cmp(other.as_bytes())
    }
}

impl TryFrom<Vec<u8>> for GroupKeyName {
    type Error = KeyNameTooLong;

    fn try_from(name: Vec<u8>) -> Result<Self, Self::Error> {
        Self::new(&name)
    }
}

impl TryFrom<&str> for GroupKeyName {
    type Error = KeyNameTooLong;

    fn try_from(name: &str) -> Result<Self, Self::Error> {
        Self::new(name.as_bytes())
    }
}

impl From<GroupKeyName> for Vec<u8> {
    fn from(name: GroupKeyName) -> Self {
        name.as_bytes().to_vec()
    }
}

impl fmt::Display for GroupKeyName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match std::str::from_utf8(self.as_bytes()) {
            Ok(s) => write!(f, "{:?}", s),
            Err(_) => crate::util::hex::bytes_as_hex(self.as_bytes().iter(), f),
        }
    }
}

impl fmt::Debug for GroupKeyName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "GroupKeyName({})", self)
    }
}

#[cfg(any(test, feature = "arbitrary"))]
impl<'a> arbitrary::Arbitrary<'a> for GroupKeyName {
    fn arbitrary(u: &mut arbitrary::Unstructured<'a>) -> arbitrary::Result<Self> {
        let len = u.int_in_range(0..=MAX_KEY_NAME_LEN)?;
        let bytes = u.bytes(len)?;
        Self::new(bytes).map_err(|_| arbitrary::Error::IncorrectFormat)
    }
}
