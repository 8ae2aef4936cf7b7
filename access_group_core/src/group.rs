//! The group identity model.
//!
//! A group is addressed by its owner's [`PublicKey`] and a short opaque key
//! name. The empty key name is reserved: it names the _base group_ that every
//! public key owns implicitly. Base groups are never written to the ledger.
//! They are computed on demand, so a key that has never been seen before still
//! owns exactly one group whose group key is the owner's own key.

pub mod entry;
pub mod error;
pub mod id;
pub mod key_name;
pub mod member;

use self::{id::GroupId, key_name::GroupKeyName};
use crate::key::PublicKey;

/// The identity of `owner`'s base group.
///
/// This is total: every public key has a base group.
///
/// # Examples
///
/// ```
/// # use access_group_core::{group::{default_group, is_reserved_name}, key::PublicKey};
/// let owner = PublicKey::generate(&mut rand::thread_rng());
/// let base = default_group(owner);
/// assert_eq!(base.owner, owner);
/// assert!(is_reserved_name(base.key_name.as_bytes()));
/// ```
pub fn default_group(owner: PublicKey) -> GroupId {
    GroupId::base(owner)
}

/// Whether `name` is reserved for implicit base-group semantics.
///
/// Only the empty name is reserved.
pub fn is_reserved_name(name: &[u8]) -> bool {
    name.is_empty()
}

impl GroupKeyName {
    /// Whether this is the reserved base-group name.
    pub fn is_reserved(&self) -> bool {
        is_reserved_name(self.as_bytes())
    }
}
