use super::{id::GroupId, key_name::GroupKeyName};
use crate::key::PublicKey;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Opaque application metadata attached to groups and members.
///
/// Ordered so that encodings (and therefore signatures and digests) are
/// deterministic.
pub type ExtraData = BTreeMap<String, Vec<u8>>;

/// A group as recorded on the ledger.
///
/// Identity fields never change after creation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GroupEntry {
    pub owner: PublicKey,
    pub key_name: GroupKeyName,

    /// The shared key used to address the group.
    pub group_public_key: PublicKey,

    pub extra_data: ExtraData,
}

impl GroupEntry {
    /// The computed entry for `owner`'s base group.
    ///
    /// Its group key is the owner's own key and it carries no extra data.
    pub fn base(owner: PublicKey) -> Self {
        Self {
            owner,
            key_name: GroupKeyName::BASE,
            group_public_key: owner,
            extra_data: ExtraData::new(),
        }
    }

    pub fn id(&self) -> GroupId {
        GroupId::new(self.owner, self.key_name)
    }

    pub fn is_base(&self) -> bool {
        self.key_name.is_reserved()
    }
}
