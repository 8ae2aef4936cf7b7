use super::{entry::ExtraData, id::GroupId, key_name::GroupKeyName};
use crate::key::PublicKey;
use serde::{Deserialize, Serialize};

/// A member of a group, carrying the group secret encrypted for that member.
///
/// `encrypted_key` is opaque here: it is stored and returned byte-for-byte.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(any(test, feature = "arbitrary"), derive(arbitrary::Arbitrary))]
pub struct MemberEntry {
    pub member_public_key: PublicKey,

    /// Which of the member's own groups the encrypted key is addressed to.
    /// Usually the member's base group.
    pub member_group_key_name: GroupKeyName,

    pub encrypted_key: Vec<u8>,
    pub extra_data: ExtraData,
}

impl MemberEntry {
    /// A member addressed through their base group.
    pub fn new(member_public_key: PublicKey, encrypted_key: Vec<u8>) -> Self {
        Self {
            member_public_key,
            member_group_key_name: GroupKeyName::BASE,
            encrypted_key,
            extra_data: ExtraData::new(),
        }
    }

    pub fn with_group_key_name(mut self, member_group_key_name: GroupKeyName) -> Self {
        self.member_group_key_name = member_group_key_name;
        self
    }

    pub fn with_extra_data(mut self, extra_data: ExtraData) -> Self {
        self.extra_data = extra_data;
        self
    }

    /// The member-owned group that `encrypted_key` targets.
    pub fn addressed_group(&self) -> GroupId {
        GroupId::new(self.member_public_key, self.member_group_key_name)
    }
}
