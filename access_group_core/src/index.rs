//! The two-axis membership index.
//!
//! A materialized projection of committed group state, maintained in the same
//! step as the entries it indexes so that lookups never scan history:
//!
//! * owner axis: public key → groups it created, in commit order
//! * member axis: public key → groups it belongs to, in commit order
//!
//! Base groups are implicit and never appear in the owner axis; the query
//! layer prepends them.

use crate::{
    group::{entry::GroupEntry, id::GroupId},
    key::PublicKey,
    state::record::GroupRecord,
};
use serde::{Deserialize, Serialize};
use std::{
    collections::{BTreeMap, BTreeSet},
    sync::Arc,
};

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MembershipIndex {
    owned: BTreeMap<PublicKey, Vec<GroupId>>,
    member_of: BTreeMap<PublicKey, Vec<GroupId>>,

    /// Every key that has appeared as an owner, group key, or member.
    known: BTreeSet<PublicKey>,
}

impl MembershipIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild the index from scratch out of committed records.
    ///
    /// Groups are replayed by creation order and members by the position they
    /// were added at, so the result is identical to the incrementally
    /// maintained index.
    pub fn rebuild<'a, I: IntoIterator<Item = &'a Arc<GroupRecord>>>(records: I) -> Self {
        let mut groups = Vec::new();
        let mut members = Vec::new();

        for record in records {
            groups.push((record.created_at, record.entry.as_ref()));

            for (member, member_record) in record.members.iter() {
                members.push((member_record.added_at, *member, record.entry.id()));
            }
        }

        groups.sort_by_key(|(created_at, _)| *created_at);
        members.sort();

        let mut index = Self::new();

        for (_, entry) in groups {
            index.record_group(entry);
        }

        for (_, member, group_id) in members {
            index.record_member(group_id, member);
        }

        index
    }

    pub(crate) fn record_group(&mut self, entry: &GroupEntry) {
        self.owned.entry(entry.owner).or_default().push(entry.id());
        self.known.insert(entry.owner);
        self.known.insert(entry.group_public_key);
    }

    pub(crate) fn record_member(&mut self, group_id: GroupId, member: PublicKey) {
        self.member_of.entry(member).or_default().push(group_id);
        self.known.insert(member);
    }

    /// Explicitly created groups owned by `owner`, in commit order.
    pub fn owned_by(&self, owner: &PublicKey) -> &[GroupId] {
        self.owned.get(owner).map(Vec::as_slice).unwrap_or_default()
    }

    /// Groups `member` belongs to, in commit order.
    pub fn member_of(&self, member: &PublicKey) -> &[GroupId] {
        self.member_of
            .get(member)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn knows(&self, key: &PublicKey) -> bool {
        self.known.contains(key)
    }

    pub fn known_len(&self) -> usize {
        self.known.len()
    }
}
