//! Committed rows.

use crate::{
    group::{entry::GroupEntry, member::MemberEntry},
    key::PublicKey,
    txn::CommitSeq,
};
use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, sync::Arc};

/// Where in ledger order a member was added.
///
/// `slot` is the member's position within its add-members transaction.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct CommitPosition {
    pub seq: CommitSeq,
    pub slot: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MemberRecord {
    pub entry: Arc<MemberEntry>,
    pub added_at: CommitPosition,
}

/// A committed group and the members it exclusively owns.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GroupRecord {
    pub entry: Arc<GroupEntry>,
    pub created_at: CommitSeq,
    pub members: BTreeMap<PublicKey, MemberRecord>,
}

impl GroupRecord {
    pub fn new(entry: GroupEntry, created_at: CommitSeq) -> Self {
        Self {
            entry: Arc::new(entry),
            created_at,
            members: BTreeMap::new(),
        }
    }

    pub fn is_member(&self, key: &PublicKey) -> bool {
        self.members.contains_key(key)
    }
}
