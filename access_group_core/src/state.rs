//! Committed access-group state and the transition function over it.
//!
//! [`LedgerState::apply`] is the authoritative, deterministic state
//! transition. It runs once per transaction, strictly in ledger order, and
//! either commits the whole transaction (entries _and_ both index axes) or
//! nothing at all. Preconditions checked by the builder are checked again here
//! against the committed state, so when two conflicting transactions race the
//! first one in ledger order wins and the other is rejected.
//!
//! Only ordered maps are iterated, and nothing reads a clock or an RNG, so any
//! two replicas fed the same transactions in the same order end up equal.

pub mod error;
pub mod record;

use self::{
    error::ApplyError,
    record::{CommitPosition, GroupRecord, MemberRecord},
};
use crate::{
    group::{
        entry::GroupEntry,
        error::{AddMembersError, CreateGroupError},
        id::GroupId,
        member::MemberEntry,
    },
    index::MembershipIndex,
    key::PublicKey,
    query::{AccessGroups, Membership},
    stats::Stats,
    txn::{AddMembers, CommitSeq, CreateGroup, SignedTxn, TxnPayload},
};
use serde::{Deserialize, Serialize};
use std::{
    collections::{BTreeMap, BTreeSet},
    ops::Bound,
    sync::Arc,
};
use tracing::instrument;

/// A consistent snapshot of every committed group, member, and the index.
///
/// Snapshots are cheap to clone: rows are shared behind [`Arc`] and only the
/// touched group is copied when a transaction is applied to a clone.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LedgerState {
    groups: BTreeMap<GroupId, Arc<GroupRecord>>,
    index: MembershipIndex,
    next_seq: CommitSeq,
}

impl LedgerState {
    pub fn new() -> Self {
        Self::default()
    }

    /// The sequence number the next applied transaction will receive.
    ///
    /// Also the number of transactions applied so far.
    pub fn next_seq(&self) -> CommitSeq {
        self.next_seq
    }

    pub fn index(&self) -> &MembershipIndex {
        &self.index
    }

    /// Explicitly created groups, ordered by [`GroupId`].
    pub fn records(&self) -> impl Iterator<Item = &Arc<GroupRecord>> {
        self.groups.values()
    }

    pub fn record(&self, group_id: &GroupId) -> Option<&Arc<GroupRecord>> {
        self.groups.get(group_id)
    }

    /// Whether the group exists, counting implicit base groups.
    pub fn group_exists(&self, group_id: &GroupId) -> bool {
        group_id.is_base() || self.groups.contains_key(group_id)
    }

    /// Look up a group entry, computing it for base groups.
    pub fn group_entry(&self, group_id: &GroupId) -> Option<GroupEntry> {
        if group_id.is_base() {
            return Some(GroupEntry::base(group_id.owner));
        }

        self.groups
            .get(group_id)
            .map(|record| record.entry.as_ref().clone())
    }

    pub fn member(&self, group_id: &GroupId, member: &PublicKey) -> Option<&MemberEntry> {
        self.groups
            .get(group_id)?
            .members
            .get(member)
            .map(|record| record.entry.as_ref())
    }

    /// Whether `key` has appeared anywhere in committed state.
    pub fn public_key_exists(&self, key: &PublicKey) -> bool {
        self.index.knows(key)
    }

    pub fn check_create_group(&self, create: &CreateGroup) -> Result<(), CreateGroupError> {
        create.check_well_formed()?;

        let group_id = create.group_id();
        if self.groups.contains_key(&group_id) {
            return Err(CreateGroupError::DuplicateGroup(group_id));
        }

        Ok(())
    }

    pub fn check_add_members(&self, add: &AddMembers) -> Result<(), AddMembersError> {
        add.check_well_formed()?;

        let group_id = add.group_id();
        let record = self
            .groups
            .get(&group_id)
            .ok_or(AddMembersError::GroupNotFound(group_id))?;

        let mut seen = BTreeSet::new();
        for member in add.members.iter() {
            let key = member.member_public_key;
            if !seen.insert(key) || record.is_member(&key) {
                return Err(AddMembersError::DuplicateMember {
                    group: group_id,
                    member: key,
                });
            }

            let addressed = member.addressed_group();
            if !self.group_exists(&addressed) {
                return Err(AddMembersError::GroupNotFound(addressed));
            }
        }

        Ok(())
    }

    /// Check that `txn` would apply cleanly, without applying it.
    pub fn check(&self, txn: &SignedTxn) -> Result<(), ApplyError> {
        let payload = &txn.payload().payload;
        let issuer = txn.issuer_key();

        if issuer != payload.owner() {
            return Err(ApplyError::Unauthorized {
                issuer,
                group: payload.group_id(),
            });
        }

        match payload {
            TxnPayload::CreateGroup(create) => self.check_create_group(create)?,
            TxnPayload::AddMembers(add) => self.check_add_members(add)?,
        }

        Ok(())
    }

    /// Apply a committed transaction in place.
    ///
    /// All checks run before anything is written, so on error `self` is
    /// untouched.
    #[instrument(
        skip_all,
        fields(seq = self.next_seq, group = %txn.payload().payload.group_id())
    )]
    pub fn apply(&mut self, txn: &SignedTxn) -> Result<CommitSeq, ApplyError> {
        if let Err(err) = self.check(txn) {
            tracing::warn!(%err, "rejecting transaction");
            return Err(err);
        }

        let seq = self.next_seq;

        match &txn.payload().payload {
            TxnPayload::CreateGroup(create) => {
                let record = GroupRecord::new(create.to_entry(), seq);
                self.index.record_group(&record.entry);
                self.groups.insert(create.group_id(), Arc::new(record));
            }
            TxnPayload::AddMembers(add) => {
                let group_id = add.group_id();
                let record = self
                    .groups
                    .get_mut(&group_id)
                    .ok_or(AddMembersError::GroupNotFound(group_id))?;

                let record = Arc::make_mut(record);
                for (slot, member) in add.members.iter().enumerate() {
                    record.members.insert(
                        member.member_public_key,
                        MemberRecord {
                            entry: Arc::new(member.clone()),
                            added_at: CommitPosition {
                                seq,
                                slot: slot as u32,
                            },
                        },
                    );
                    self.index.record_member(group_id, member.member_public_key);
                }
            }
        }

        self.next_seq += 1;
        tracing::debug!("applied transaction");
        Ok(seq)
    }

    /// The pure form of [`apply`](Self::apply): `(pre-state, txn) → post-state`.
    pub fn transition(&self, txn: &SignedTxn) -> Result<LedgerState, ApplyError> {
        let mut next = self.clone();
        next.apply(txn)?;
        Ok(next)
    }

    /// Rebuild the index from committed rows alone.
    ///
    /// Always equal to [`index`](Self::index).
    pub fn rebuilt_index(&self) -> MembershipIndex {
        MembershipIndex::rebuild(self.groups.values())
    }

    /// `owner`'s base group, then the groups they created in commit order.
    pub fn groups_owned(&self, owner: &PublicKey) -> Vec<GroupEntry> {
        std::iter::once(GroupEntry::base(*owner))
            .chain(
                self.index
                    .owned_by(owner)
                    .iter()
                    .filter_map(|group_id| self.groups.get(group_id))
                    .map(|record| record.entry.as_ref().clone()),
            )
            .collect()
    }

    /// Every group `member` belongs to, paired with their own member entry.
    pub fn groups_member_of(&self, member: &PublicKey) -> Vec<Membership> {
        self.index
            .member_of(member)
            .iter()
            .filter_map(|group_id| {
                let record = self.groups.get(group_id)?;
                let member_record = record.members.get(member)?;
                Some(Membership {
                    group: record.entry.as_ref().clone(),
                    member: member_record.entry.as_ref().clone(),
                })
            })
            .collect()
    }

    pub fn all_groups(&self, key: &PublicKey) -> AccessGroups {
        AccessGroups {
            owned: self.groups_owned(key),
            member_of: self.groups_member_of(key),
        }
    }

    /// Members of a group ordered by member key, starting after `start_after`.
    ///
    /// Returns `None` if the group does not exist. Base groups exist but have
    /// no explicit members.
    pub fn members_page(
        &self,
        group_id: &GroupId,
        start_after: Option<&PublicKey>,
        limit: usize,
    ) -> Option<Vec<MemberEntry>> {
        if group_id.is_base() {
            return Some(vec![]);
        }

        let record = self.groups.get(group_id)?;
        let lower = match start_after {
            Some(key) => Bound::Excluded(*key),
            None => Bound::Unbounded,
        };

        Some(
            record
                .members
                .range((lower, Bound::Unbounded))
                .take(limit)
                .map(|(_, member)| member.entry.as_ref().clone())
                .collect(),
        )
    }

    pub fn stats(&self) -> Stats {
        Stats {
            groups: self.groups.len() as u64,
            members: self
                .groups
                .values()
                .map(|record| record.members.len() as u64)
                .sum(),
            committed_txns: self.next_seq,
            known_keys: self.index.known_len() as u64,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        crypto::signer::{memory::MemorySigner, sync_signer::SyncSigner},
        error::ErrorKind,
        group::key_name::GroupKeyName,
        txn::{fee::FeeMetadata, UnsignedTxn},
    };
    use nonempty::{nonempty, NonEmpty};
    use pretty_assertions::assert_eq;

    fn sign(signer: &MemorySigner, payload: impl Into<TxnPayload>) -> SignedTxn {
        let payload = payload.into();
        let fees = FeeMetadata::for_payload(&payload, 1000, vec![]).unwrap();
        signer.try_sign_sync(UnsignedTxn { payload, fees }).unwrap()
    }

    fn create(owner: &MemorySigner, name: &str) -> CreateGroup {
        CreateGroup {
            owner: owner.public_key(),
            key_name: GroupKeyName::try_from(name).unwrap(),
            group_public_key: PublicKey::generate(&mut rand::thread_rng()),
            extra_data: Default::default(),
        }
    }

    fn add(owner: &MemorySigner, name: &str, members: NonEmpty<MemberEntry>) -> AddMembers {
        AddMembers {
            owner: owner.public_key(),
            key_name: GroupKeyName::try_from(name).unwrap(),
            members,
        }
    }

    #[test]
    fn test_create_then_add() {
        test_utils::init_logging();
        let mut csprng = rand::thread_rng();
        let alice = MemorySigner::generate(&mut csprng);
        let bob = MemorySigner::generate(&mut csprng);

        let mut state = LedgerState::new();
        assert_eq!(state.apply(&sign(&alice, create(&alice, "friends"))), Ok(0));

        let member = MemberEntry::new(bob.public_key(), vec![1, 2, 3]);
        assert_eq!(
            state.apply(&sign(&alice, add(&alice, "friends", nonempty![member.clone()]))),
            Ok(1)
        );

        let group_id = GroupId::new(alice.public_key(), GroupKeyName::try_from("friends").unwrap());
        assert_eq!(state.member(&group_id, &bob.public_key()), Some(&member));
        assert_eq!(state.index().member_of(&bob.public_key()), &[group_id]);
        assert_eq!(state.next_seq(), 2);
        assert!(state.public_key_exists(&bob.public_key()));
    }

    #[test]
    fn test_base_group_is_computed() {
        let alice = PublicKey::generate(&mut rand::thread_rng());
        let state = LedgerState::new();

        assert!(state.group_exists(&GroupId::base(alice)));
        assert_eq!(
            state.group_entry(&GroupId::base(alice)),
            Some(GroupEntry::base(alice))
        );
        assert_eq!(state.groups_owned(&alice), vec![GroupEntry::base(alice)]);
        assert!(!state.public_key_exists(&alice));
    }

    #[test]
    fn test_create_with_reserved_name() {
        let alice = MemorySigner::generate(&mut rand::thread_rng());
        let mut txn = create(&alice, "x");
        txn.key_name = GroupKeyName::BASE;

        let err = LedgerState::new().check_create_group(&txn).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ReservedNameViolation);
    }

    #[test]
    fn test_create_reusing_owner_key() {
        let alice = MemorySigner::generate(&mut rand::thread_rng());
        let mut txn = create(&alice, "x");
        txn.group_public_key = alice.public_key();

        let err = LedgerState::new().check_create_group(&txn).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedKey);
    }

    #[test]
    fn test_duplicate_group_leaves_state_untouched() {
        let alice = MemorySigner::generate(&mut rand::thread_rng());
        let mut state = LedgerState::new();
        state.apply(&sign(&alice, create(&alice, "g"))).unwrap();
        let before = state.clone();

        let err = state.apply(&sign(&alice, create(&alice, "g"))).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DuplicateGroup);
        assert_eq!(state, before);
    }

    #[test]
    fn test_add_to_missing_group() {
        let mut csprng = rand::thread_rng();
        let alice = MemorySigner::generate(&mut csprng);
        let bob = PublicKey::generate(&mut csprng);

        let err = LedgerState::new()
            .check_add_members(&add(&alice, "nope", nonempty![MemberEntry::new(bob, vec![])]))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::GroupNotFound);
    }

    #[test]
    fn test_add_duplicate_in_same_list_is_atomic() {
        let mut csprng = rand::thread_rng();
        let alice = MemorySigner::generate(&mut csprng);
        let bob = PublicKey::generate(&mut csprng);
        let carol = PublicKey::generate(&mut csprng);

        let mut state = LedgerState::new();
        state.apply(&sign(&alice, create(&alice, "g"))).unwrap();
        let before = state.clone();

        let members = nonempty![
            MemberEntry::new(carol, vec![]),
            MemberEntry::new(bob, vec![]),
            MemberEntry::new(bob, vec![9])
        ];
        let err = state
            .apply(&sign(&alice, add(&alice, "g", members)))
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::DuplicateMember);
        assert_eq!(state, before);
        assert!(state.index().member_of(&carol).is_empty());
    }

    #[test]
    fn test_member_addressed_to_unknown_group() {
        let mut csprng = rand::thread_rng();
        let alice = MemorySigner::generate(&mut csprng);
        let bob = PublicKey::generate(&mut csprng);

        let mut state = LedgerState::new();
        state.apply(&sign(&alice, create(&alice, "g"))).unwrap();

        let member = MemberEntry::new(bob, vec![])
            .with_group_key_name(GroupKeyName::try_from("bobs-devices").unwrap());
        let err = state
            .check_add_members(&add(&alice, "g", nonempty![member]))
            .unwrap_err();

        assert_eq!(
            err,
            AddMembersError::GroupNotFound(GroupId::new(
                bob,
                GroupKeyName::try_from("bobs-devices").unwrap()
            ))
        );
    }

    #[test]
    fn test_non_owner_signer_is_unauthorized() {
        let mut csprng = rand::thread_rng();
        let alice = MemorySigner::generate(&mut csprng);
        let mallory = MemorySigner::generate(&mut csprng);

        let err = LedgerState::new()
            .apply(&sign(&mallory, create(&alice, "g")))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unauthorized);
    }

    #[test]
    fn test_transition_does_not_mutate_input() {
        let alice = MemorySigner::generate(&mut rand::thread_rng());
        let state = LedgerState::new();

        let next = state.transition(&sign(&alice, create(&alice, "g"))).unwrap();
        assert_eq!(state, LedgerState::new());
        assert_eq!(next.stats().groups, 1);
    }

    #[test]
    fn test_members_page() {
        let mut csprng = rand::thread_rng();
        let alice = MemorySigner::generate(&mut csprng);
        let mut keys: Vec<PublicKey> = (0..5).map(|_| PublicKey::generate(&mut csprng)).collect();

        let mut state = LedgerState::new();
        state.apply(&sign(&alice, create(&alice, "g"))).unwrap();
        let members =
            NonEmpty::from_vec(keys.iter().map(|k| MemberEntry::new(*k, vec![])).collect())
                .unwrap();
        state.apply(&sign(&alice, add(&alice, "g", members))).unwrap();

        keys.sort();
        let group_id = GroupId::new(alice.public_key(), GroupKeyName::try_from("g").unwrap());

        let first = state.members_page(&group_id, None, 2).unwrap();
        let first_keys: Vec<_> = first.iter().map(|m| m.member_public_key).collect();
        assert_eq!(first_keys, keys[..2].to_vec());

        let rest = state.members_page(&group_id, Some(&keys[1]), 10).unwrap();
        let rest_keys: Vec<_> = rest.iter().map(|m| m.member_public_key).collect();
        assert_eq!(rest_keys, keys[2..].to_vec());

        assert_eq!(
            state.members_page(&GroupId::base(alice.public_key()), None, 10),
            Some(vec![])
        );
        assert_eq!(
            state.members_page(
                &GroupId::new(alice.public_key(), GroupKeyName::try_from("nope").unwrap()),
                None,
                10
            ),
            None
        );
    }

    #[test]
    fn test_rebuilt_index_matches() {
        let mut csprng = rand::thread_rng();
        let alice = MemorySigner::generate(&mut csprng);
        let bob = MemorySigner::generate(&mut csprng);

        let mut state = LedgerState::new();
        state.apply(&sign(&alice, create(&alice, "b"))).unwrap();
        state.apply(&sign(&bob, create(&bob, "a"))).unwrap();
        state.apply(&sign(&alice, create(&alice, "a"))).unwrap();
        state
            .apply(&sign(
                &alice,
                add(&alice, "a", nonempty![MemberEntry::new(bob.public_key(), vec![])]),
            ))
            .unwrap();
        state
            .apply(&sign(
                &bob,
                add(&bob, "a", nonempty![MemberEntry::new(alice.public_key(), vec![])]),
            ))
            .unwrap();
        state
            .apply(&sign(
                &alice,
                add(&alice, "b", nonempty![MemberEntry::new(bob.public_key(), vec![])]),
            ))
            .unwrap();

        assert_eq!(state.rebuilt_index(), *state.index());
        let owned: Vec<_> = state
            .groups_owned(&alice.public_key())
            .iter()
            .map(|g| g.key_name.as_bytes().to_vec())
            .collect();
        assert_eq!(owned, vec![b"".to_vec(), b"b".to_vec(), b"a".to_vec()]);
    }
}
