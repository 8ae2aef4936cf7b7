//! Group-mutation transactions.
//!
//! A transaction is built unsigned by the
//! [`TransactionBuilder`](crate::builder::TransactionBuilder), signed by an
//! external [signer](crate::crypto::signer), submitted to the ledger, and
//! finally applied by [`LedgerState`](crate::state::LedgerState) in ledger
//! order.

pub mod fee;

use self::fee::FeeMetadata;
use crate::{
    crypto::{digest::Digest, signed::Signed},
    group::{
        entry::{ExtraData, GroupEntry},
        error::{AddMembersError, CreateGroupError},
        id::GroupId,
        key_name::GroupKeyName,
        member::MemberEntry,
    },
    key::{KeyError, PublicKey},
};
use derive_more::From;
use nonempty::NonEmpty;
use serde::{Deserialize, Serialize};

/// Create a new named group owned by `owner`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CreateGroup {
    pub owner: PublicKey,
    pub key_name: GroupKeyName,
    pub group_public_key: PublicKey,
    pub extra_data: ExtraData,
}

impl CreateGroup {
    pub fn group_id(&self) -> GroupId {
        GroupId::new(self.owner, self.key_name)
    }

    /// Checks that need no ledger state.
    pub fn check_well_formed(&self) -> Result<(), CreateGroupError> {
        if self.key_name.is_reserved() {
            return Err(CreateGroupError::ReservedNameViolation(self.owner));
        }

        if self.group_public_key == self.owner {
            return Err(KeyError::ReusesOwnerKey(self.group_public_key).into());
        }

        Ok(())
    }

    /// The entry this transaction commits.
    pub fn to_entry(&self) -> GroupEntry {
        GroupEntry {
            owner: self.owner,
            key_name: self.key_name,
            group_public_key: self.group_public_key,
            extra_data: self.extra_data.clone(),
        }
    }
}

/// Add one or more members to an existing group owned by `owner`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AddMembers {
    pub owner: PublicKey,
    pub key_name: GroupKeyName,
    pub members: NonEmpty<MemberEntry>,
}

impl AddMembers {
    pub fn group_id(&self) -> GroupId {
        GroupId::new(self.owner, self.key_name)
    }

    /// Checks that need no ledger state.
    ///
    /// An empty member list is unrepresentable here; see
    /// [`AddMembersError::EmptyMemberList`] for where it is caught.
    pub fn check_well_formed(&self) -> Result<(), AddMembersError> {
        if self.key_name.is_reserved() {
            return Err(AddMembersError::ReservedNameViolation(self.owner));
        }

        Ok(())
    }
}

/// The state mutation a transaction requests.
#[derive(Debug, Clone, PartialEq, Eq, Hash, From, Serialize, Deserialize)]
pub enum TxnPayload {
    CreateGroup(CreateGroup),
    AddMembers(AddMembers),
}

impl TxnPayload {
    /// The key that must sign this transaction.
    pub fn owner(&self) -> PublicKey {
        match self {
            TxnPayload::CreateGroup(create) => create.owner,
            TxnPayload::AddMembers(add) => add.owner,
        }
    }

    /// The group this transaction mutates.
    pub fn group_id(&self) -> GroupId {
        match self {
            TxnPayload::CreateGroup(create) => create.group_id(),
            TxnPayload::AddMembers(add) => add.group_id(),
        }
    }
}

/// A transaction ready to hand to an external signer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UnsignedTxn {
    pub payload: TxnPayload,
    pub fees: FeeMetadata,
}

/// An [`UnsignedTxn`] signed by its issuer.
pub type SignedTxn = Signed<UnsignedTxn>;

/// The identifier of a signed transaction.
pub type TxnId = Digest<SignedTxn>;

/// Zero-based position of a transaction in ledger order.
pub type CommitSeq = u64;

/// Proof that the ledger accepted and applied a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Receipt {
    pub txn_id: TxnId,
    pub commit_seq: CommitSeq,
}
