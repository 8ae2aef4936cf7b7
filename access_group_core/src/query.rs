//! Read-only projections over committed state.
//!
//! Every call takes exactly one snapshot from the ledger and answers from it,
//! so a result never mixes state from before and after a commit. If the
//! snapshot cannot be read the call fails immediately with
//! [`QueryError::UnavailableState`].

use crate::{
    error::ErrorKind,
    group::{entry::GroupEntry, id::GroupId, member::MemberEntry},
    key::PublicKey,
    ledger::LedgerRead,
    state::LedgerState,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use tracing::instrument;

/// A group that a key belongs to, with that key's own member entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Membership {
    pub group: GroupEntry,
    pub member: MemberEntry,
}

/// Everything visible to a single key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AccessGroups {
    /// The base group first, then created groups in commit order.
    pub owned: Vec<GroupEntry>,

    /// In commit order.
    pub member_of: Vec<Membership>,
}

#[derive(Debug, Clone)]
pub struct QueryService<R: LedgerRead> {
    ledger: R,
}

impl<R: LedgerRead> QueryService<R> {
    pub fn new(ledger: R) -> Self {
        Self { ledger }
    }

    async fn snapshot(&self) -> Result<Arc<LedgerState>, QueryError> {
        self.ledger
            .current_state()
            .await
            .map_err(|e| QueryError::UnavailableState(e.to_string()))
    }

    #[instrument(skip_all, fields(%owner))]
    pub async fn groups_owned(&self, owner: &PublicKey) -> Result<Vec<GroupEntry>, QueryError> {
        Ok(self.snapshot().await?.groups_owned(owner))
    }

    #[instrument(skip_all, fields(%member))]
    pub async fn groups_member_of(
        &self,
        member: &PublicKey,
    ) -> Result<Vec<Membership>, QueryError> {
        Ok(self.snapshot().await?.groups_member_of(member))
    }

    #[instrument(skip_all, fields(%key))]
    pub async fn all_groups(&self, key: &PublicKey) -> Result<AccessGroups, QueryError> {
        Ok(self.snapshot().await?.all_groups(key))
    }

    pub async fn group_info(&self, group_id: &GroupId) -> Result<GroupEntry, QueryError> {
        self.snapshot()
            .await?
            .group_entry(group_id)
            .ok_or(QueryError::GroupNotFound(*group_id))
    }

    /// `member`'s entry in `group_id`, or `None` if they are not a member.
    pub async fn member_info(
        &self,
        member: &PublicKey,
        group_id: &GroupId,
    ) -> Result<Option<MemberEntry>, QueryError> {
        let state = self.snapshot().await?;
        if !state.group_exists(group_id) {
            return Err(QueryError::GroupNotFound(*group_id));
        }

        Ok(state.member(group_id, member).cloned())
    }

    /// Up to `limit` members ordered by member key, starting after `start_after`.
    pub async fn group_members(
        &self,
        group_id: &GroupId,
        start_after: Option<&PublicKey>,
        limit: usize,
    ) -> Result<Vec<MemberEntry>, QueryError> {
        self.snapshot()
            .await?
            .members_page(group_id, start_after, limit)
            .ok_or(QueryError::GroupNotFound(*group_id))
    }

    pub async fn public_key_exists(&self, key: &PublicKey) -> Result<bool, QueryError> {
        Ok(self.snapshot().await?.public_key_exists(key))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    #[error("Ledger state unavailable: {0}")]
    UnavailableState(String),

    #[error("Group {0} not found")]
    GroupNotFound(GroupId),
}

impl QueryError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            QueryError::UnavailableState(_) => ErrorKind::UnavailableState,
            QueryError::GroupNotFound(_) => ErrorKind::GroupNotFound,
        }
    }
}
