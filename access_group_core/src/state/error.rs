use crate::{
    error::ErrorKind,
    group::{
        error::{AddMembersError, CreateGroupError},
        id::GroupId,
    },
    key::PublicKey,
};
use thiserror::Error;

/// Why a committed transaction was rejected at application time.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApplyError {
    #[error("{issuer} does not own group {group}")]
    Unauthorized { issuer: PublicKey, group: GroupId },

    #[error(transparent)]
    CreateGroup(#[from] CreateGroupError),

    #[error(transparent)]
    AddMembers(#[from] AddMembersError),
}

impl ApplyError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ApplyError::Unauthorized { .. } => ErrorKind::Unauthorized,
            ApplyError::CreateGroup(e) => e.kind(),
            ApplyError::AddMembers(e) => e.kind(),
        }
    }
}
