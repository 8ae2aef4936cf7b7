use super::{id::GroupId, key_name::KeyNameTooLong};
use crate::{
    error::ErrorKind,
    key::{KeyError, PublicKey},
};
use thiserror::Error;

/// Why a group cannot be created.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CreateGroupError {
    #[error("The base group of {0} is implicit and cannot be created")]
    ReservedNameViolation(PublicKey),

    #[error(transparent)]
    KeyNameTooLong(#[from] KeyNameTooLong),

    #[error("Malformed group key: {0}")]
    MalformedKey(#[from] KeyError),

    #[error("Group {0} already exists")]
    DuplicateGroup(GroupId),
}

impl CreateGroupError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CreateGroupError::ReservedNameViolation(_) => ErrorKind::ReservedNameViolation,
            CreateGroupError::KeyNameTooLong(_) => ErrorKind::KeyNameTooLong,
            CreateGroupError::MalformedKey(_) => ErrorKind::MalformedKey,
            CreateGroupError::DuplicateGroup(_) => ErrorKind::DuplicateGroup,
        }
    }
}

/// Why members cannot be added to a group.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AddMembersError {
    #[error("The base group of {0} cannot have explicit members")]
    ReservedNameViolation(PublicKey),

    #[error(transparent)]
    KeyNameTooLong(#[from] KeyNameTooLong),

    #[error("Group {0} not found")]
    GroupNotFound(GroupId),

    #[error("{member} is already a member of {group}")]
    DuplicateMember { group: GroupId, member: PublicKey },

    #[error("No members to add")]
    EmptyMemberList,
}

impl AddMembersError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AddMembersError::ReservedNameViolation(_) => ErrorKind::ReservedNameViolation,
            AddMembersError::KeyNameTooLong(_) => ErrorKind::KeyNameTooLong,
            AddMembersError::GroupNotFound(_) => ErrorKind::GroupNotFound,
            AddMembersError::DuplicateMember { .. } => ErrorKind::DuplicateMember,
            AddMembersError::EmptyMemberList => ErrorKind::EmptyMemberList,
        }
    }
}
