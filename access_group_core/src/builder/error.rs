use crate::{
    error::ErrorKind,
    group::error::{AddMembersError, CreateGroupError},
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BuildCreateGroupError {
    #[error(transparent)]
    Invalid(#[from] CreateGroupError),

    #[error("Ledger state unavailable: {0}")]
    UnavailableState(String),

    #[error("Failed to encode transaction: {0}")]
    Encoding(#[from] bincode::Error),
}

impl BuildCreateGroupError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            BuildCreateGroupError::Invalid(e) => e.kind(),
            BuildCreateGroupError::UnavailableState(_) => ErrorKind::UnavailableState,
            BuildCreateGroupError::Encoding(_) => ErrorKind::Encoding,
        }
    }
}

#[derive(Debug, Error)]
pub enum BuildAddMembersError {
    #[error(transparent)]
    Invalid(#[from] AddMembersError),

    #[error("Ledger state unavailable: {0}")]
    UnavailableState(String),

    #[error("Failed to encode transaction: {0}")]
    Encoding(#[from] bincode::Error),
}

impl BuildAddMembersError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            BuildAddMembersError::Invalid(e) => e.kind(),
            BuildAddMembersError::UnavailableState(_) => ErrorKind::UnavailableState,
            BuildAddMembersError::Encoding(_) => ErrorKind::Encoding,
        }
    }
}
