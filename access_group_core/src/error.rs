//! Error classification.
//!
//! Each operation returns its own error enum, and every variant names exactly
//! one violated invariant. [`ErrorKind`] is the flat classification shared by
//! all of them, for callers that only need to branch on _what_ went wrong.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    /// An input public key is not a valid curve point (or reuses the owner key).
    MalformedKey,

    /// A transaction targeted the reserved base-group name.
    ReservedNameViolation,

    /// A group key name exceeds the maximum length.
    KeyNameTooLong,

    /// The group already exists.
    DuplicateGroup,

    /// The group does not exist.
    GroupNotFound,

    /// The member is already in the group (or listed twice).
    DuplicateMember,

    /// An add-members request had no members.
    EmptyMemberList,

    /// The transaction signer does not own the group.
    Unauthorized,

    /// The transaction signature does not verify.
    InvalidSignature,

    /// The ledger read interface failed.
    UnavailableState,

    /// The ledger refused the transaction.
    TransactionRejected,

    /// A payload could not be encoded.
    Encoding,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}
