//! Archive of committed ledger history.

use crate::{
    crypto::signed::VerificationError,
    state::{error::ApplyError, LedgerState},
    txn::SignedTxn,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::instrument;

/// Every committed transaction, in ledger order.
///
/// State is never archived directly: it is a pure function of this log and
/// is recovered with [`LedgerState::try_from_archive`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerArchive {
    pub committed: Vec<SignedTxn>,
}

impl LedgerArchive {
    pub fn len(&self) -> usize {
        self.committed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.committed.is_empty()
    }
}

impl LedgerState {
    /// Re-verify and replay an archive from the empty state.
    #[instrument(skip_all, fields(txns = archive.len()))]
    pub fn try_from_archive(archive: &LedgerArchive) -> Result<Self, ReplayError> {
        let mut state = LedgerState::new();

        for (index, txn) in archive.committed.iter().enumerate() {
            txn.try_verify()
                .map_err(|source| ReplayError::InvalidSignature { index, source })?;

            state
                .apply(txn)
                .map_err(|source| ReplayError::Rejected { index, source })?;
        }

        Ok(state)
    }
}

#[derive(Debug, Error)]
pub enum ReplayError {
    #[error("archived transaction {index} has an invalid signature: {source}")]
    InvalidSignature {
        index: usize,
        source: VerificationError,
    },

    #[error("archived transaction {index} does not apply: {source}")]
    Rejected { index: usize, source: ApplyError },
}
