//! Interfaces to the ledger that orders and commits transactions.
//!
//! The core never talks to a network itself. Reads go through [`LedgerRead`],
//! writes through [`LedgerSubmit`], and [`memory::MemoryLedger`] implements
//! both in-process.

pub mod memory;

use crate::{
    crypto::{digest::Digest, signed::VerificationError},
    error::ErrorKind,
    key::PublicKey,
    state::{error::ApplyError, LedgerState},
    txn::{Receipt, SignedTxn, TxnId},
};
use std::{
    fmt::{Debug, Display},
    future::Future,
    sync::Arc,
};
use thiserror::Error;

/// Read access to the authoritative committed state.
pub trait LedgerRead {
    type ReadError: Debug + Display;

    /// A complete, immutable snapshot. Later commits never alter it.
    fn current_state(&self) -> impl Future<Output = Result<Arc<LedgerState>, Self::ReadError>>;

    fn public_key_exists(
        &self,
        key: &PublicKey,
    ) -> impl Future<Output = Result<bool, Self::ReadError>> {
        async move {
            let state = self.current_state().await?;
            Ok(state.public_key_exists(key))
        }
    }
}

/// Delivery of signed transactions for ordering and application.
pub trait LedgerSubmit {
    /// Rejection is final for this attempt; nothing is retried.
    fn submit(
        &self,
        txn: SignedTxn,
    ) -> impl Future<Output = Result<Receipt, TransactionRejected>>;
}

#[derive(Debug, Error)]
#[error("transaction {txn_id} rejected: {reason}")]
pub struct TransactionRejected {
    pub txn_id: TxnId,
    pub reason: RejectionReason,
}

impl TransactionRejected {
    pub fn new(txn: &SignedTxn, reason: RejectionReason) -> Self {
        Self {
            txn_id: Digest::hash(txn),
            reason,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        ErrorKind::TransactionRejected
    }
}

#[derive(Debug, Error)]
pub enum RejectionReason {
    #[error(transparent)]
    InvalidSignature(#[from] VerificationError),

    #[error(transparent)]
    Invalid(#[from] ApplyError),

    #[error("ledger unavailable")]
    Unavailable,
}

impl RejectionReason {
    pub fn kind(&self) -> ErrorKind {
        match self {
            RejectionReason::InvalidSignature(_) => ErrorKind::InvalidSignature,
            RejectionReason::Invalid(e) => e.kind(),
            RejectionReason::Unavailable => ErrorKind::UnavailableState,
        }
    }
}
