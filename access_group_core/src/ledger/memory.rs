//! An in-process ledger.

use super::{LedgerRead, LedgerSubmit, RejectionReason, TransactionRejected};
use crate::{
    archive::{LedgerArchive, ReplayError},
    crypto::digest::Digest,
    state::LedgerState,
    txn::{Receipt, SignedTxn},
};
use dupe::Dupe;
use futures::lock::Mutex;
use std::{fmt, sync::Arc};
use thiserror::Error;
use tracing::instrument;

/// A single-writer ledger that commits transactions in arrival order.
///
/// Submission holds the lock for the whole verify-apply step, which makes it
/// the critical section that serializes every mutation. Readers only take the
/// lock long enough to clone the current snapshot [`Arc`]. Applying copies the
/// state only if such a snapshot is still alive, so a held snapshot never sees
/// later commits.
#[derive(Clone, Default)]
pub struct MemoryLedger(Arc<Mutex<Inner>>);

struct Inner {
    state: Arc<LedgerState>,
    log: Vec<Arc<SignedTxn>>,
    available: bool,
}

impl Default for Inner {
    fn default() -> Self {
        Self {
            state: Arc::new(LedgerState::new()),
            log: Vec::new(),
            available: true,
        }
    }
}

impl MemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// While unavailable, reads fail and submissions are rejected.
    pub async fn set_available(&self, available: bool) {
        self.0.lock().await.available = available;
    }

    pub async fn len(&self) -> usize {
        self.0.lock().await.log.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.0.lock().await.log.is_empty()
    }

    pub async fn into_archive(&self) -> LedgerArchive {
        let locked = self.0.lock().await;
        LedgerArchive {
            committed: locked.log.iter().map(|txn| txn.as_ref().clone()).collect(),
        }
    }

    pub fn try_from_archive(archive: &LedgerArchive) -> Result<Self, ReplayError> {
        let state = LedgerState::try_from_archive(archive)?;
        Ok(Self(Arc::new(Mutex::new(Inner {
            state: Arc::new(state),
            log: archive.committed.iter().cloned().map(Arc::new).collect(),
            available: true,
        }))))
    }
}

impl Dupe for MemoryLedger {
    fn dupe(&self) -> Self {
        Self(self.0.dupe())
    }
}

impl fmt::Debug for MemoryLedger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("MemoryLedger").finish_non_exhaustive()
    }
}

impl LedgerRead for MemoryLedger {
    type ReadError = LedgerUnavailable;

    async fn current_state(&self) -> Result<Arc<LedgerState>, LedgerUnavailable> {
        let locked = self.0.lock().await;
        if !locked.available {
            return Err(LedgerUnavailable);
        }

        Ok(locked.state.dupe())
    }
}

impl LedgerSubmit for MemoryLedger {
    #[instrument(skip_all, fields(issuer = %txn.issuer_key()))]
    async fn submit(&self, txn: SignedTxn) -> Result<Receipt, TransactionRejected> {
        let mut locked = self.0.lock().await;
        if !locked.available {
            return Err(TransactionRejected::new(&txn, RejectionReason::Unavailable));
        }

        if let Err(err) = txn.try_verify() {
            tracing::warn!(%err, "bad signature");
            return Err(TransactionRejected::new(&txn, err.into()));
        }

        // Rejection happens before any write, so on error the state is
        // untouched. The copy only happens while a reader holds the snapshot.
        let commit_seq = match Arc::make_mut(&mut locked.state).apply(&txn) {
            Ok(seq) => seq,
            Err(err) => return Err(TransactionRejected::new(&txn, err.into())),
        };

        let receipt = Receipt {
            txn_id: Digest::hash(&txn),
            commit_seq,
        };

        locked.log.push(Arc::new(txn));

        tracing::debug!(commit_seq = receipt.commit_seq, "committed");
        Ok(receipt)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("ledger unavailable")]
pub struct LedgerUnavailable;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        crypto::signer::{memory::MemorySigner, sync_signer::SyncSigner},
        error::ErrorKind,
        group::key_name::GroupKeyName,
        key::PublicKey,
        txn::{fee::FeeMetadata, CreateGroup, TxnPayload, UnsignedTxn},
    };
    use pretty_assertions::assert_eq;
    use testresult::TestResult;

    fn create_group(signer: &MemorySigner, name: &str) -> SignedTxn {
        let payload: TxnPayload = CreateGroup {
            owner: signer.public_key(),
            key_name: GroupKeyName::try_from(name).unwrap(),
            group_public_key: PublicKey::generate(&mut rand::thread_rng()),
            extra_data: Default::default(),
        }
        .into();
        let fees = FeeMetadata::for_payload(&payload, 1000, vec![]).unwrap();
        signer.try_sign_sync(UnsignedTxn { payload, fees }).unwrap()
    }

    #[tokio::test]
    async fn test_commit_seq_follows_arrival() -> TestResult {
        test_utils::init_logging();
        let alice = MemorySigner::generate(&mut rand::thread_rng());
        let ledger = MemoryLedger::new();

        let first = create_group(&alice, "one");
        let first_id = Digest::hash(&first);

        let receipt = ledger.submit(first).await?;
        assert_eq!(receipt.commit_seq, 0);
        assert_eq!(receipt.txn_id, first_id);
        assert_eq!(ledger.submit(create_group(&alice, "two")).await?.commit_seq, 1);
        assert_eq!(ledger.len().await, 2);
        Ok(())
    }

    #[tokio::test]
    async fn test_snapshot_is_not_affected_by_later_commits() -> TestResult {
        let alice = MemorySigner::generate(&mut rand::thread_rng());
        let ledger = MemoryLedger::new();

        let before = ledger.current_state().await?;
        ledger.submit(create_group(&alice, "one")).await?;
        let after = ledger.current_state().await?;

        assert_eq!(before.stats().groups, 0);
        assert_eq!(after.stats().groups, 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_rejection_leaves_unshared_state_untouched() -> TestResult {
        let alice = MemorySigner::generate(&mut rand::thread_rng());
        let ledger = MemoryLedger::new();
        ledger.submit(create_group(&alice, "one")).await?;

        // No snapshot outlives this statement, so the next apply runs in place.
        let expected = LedgerState::clone(&*ledger.current_state().await?);

        let err = ledger
            .submit(create_group(&alice, "one"))
            .await
            .unwrap_err();
        assert_eq!(err.reason.kind(), ErrorKind::DuplicateGroup);
        assert_eq!(*ledger.current_state().await?, expected);
        assert_eq!(ledger.len().await, 1);

        let receipt = ledger.submit(create_group(&alice, "two")).await?;
        assert_eq!(receipt.commit_seq, 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_tampered_signature_is_rejected() {
        let mut csprng = rand::thread_rng();
        let alice = MemorySigner::generate(&mut csprng);
        let ledger = MemoryLedger::new();

        let mut txn = create_group(&alice, "one");
        txn.payload.fees.fee_nanos += 1;

        let err = ledger.submit(txn).await.unwrap_err();
        assert_eq!(err.reason.kind(), ErrorKind::InvalidSignature);
        assert!(ledger.is_empty().await);
    }

    #[tokio::test]
    async fn test_unavailable() -> TestResult {
        let alice = MemorySigner::generate(&mut rand::thread_rng());
        let ledger = MemoryLedger::new();
        ledger.set_available(false).await;

        assert_eq!(ledger.current_state().await.unwrap_err(), LedgerUnavailable);
        let err = ledger.submit(create_group(&alice, "one")).await.unwrap_err();
        assert_eq!(err.reason.kind(), ErrorKind::UnavailableState);

        ledger.set_available(true).await;
        ledger.submit(create_group(&alice, "one")).await?;
        Ok(())
    }

    #[tokio::test]
    async fn test_archive_round_trip() -> TestResult {
        let alice = MemorySigner::generate(&mut rand::thread_rng());
        let ledger = MemoryLedger::new();
        ledger.submit(create_group(&alice, "one")).await?;
        ledger.submit(create_group(&alice, "two")).await?;

        let restored = MemoryLedger::try_from_archive(&ledger.into_archive().await)?;
        assert_eq!(
            restored.current_state().await?,
            ledger.current_state().await?
        );
        assert_eq!(restored.len().await, 2);
        Ok(())
    }
}
