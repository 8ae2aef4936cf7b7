//! Helpers for exercising the whole pipeline in tests.

use crate::{
    builder::{config::BuilderConfig, TransactionBuilder},
    crypto::{
        signed::SigningError,
        signer::{async_signer::AsyncSigner, memory::MemorySigner, sync_signer::SyncSigner},
    },
    group::{key_name::GroupKeyName, member::MemberEntry},
    key::PublicKey,
    ledger::{memory::MemoryLedger, LedgerSubmit, TransactionRejected},
    query::QueryService,
    txn::{fee::FeeMetadata, AddMembers, CreateGroup, Receipt, SignedTxn, TxnPayload, UnsignedTxn},
};
use nonempty::NonEmpty;
use proptest::prelude::*;
use thiserror::Error;

/// A memory ledger with a builder and query service reading from it.
#[derive(Debug, Clone)]
pub struct Harness {
    pub ledger: MemoryLedger,
    pub builder: TransactionBuilder<MemoryLedger>,
    pub query: QueryService<MemoryLedger>,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_config(BuilderConfig::default())
    }

    pub fn with_config(config: BuilderConfig) -> Self {
        let ledger = MemoryLedger::new();
        Self {
            builder: TransactionBuilder::new(ledger.clone(), config),
            query: QueryService::new(ledger.clone()),
            ledger,
        }
    }
}

impl Default for Harness {
    fn default() -> Self {
        Self::new()
    }
}

pub async fn sign_and_submit<S: AsyncSigner, L: LedgerSubmit>(
    signer: &S,
    ledger: &L,
    txn: UnsignedTxn,
) -> Result<Receipt, SignAndSubmitError> {
    let signed = signer.try_sign_async(txn).await?;
    Ok(ledger.submit(signed).await?)
}

#[derive(Debug, Error)]
pub enum SignAndSubmitError {
    #[error(transparent)]
    Signing(#[from] SigningError),

    #[error(transparent)]
    Rejected(#[from] TransactionRejected),
}

/// A signer whose key is derived from `seed`, so scripted runs are repeatable.
pub fn seeded_signer(seed: u8) -> MemorySigner {
    ed25519_dalek::SigningKey::from_bytes(&[seed; 32]).into()
}

/// A mutation in a scripted run, with keys and names given as small indices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptOp {
    Create {
        owner: u8,
        name: u8,
    },
    AddMembers {
        owner: u8,
        name: u8,
        members: Vec<(u8, Option<u8>)>,
    },
    /// An add-members transaction signed by `signer`, who is usually not the owner.
    Forged {
        signer: u8,
        owner: u8,
        name: u8,
        member: u8,
    },
}

fn key_name(name: u8) -> GroupKeyName {
    GroupKeyName::new(&[b'g', name]).unwrap_or_default()
}

fn group_key(owner: u8, name: u8) -> PublicKey {
    seeded_signer(owner.wrapping_mul(31).wrapping_add(name).wrapping_add(128)).public_key()
}

fn sign_payload(signer: &MemorySigner, payload: TxnPayload) -> Result<SignedTxn, SigningError> {
    let fees = FeeMetadata::for_payload(&payload, 0, vec![])?;
    signer.try_sign_sync(UnsignedTxn { payload, fees })
}

fn add_members(owner: u8, name: u8, members: &[(u8, Option<u8>)]) -> Option<TxnPayload> {
    let entries = members
        .iter()
        .map(|(member, addressed)| {
            let entry = MemberEntry::new(seeded_signer(*member).public_key(), vec![*member]);
            match addressed {
                Some(n) => entry.with_group_key_name(key_name(*n)),
                None => entry,
            }
        })
        .collect();

    Some(
        AddMembers {
            owner: seeded_signer(owner).public_key(),
            key_name: key_name(name),
            members: NonEmpty::from_vec(entries)?,
        }
        .into(),
    )
}

impl ScriptOp {
    /// Sign this operation. Many scripted transactions are deliberately invalid.
    pub fn to_signed(&self) -> Result<Option<SignedTxn>, SigningError> {
        match self {
            ScriptOp::Create { owner, name } => {
                let payload = CreateGroup {
                    owner: seeded_signer(*owner).public_key(),
                    key_name: key_name(*name),
                    group_public_key: group_key(*owner, *name),
                    extra_data: Default::default(),
                }
                .into();
                sign_payload(&seeded_signer(*owner), payload).map(Some)
            }
            ScriptOp::AddMembers {
                owner,
                name,
                members,
            } => match add_members(*owner, *name, members) {
                Some(payload) => sign_payload(&seeded_signer(*owner), payload).map(Some),
                None => Ok(None),
            },
            ScriptOp::Forged {
                signer,
                owner,
                name,
                member,
            } => match add_members(*owner, *name, &[(*member, None)]) {
                Some(payload) => sign_payload(&seeded_signer(*signer), payload).map(Some),
                None => Ok(None),
            },
        }
    }
}

/// Operations over `keys` participants and `names` group names per participant.
///
/// Small pools make duplicates and missing groups common.
pub fn arb_script_op(keys: u8, names: u8) -> impl Strategy<Value = ScriptOp> {
    let member = (0..keys, prop::option::weighted(0.2, 0..names));
    prop_oneof![
        3 => (0..keys, 0..names).prop_map(|(owner, name)| ScriptOp::Create { owner, name }),
        5 => (0..keys, 0..names, prop::collection::vec(member, 1..4)).prop_map(
            |(owner, name, members)| ScriptOp::AddMembers {
                owner,
                name,
                members
            }
        ),
        1 => (0..keys, 0..keys, 0..names, 0..keys).prop_map(|(signer, owner, name, member)| {
            ScriptOp::Forged {
                signer,
                owner,
                name,
                member,
            }
        }),
    ]
}

pub fn arb_script(keys: u8, names: u8, len: usize) -> impl Strategy<Value = Vec<ScriptOp>> {
    prop::collection::vec(arb_script_op(keys, names), 0..len)
}
