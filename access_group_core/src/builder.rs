//! Construct unsigned group-mutation transactions.
//!
//! The builder validates raw caller input, checks it against one ledger
//! snapshot, and prices the result. It never signs or submits: the returned
//! [`UnsignedTxn`] goes to an external signer, then to
//! [`LedgerSubmit`](crate::ledger::LedgerSubmit).
//!
//! Passing the builder's checks is no guarantee of acceptance. The snapshot may
//! be stale by the time the transaction is ordered, so the ledger checks again
//! when it applies it.

pub mod config;
pub mod error;

use self::{
    config::BuilderConfig,
    error::{BuildAddMembersError, BuildCreateGroupError},
};
use crate::{
    group::{
        entry::ExtraData,
        error::{AddMembersError, CreateGroupError},
        key_name::GroupKeyName,
        member::MemberEntry,
    },
    key::PublicKey,
    ledger::LedgerRead,
    txn::{fee::FeeMetadata, AddMembers, CreateGroup, TxnPayload, UnsignedTxn},
};
use nonempty::NonEmpty;
use tracing::instrument;

#[derive(Debug, Clone)]
pub struct TransactionBuilder<R: LedgerRead> {
    ledger: R,
    config: BuilderConfig,
}

impl<R: LedgerRead> TransactionBuilder<R> {
    pub fn new(ledger: R, config: BuilderConfig) -> Self {
        Self { ledger, config }
    }

    pub fn config(&self) -> &BuilderConfig {
        &self.config
    }

    /// Build a transaction creating the group `(owner, group_key_name)`.
    ///
    /// Malformed input is reported before the ledger is read.
    #[instrument(skip_all, fields(%owner))]
    pub async fn build_create_group(
        &self,
        owner: PublicKey,
        group_public_key: &[u8],
        group_key_name: &[u8],
        extra_data: ExtraData,
    ) -> Result<UnsignedTxn, BuildCreateGroupError> {
        let key_name = GroupKeyName::new(group_key_name).map_err(CreateGroupError::from)?;
        if key_name.is_reserved() {
            return Err(CreateGroupError::ReservedNameViolation(owner).into());
        }

        let group_public_key =
            PublicKey::try_from_slice(group_public_key).map_err(CreateGroupError::from)?;

        let create = CreateGroup {
            owner,
            key_name,
            group_public_key,
            extra_data,
        };
        create.check_well_formed()?;

        let state = self
            .ledger
            .current_state()
            .await
            .map_err(|e| BuildCreateGroupError::UnavailableState(e.to_string()))?;

        state.check_create_group(&create)?;

        Ok(self.price(create.into())?)
    }

    /// Build a transaction adding `members` to `(owner, group_key_name)`.
    #[instrument(skip_all, fields(%owner, members = members.len()))]
    pub async fn build_add_members(
        &self,
        owner: PublicKey,
        group_key_name: &[u8],
        members: Vec<MemberEntry>,
    ) -> Result<UnsignedTxn, BuildAddMembersError> {
        let key_name = GroupKeyName::new(group_key_name).map_err(AddMembersError::from)?;
        if key_name.is_reserved() {
            return Err(AddMembersError::ReservedNameViolation(owner).into());
        }

        let members = NonEmpty::from_vec(members).ok_or(AddMembersError::EmptyMemberList)?;

        let add = AddMembers {
            owner,
            key_name,
            members,
        };

        let state = self
            .ledger
            .current_state()
            .await
            .map_err(|e| BuildAddMembersError::UnavailableState(e.to_string()))?;

        state.check_add_members(&add)?;

        Ok(self.price(add.into())?)
    }

    fn price(&self, payload: TxnPayload) -> Result<UnsignedTxn, bincode::Error> {
        let fees = FeeMetadata::for_payload(
            &payload,
            self.config.min_fee_rate_nanos_per_kb,
            self.config.additional_fees.clone(),
        )?;

        Ok(UnsignedTxn { payload, fees })
    }
}
