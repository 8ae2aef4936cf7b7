//! Fee metadata attached to unsigned transactions.

use super::TxnPayload;
use crate::key::PublicKey;
use serde::{Deserialize, Serialize};

/// An extra fee paid to a specific key on top of the network fee.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FeeOutput {
    pub public_key: PublicKey,
    pub amount_nanos: u64,
}

/// Everything the signer needs to know about what a transaction costs.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FeeMetadata {
    pub fee_rate_nanos_per_kb: u64,

    /// Network fee for the signed transaction's size, rounded up.
    pub fee_nanos: u64,

    pub additional_fees: Vec<FeeOutput>,
}

impl FeeMetadata {
    /// Size the signed form of `payload` and price it at `fee_rate_nanos_per_kb`.
    ///
    /// The size covers everything the ledger stores: the payload, this fee
    /// metadata, and the issuer key and signature of the envelope. Integers
    /// are fixed width, so filling in `fee_nanos` does not change the size.
    pub fn for_payload(
        payload: &TxnPayload,
        fee_rate_nanos_per_kb: u64,
        additional_fees: Vec<FeeOutput>,
    ) -> Result<Self, bincode::Error> {
        let mut fees = Self {
            fee_rate_nanos_per_kb,
            fee_nanos: 0,
            additional_fees,
        };

        let size = bincode::serialized_size(payload)?
            + bincode::serialized_size(&fees)?
            + signed_envelope_size(&payload.owner())?;

        fees.fee_nanos = size.saturating_mul(fee_rate_nanos_per_kb).div_ceil(1000);
        Ok(fees)
    }

    /// Network fee plus every additional output.
    pub fn total_nanos(&self) -> u64 {
        self.additional_fees
            .iter()
            .fold(self.fee_nanos, |acc, out| acc.saturating_add(out.amount_nanos))
    }
}

/// Bytes the issuer key and signature add around a signed payload.
fn signed_envelope_size(issuer: &PublicKey) -> Result<u64, bincode::Error> {
    let signature = ed25519_dalek::Signature::from_bytes(&[0; ed25519_dalek::SIGNATURE_LENGTH]);
    Ok(bincode::serialized_size(&issuer.0)? + bincode::serialized_size(&signature)?)
}
