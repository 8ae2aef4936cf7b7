use crate::txn::fee::FeeOutput;
use serde::{Deserialize, Serialize};

/// The network's minimum fee rate when nothing else is configured.
pub const DEFAULT_MIN_FEE_RATE_NANOS_PER_KB: u64 = 1000;

/// How the [`TransactionBuilder`](super::TransactionBuilder) prices transactions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct BuilderConfig {
    pub min_fee_rate_nanos_per_kb: u64,

    /// Paid on top of the network fee by every built transaction.
    pub additional_fees: Vec<FeeOutput>,
}

impl Default for BuilderConfig {
    fn default() -> Self {
        Self {
            min_fee_rate_nanos_per_kb: DEFAULT_MIN_FEE_RATE_NANOS_PER_KB,
            additional_fees: vec![],
        }
    }
}
