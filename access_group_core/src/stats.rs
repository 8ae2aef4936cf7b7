use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Stats {
    /// Explicitly created groups. Base groups are not counted.
    pub groups: u64,
    pub members: u64,
    pub committed_txns: u64,
    pub known_keys: u64,
}
