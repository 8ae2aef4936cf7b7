use super::key_name::GroupKeyName;
use crate::key::PublicKey;
use dupe::Dupe;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};

/// A group identifier: the owner's key plus the group's key name.
///
/// There is at most one group per [`GroupId`].
#[derive(
    Debug, Copy, Clone, Dupe, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[cfg_attr(any(test, feature = "arbitrary"), derive(arbitrary::Arbitrary))]
pub struct GroupId {
    pub owner: PublicKey,
    pub key_name: GroupKeyName,
}

impl GroupId {
    pub fn new(owner: PublicKey, key_name: GroupKeyName) -> Self {
        Self { owner, key_name }
    }

    /// The implicit base group of `owner`.
    pub fn base(owner: PublicKey) -> Self {
        Self {
            owner,
            key_name: GroupKeyName::BASE,
        }
    }

    pub fn is_base(&self) -> bool {
        self.key_name.is_reserved()
    }
}

impl Display for GroupId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.key_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arbitrary::{Arbitrary, Unstructured};
    use proptest::prelude::*;

    proptest! {
        /// Any identifier built from raw bytes survives the ledger encoding.
        #[test]
        fn encoding_round_trip(raw in prop::collection::vec(any::<u8>(), 0..128)) {
            let mut u = Unstructured::new(&raw);
            if let Ok(group_id) = GroupId::arbitrary(&mut u) {
                prop_assert!(group_id.key_name.len() <= 32);
                prop_assert_eq!(group_id.is_base(), group_id.key_name.is_empty());

                let bytes = bincode::serialize(&group_id).unwrap();
                let decoded: GroupId = bincode::deserialize(&bytes).unwrap();
                prop_assert_eq!(decoded, group_id);
            }
        }
    }
}
