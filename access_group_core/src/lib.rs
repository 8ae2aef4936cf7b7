#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(
    missing_debug_implementations,
    future_incompatible,
    let_underscore,
//     missing_docs,
    rust_2021_compatibility,
    nonstandard_style
)]
#![deny(unreachable_pub)]

pub mod archive;
pub mod builder;
pub mod crypto;
pub mod error;
pub mod group;
pub mod index;
pub mod key;
pub mod ledger;
pub mod query;
pub mod state;
pub mod stats;
pub mod txn;
pub mod util;

#[cfg(any(test, feature = "test_utils"))]
pub mod test_utils;
