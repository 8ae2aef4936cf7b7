//! Signing keys and helpers.
//!
//! Signing is an external concern: callers bring any [`SyncSigner`] or
//! [`AsyncSigner`] (a hardware wallet, a remote signing service, or the
//! in-memory [`MemorySigner`]) and turn an unsigned transaction into a
//! [`Signed`] one.
//!
//! [`SyncSigner`]: sync_signer::SyncSigner
//! [`AsyncSigner`]: async_signer::AsyncSigner
//! [`MemorySigner`]: memory::MemorySigner
//! [`Signed`]: super::signed::Signed

pub mod async_signer;
pub mod memory;
pub mod sync_signer;
