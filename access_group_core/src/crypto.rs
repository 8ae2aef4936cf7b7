//! Signatures, signers, and content digests.

pub mod digest;
pub mod signed;
pub mod signer;
pub mod verifiable;
