use super::async_signer::AsyncSigner;
use crate::crypto::{
    signed::{Signed, SigningError},
    verifiable::Verifiable,
};
use ed25519_dalek::Signer;
use serde::Serialize;
use std::fmt::Debug;

pub trait SyncSigner: Verifiable {
    fn try_sign_bytes_sync(
        &self,
        payload_bytes: &[u8],
    ) -> Result<ed25519_dalek::Signature, SigningError>;

    fn try_sign_sync<T: Serialize + Debug>(&self, payload: T) -> Result<Signed<T>, SigningError> {
        let payload_bytes: Vec<u8> = bincode::serialize(&payload)?;

        Ok(Signed {
            issuer: self.verifying_key(),
            signature: self.try_sign_bytes_sync(payload_bytes.as_slice())?,
            payload,
        })
    }
}

impl SyncSigner for ed25519_dalek::SigningKey {
    fn try_sign_bytes_sync(
        &self,
        payload_bytes: &[u8],
    ) -> Result<ed25519_dalek::Signature, SigningError> {
        self.try_sign(payload_bytes)
            .map_err(SigningError::SigningFailed)
    }
}

impl<T: SyncSigner> AsyncSigner for T {
    async fn try_sign_bytes_async(
        &self,
        payload_bytes: &[u8],
    ) -> Result<ed25519_dalek::Signature, SigningError> {
        self.try_sign_bytes_sync(payload_bytes)
    }
}
