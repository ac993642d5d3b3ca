//! Ed25519 signing of license records.
//!
//! The operator only verifies. Signing is needed by issuing tools and by the
//! operator itself when it starts a managed trial with a per-install key.

use ed25519_dalek::{Signer as _, SigningKey};
use tiergate_types::{LicensePayload, LicenseRecord};

use crate::error::LicenseResult;

/// Signs license payloads with an Ed25519 secret key.
pub struct LicenseSigner(SigningKey);

impl LicenseSigner {
    /// Creates a signer from a raw 32-byte secret.
    #[must_use]
    pub fn from_bytes(secret: &[u8; 32]) -> Self {
        Self(SigningKey::from_bytes(secret))
    }

    /// Returns the raw 32-byte public key matching this signer.
    #[must_use]
    pub fn public_key(&self) -> [u8; 32] {
        self.0.verifying_key().to_bytes()
    }

    /// Signs `payload` and returns the complete record.
    ///
    /// # Errors
    ///
    /// Returns an error if the payload cannot be encoded.
    pub fn sign(&self, payload: LicensePayload) -> LicenseResult<LicenseRecord> {
        let message = payload.canonical_bytes()?;
        let signature = self.0.sign(&message);
        Ok(LicenseRecord::new(payload, signature.to_bytes().to_vec()))
    }
}
