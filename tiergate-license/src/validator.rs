//! Signature and date validation of a single license record.

use std::fmt;

use ed25519_dalek::{Signature, Verifier, VerifyingKey};
use serde::{Deserialize, Serialize};
use tiergate_types::LicenseRecord;

use crate::context::CheckContext;
use crate::error::{LicenseError, LicenseResult};
use crate::key::KeyResolver;

/// Outcome of validating a license record.
///
/// Every variant is a legitimate business answer. Infrastructure failures
/// are reported as [`LicenseError`] instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Validity {
    /// Signature verifies and `now` is within the license dates.
    Valid,
    /// The expiry date has passed, or was never set.
    Expired,
    /// The start date is still in the future.
    NotYetValid,
    /// The signature is malformed or does not match the payload.
    InvalidSignature,
}

impl Validity {
    #[must_use]
    pub fn is_valid(self) -> bool {
        self == Self::Valid
    }
}

impl fmt::Display for Validity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Valid => "valid",
            Self::Expired => "expired",
            Self::NotYetValid => "not yet valid",
            Self::InvalidSignature => "invalid signature",
        })
    }
}

/// Returns the current time in milliseconds since the Unix epoch.
#[must_use]
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Validates license records against their resolved verification key.
#[derive(Clone)]
pub struct LicenseValidator {
    resolver: KeyResolver,
}

impl LicenseValidator {
    #[must_use]
    pub fn new(resolver: KeyResolver) -> Self {
        Self { resolver }
    }

    /// Validates `record` as of `now_millis`.
    ///
    /// `now_millis` is read once by the caller so that every candidate of a
    /// selection pass is judged against the same instant.
    ///
    /// # Errors
    ///
    /// Returns an error if the verification key cannot be resolved or is not
    /// an Ed25519 public key. A bad signature or date is not an error.
    pub async fn validate(
        &self,
        ctx: &CheckContext,
        record: &LicenseRecord,
        now_millis: i64,
    ) -> LicenseResult<Validity> {
        let key = self.resolver.resolve(ctx, record).await?;
        if !verify_signature(record, &key)? {
            return Ok(Validity::InvalidSignature);
        }
        Ok(check_dates(record, now_millis))
    }

    /// Returns true if `record` is valid right now.
    ///
    /// # Errors
    ///
    /// See [`LicenseValidator::validate`].
    pub async fn is_valid(&self, ctx: &CheckContext, record: &LicenseRecord) -> LicenseResult<bool> {
        let now = now_millis();
        Ok(self.validate(ctx, record, now).await?.is_valid())
    }
}

fn verify_signature(record: &LicenseRecord, key: &[u8]) -> LicenseResult<bool> {
    let key: &[u8; 32] = key.try_into().map_err(|_| LicenseError::InvalidPublicKey)?;
    let verifying_key =
        VerifyingKey::from_bytes(key).map_err(|_| LicenseError::InvalidPublicKey)?;

    let Ok(signature) = Signature::from_slice(record.signature()) else {
        return Ok(false);
    };
    let message = record.payload().canonical_bytes()?;
    Ok(verifying_key.verify(&message, &signature).is_ok())
}

fn check_dates(record: &LicenseRecord, now_millis: i64) -> Validity {
    let expiry = record.expiry_date_in_millis();
    // Fail closed on unset or nonsensical expiry.
    if expiry <= 0 || now_millis > expiry {
        return Validity::Expired;
    }
    if record.start_date_in_millis() > now_millis {
        return Validity::NotYetValid;
    }
    Validity::Valid
}
