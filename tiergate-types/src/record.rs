//! License records and their signed payload.
//!
//! A record is the payload plus an Ed25519 signature. The signature covers
//! [`LicensePayload::canonical_bytes`]: the compact JSON encoding of every
//! payload field in declaration order. Reordering or renaming payload fields
//! invalidates every signature already issued.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{OperatorLicenseType, Result};

/// The signed portion of a license record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LicensePayload {
    /// Unique license identifier.
    pub uid: Uuid,
    /// License tier.
    #[serde(rename = "type")]
    pub license_type: OperatorLicenseType,
    /// When the license was issued (ms since epoch).
    #[serde(default)]
    pub issue_date_in_millis: i64,
    /// When the license becomes usable (ms since epoch). Zero means no lower bound.
    #[serde(default)]
    pub start_date_in_millis: i64,
    /// When the license stops being usable (ms since epoch).
    #[serde(default)]
    pub expiry_date_in_millis: i64,
    /// Licensee.
    #[serde(default)]
    pub issued_to: String,
    /// Issuing authority.
    #[serde(default)]
    pub issuer: String,
    /// Maximum number of licensed instances, if capped.
    #[serde(default)]
    pub max_instances: Option<u32>,
    /// Maximum number of licensed resource units, if capped.
    #[serde(default)]
    pub max_resource_units: Option<u32>,
    /// Whether this is an operator-managed trial, verified with a per-install key.
    #[serde(default)]
    pub managed_trial: bool,
}

impl LicensePayload {
    /// Creates a payload with a fresh uid and no caps.
    #[must_use]
    pub fn new(license_type: OperatorLicenseType, expiry_date_in_millis: i64) -> Self {
        Self {
            uid: Uuid::new_v4(),
            license_type,
            issue_date_in_millis: 0,
            start_date_in_millis: 0,
            expiry_date_in_millis,
            issued_to: String::new(),
            issuer: String::new(),
            max_instances: None,
            max_resource_units: None,
            managed_trial: false,
        }
    }

    /// Marks the payload as an operator-managed trial.
    #[must_use]
    pub fn managed_trial(mut self) -> Self {
        self.managed_trial = true;
        self
    }

    /// Sets the licensee.
    #[must_use]
    pub fn issued_to(mut self, issued_to: impl Into<String>) -> Self {
        self.issued_to = issued_to.into();
        self
    }

    /// Sets the issuing authority.
    #[must_use]
    pub fn issuer(mut self, issuer: impl Into<String>) -> Self {
        self.issuer = issuer.into();
        self
    }

    /// Sets the issue and start dates.
    #[must_use]
    pub fn issued_at(mut self, issue_date_in_millis: i64, start_date_in_millis: i64) -> Self {
        self.issue_date_in_millis = issue_date_in_millis;
        self.start_date_in_millis = start_date_in_millis;
        self
    }

    /// Returns the bytes covered by the record signature.
    ///
    /// # Errors
    ///
    /// Returns an error if the payload cannot be encoded as JSON.
    pub fn canonical_bytes(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }
}

/// A license record as stored in the record store.
///
/// Records are immutable values: the checker never edits them, and every
/// selection pass works on a freshly listed set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LicenseRecord {
    #[serde(flatten)]
    payload: LicensePayload,
    /// Detached Ed25519 signature over the canonical payload.
    #[serde(with = "signature_b64")]
    signature: Vec<u8>,
}

impl LicenseRecord {
    /// Creates a record from a payload and the signature issued for it.
    #[must_use]
    pub fn new(payload: LicensePayload, signature: Vec<u8>) -> Self {
        Self { payload, signature }
    }

    /// Returns the signed payload.
    #[must_use]
    pub fn payload(&self) -> &LicensePayload {
        &self.payload
    }

    /// Returns the raw signature bytes.
    #[must_use]
    pub fn signature(&self) -> &[u8] {
        &self.signature
    }

    #[must_use]
    pub fn uid(&self) -> Uuid {
        self.payload.uid
    }

    #[must_use]
    pub fn license_type(&self) -> OperatorLicenseType {
        self.payload.license_type
    }

    #[must_use]
    pub fn expiry_date_in_millis(&self) -> i64 {
        self.payload.expiry_date_in_millis
    }

    #[must_use]
    pub fn start_date_in_millis(&self) -> i64 {
        self.payload.start_date_in_millis
    }

    /// Returns true if the verification key for this record is fetched at
    /// check time instead of being the embedded operator key.
    #[must_use]
    pub fn is_managed_trial(&self) -> bool {
        self.payload.managed_trial
    }
}

mod signature_b64 {
    use base64::{Engine, engine::general_purpose::STANDARD as BASE64};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&BASE64.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        BASE64
            .decode(encoded.as_bytes())
            .map_err(serde::de::Error::custom)
    }
}
