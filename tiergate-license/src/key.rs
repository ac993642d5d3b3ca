//! Verification key resolution.
//!
//! Regular licenses are verified with the operator key embedded below.
//! Managed-trial licenses are signed by the operator itself at trial start,
//! so their public key is read from the trial secret in the operator
//! namespace on every check.

use std::sync::Arc;

use tiergate_types::LicenseRecord;
use tracing::debug;

use crate::config::CheckerConfig;
use crate::context::CheckContext;
use crate::error::{LicenseError, LicenseResult, SecretLookup};
use crate::store::SecretStore;

/// Embedded Ed25519 public key of the production license issuer (32 bytes).
///
/// Raw verifying key exported from the issuer's signing service. Rotating it
/// requires a new operator build; it is never read from configuration.
pub const OPERATOR_PUBLIC_KEY: [u8; 32] = [
    28, 78, 13, 110, 25, 168, 221, 172, 205, 131, 192, 80, 76, 30, 54, 225,
    86, 200, 238, 92, 204, 237, 24, 181, 39, 94, 163, 197, 53, 148, 210, 83,
];

/// Resolves the public key a license record must be verified with.
#[derive(Clone)]
pub struct KeyResolver {
    secrets: Arc<dyn SecretStore>,
    operator_key: [u8; 32],
    namespace: String,
    secret_name: String,
    field: String,
}

impl KeyResolver {
    /// Creates a resolver using the embedded operator key.
    pub fn new(
        secrets: Arc<dyn SecretStore>,
        namespace: impl Into<String>,
        secret_name: impl Into<String>,
        field: impl Into<String>,
    ) -> Self {
        Self {
            secrets,
            operator_key: OPERATOR_PUBLIC_KEY,
            namespace: namespace.into(),
            secret_name: secret_name.into(),
            field: field.into(),
        }
    }

    /// Creates a resolver reading the trial secret named in `config`.
    pub fn from_config(secrets: Arc<dyn SecretStore>, config: &CheckerConfig) -> Self {
        Self::new(
            secrets,
            config.operator_namespace.clone(),
            config.trial_secret_name.clone(),
            config.trial_pubkey_field.clone(),
        )
    }

    /// Replaces the embedded operator key, e.g. for a self-hosted issuer or tests.
    #[must_use]
    pub fn with_operator_key(mut self, key: [u8; 32]) -> Self {
        self.operator_key = key;
        self
    }

    /// Returns the raw public key bytes for `record`.
    ///
    /// Performs one secret read for managed trials and none otherwise.
    ///
    /// # Errors
    ///
    /// Returns [`LicenseError::KeyResolution`] if the trial secret is missing,
    /// lacks the key field, or cannot be read, and a context error if `ctx`
    /// ends during the read.
    pub async fn resolve(&self, ctx: &CheckContext, record: &LicenseRecord) -> LicenseResult<Vec<u8>> {
        if !record.is_managed_trial() {
            return Ok(self.operator_key.to_vec());
        }

        debug!(
            uid = %record.uid(),
            namespace = %self.namespace,
            secret = %self.secret_name,
            "loading managed trial verification key"
        );
        let secret = ctx
            .run(async {
                self.secrets
                    .get_secret(&self.namespace, &self.secret_name)
                    .await
                    .map_err(|err| LicenseError::KeyResolution {
                        lookup: SecretLookup::StoreFailure(err),
                    })
            })
            .await?;

        let Some(mut data) = secret else {
            return Err(LicenseError::KeyResolution {
                lookup: SecretLookup::SecretNotFound {
                    namespace: self.namespace.clone(),
                    name: self.secret_name.clone(),
                },
            });
        };

        match data.remove(&self.field) {
            Some(key) if !key.is_empty() => Ok(key),
            _ => Err(LicenseError::KeyResolution {
                lookup: SecretLookup::MissingField {
                    name: self.secret_name.clone(),
                    field: self.field.clone(),
                },
            }),
        }
    }
}
