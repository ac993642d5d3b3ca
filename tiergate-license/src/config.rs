//! Checker configuration.
//!
//! Loaded by the embedding controller, typically from a TOML section:
//!
//! ```toml
//! mode = "enforced"
//! operator_namespace = "tiergate-system"
//! license_scope = "tiergate-system"
//!
//! [policy]
//! unlocked_tiers = ["enterprise", "trial"]
//! ```

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tiergate_types::OperatorLicenseType;

use crate::error::LicenseResult;

/// Name of the secret holding the managed-trial verification key.
pub const DEFAULT_TRIAL_SECRET_NAME: &str = "trial-status";

/// Field of the trial secret holding the raw public key bytes.
pub const DEFAULT_TRIAL_PUBKEY_FIELD: &str = "pubkey";

/// Namespace the operator runs in when none is configured.
pub const DEFAULT_OPERATOR_NAMESPACE: &str = "tiergate-system";

/// Whether license checks are enforced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnforcementMode {
    /// Signatures and dates are verified.
    #[default]
    Enforced,
    /// Every license is accepted and enterprise features are always on.
    Permissive,
}

/// Which license tiers unlock gated features.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeaturePolicy {
    pub unlocked_tiers: BTreeSet<OperatorLicenseType>,
}

impl Default for FeaturePolicy {
    fn default() -> Self {
        Self::from_tiers([OperatorLicenseType::Enterprise, OperatorLicenseType::Trial])
    }
}

impl FeaturePolicy {
    pub fn from_tiers(tiers: impl IntoIterator<Item = OperatorLicenseType>) -> Self {
        Self {
            unlocked_tiers: tiers.into_iter().collect(),
        }
    }

    /// Unlocks `minimum` and every tier ranked above it.
    #[must_use]
    pub fn at_least(minimum: OperatorLicenseType) -> Self {
        Self::from_tiers(OperatorLicenseType::ALL.into_iter().filter(|t| *t >= minimum))
    }

    /// Returns true if licenses of tier `tier` unlock gated features.
    #[must_use]
    pub fn unlocks(&self, tier: OperatorLicenseType) -> bool {
        tier != OperatorLicenseType::None && self.unlocked_tiers.contains(&tier)
    }
}

/// Configuration for a [`LicenseChecker`](crate::LicenseChecker).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckerConfig {
    /// Enforcement mode.
    pub mode: EnforcementMode,
    /// Namespace holding the managed-trial key secret.
    pub operator_namespace: String,
    /// Scope passed to the record store when listing licenses.
    pub license_scope: String,
    /// Name of the managed-trial key secret.
    pub trial_secret_name: String,
    /// Field of the managed-trial key secret holding the public key.
    pub trial_pubkey_field: String,
    /// Tiers that unlock gated features.
    pub policy: FeaturePolicy,
}

impl Default for CheckerConfig {
    fn default() -> Self {
        Self {
            mode: EnforcementMode::default(),
            operator_namespace: DEFAULT_OPERATOR_NAMESPACE.to_string(),
            license_scope: DEFAULT_OPERATOR_NAMESPACE.to_string(),
            trial_secret_name: DEFAULT_TRIAL_SECRET_NAME.to_string(),
            trial_pubkey_field: DEFAULT_TRIAL_PUBKEY_FIELD.to_string(),
            policy: FeaturePolicy::default(),
        }
    }
}

impl CheckerConfig {
    /// Creates an enforced configuration for an operator running in `namespace`,
    /// listing licenses from the same namespace.
    #[must_use]
    pub fn for_namespace(namespace: impl Into<String>) -> Self {
        let namespace = namespace.into();
        Self {
            license_scope: namespace.clone(),
            operator_namespace: namespace,
            ..Self::default()
        }
    }

    /// Parses a configuration from TOML. Missing keys take their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`LicenseError::Config`](crate::LicenseError::Config) if the
    /// document is malformed or names an unknown mode or tier.
    pub fn from_toml_str(s: &str) -> LicenseResult<Self> {
        Ok(toml::from_str(s)?)
    }

    #[must_use]
    pub fn with_mode(mut self, mode: EnforcementMode) -> Self {
        self.mode = mode;
        self
    }

    #[must_use]
    pub fn with_policy(mut self, policy: FeaturePolicy) -> Self {
        self.policy = policy;
        self
    }
}
