//! License selection and feature gating for Tiergate.
//!
//! This crate handles:
//! - Resolving the public key a license must be verified with
//! - Ed25519 signature and date validation of license records
//! - Picking the single active license among all installed records
//! - A small [`Checker`] facade for feature-gated call sites, plus a mock
//!
//! # Selection
//!
//! Installed licenses are listed fresh on every call, ordered by tier
//! (highest first) and then by expiry (latest first), and validated in that
//! order. The first valid license is the active one. A record that fails
//! validation is skipped; a fault while validating (for example an
//! unreadable trial key secret) aborts the whole selection with an error.
//!
//! # Errors versus invalid licenses
//!
//! Only infrastructure faults are [`LicenseError`]s. An expired or forged
//! license is a [`Validity`], and "no active license" is `Ok(None)`.

mod checker;
mod config;
mod context;
mod error;
mod key;
mod selector;
mod signing;
mod store;
mod validator;

pub use checker::{Checker, LicenseChecker, mock};
pub use config::{
    CheckerConfig, DEFAULT_OPERATOR_NAMESPACE, DEFAULT_TRIAL_PUBKEY_FIELD,
    DEFAULT_TRIAL_SECRET_NAME, EnforcementMode, FeaturePolicy,
};
pub use context::{CancelHandle, CheckContext};
pub use error::{LicenseError, LicenseResult, SecretLookup, StoreError};
pub use key::{KeyResolver, OPERATOR_PUBLIC_KEY};
pub use selector::{EVENT_INVALID_LICENSE, LicenseSelector, sort_by_precedence};
pub use signing::LicenseSigner;
pub use store::{InMemoryStore, LicenseStore, SecretData, SecretStore};
pub use validator::{LicenseValidator, Validity, now_millis};

pub use tiergate_types::{LicensePayload, LicenseRecord, OperatorLicenseType};
