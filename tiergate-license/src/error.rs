//! Error types for the licensing module.
//!
//! Only infrastructure faults are errors. A license that fails signature or
//! date checks is reported as a [`Validity`](crate::Validity), and "no active
//! license" is `Ok(None)`.

use std::fmt;

use thiserror::Error;

/// Failure reported by a record or secret store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{operation} failed: {message}")]
pub struct StoreError {
    /// The store operation that failed, e.g. `list license records`.
    pub operation: String,
    /// Store-provided detail.
    pub message: String,
}

impl StoreError {
    pub fn new(operation: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
            message: message.into(),
        }
    }
}

/// Outcome of the secret lookup behind a managed-trial key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SecretLookup {
    /// The secret does not exist in the operator namespace.
    SecretNotFound { namespace: String, name: String },
    /// The secret exists but the key field is absent or empty.
    MissingField { name: String, field: String },
    /// The store read itself failed.
    StoreFailure(StoreError),
}

impl fmt::Display for SecretLookup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SecretNotFound { namespace, name } => {
                write!(f, "secret {namespace}/{name} not found")
            }
            Self::MissingField { name, field } => {
                write!(f, "secret {name} has no {field} field")
            }
            Self::StoreFailure(err) => write!(f, "{err}"),
        }
    }
}

/// Licensing-specific errors.
#[derive(Debug, Error)]
pub enum LicenseError {
    /// Listing license records failed.
    #[error("failed to list licenses: {0}")]
    Store(#[from] StoreError),

    /// The verification key of a managed-trial license could not be loaded.
    #[error("failed to resolve license verification key: {lookup}")]
    KeyResolution { lookup: SecretLookup },

    /// Resolved key material is not an Ed25519 public key.
    #[error("invalid license public key")]
    InvalidPublicKey,

    /// The check context was cancelled.
    #[error("license check cancelled")]
    Cancelled,

    /// The check context deadline elapsed.
    #[error("license check deadline exceeded")]
    DeadlineExceeded,

    /// Configuration could not be parsed.
    #[error("invalid license configuration: {0}")]
    Config(String),

    /// Payload encoding error.
    #[error("license payload error: {0}")]
    Payload(#[from] tiergate_types::Error),
}

impl From<toml::de::Error> for LicenseError {
    fn from(err: toml::de::Error) -> Self {
        Self::Config(err.to_string())
    }
}

/// Result type for license operations.
pub type LicenseResult<T> = Result<T, LicenseError>;
