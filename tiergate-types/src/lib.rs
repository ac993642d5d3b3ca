//! Core type definitions for Tiergate.
//!
//! This crate defines the values the license checker reasons about:
//! - License tiers with their total precedence order
//! - License records as read from the record store
//! - The canonical payload encoding covered by a record's signature
//!
//! Nothing here performs I/O or signature verification; that lives in
//! `tiergate-license`.

mod license_type;
mod record;

pub use license_type::OperatorLicenseType;
pub use record::{LicensePayload, LicenseRecord};

/// Result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in type operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("unknown license type: {0}")]
    UnknownLicenseType(String),
}
