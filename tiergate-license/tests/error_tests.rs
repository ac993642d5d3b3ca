use tiergate_license::{LicenseError, OperatorLicenseType, SecretLookup, StoreError};

#[test]
fn error_display_store() {
    let err = LicenseError::from(StoreError::new("list license records", "forbidden"));
    let msg = format!("{err}");
    assert!(msg.contains("failed to list licenses"));
    assert!(msg.contains("list license records failed: forbidden"));
}

#[test]
fn error_display_secret_not_found() {
    let err = LicenseError::KeyResolution {
        lookup: SecretLookup::SecretNotFound {
            namespace: "ops".into(),
            name: "trial-status".into(),
        },
    };
    let msg = format!("{err}");
    assert!(msg.contains("verification key"));
    assert!(msg.contains("secret ops/trial-status not found"));
}

#[test]
fn error_display_missing_field() {
    let err = LicenseError::KeyResolution {
        lookup: SecretLookup::MissingField {
            name: "trial-status".into(),
            field: "pubkey".into(),
        },
    };
    assert!(format!("{err}").contains("has no pubkey field"));
}

#[test]
fn error_display_store_failure_lookup() {
    let err = LicenseError::KeyResolution {
        lookup: SecretLookup::StoreFailure(StoreError::new("get secret", "timeout")),
    };
    assert!(format!("{err}").contains("get secret failed: timeout"));
}

#[test]
fn error_display_invalid_public_key() {
    assert!(format!("{}", LicenseError::InvalidPublicKey).contains("public key"));
}

#[test]
fn error_display_context() {
    assert!(format!("{}", LicenseError::Cancelled).contains("cancelled"));
    assert!(format!("{}", LicenseError::DeadlineExceeded).contains("deadline"));
}

#[test]
fn error_from_types_error() {
    let types_err = "diamond".parse::<OperatorLicenseType>().unwrap_err();
    let err: LicenseError = types_err.into();
    assert!(format!("{err}").contains("license payload error"));
}

#[test]
fn error_is_debug() {
    let err = LicenseError::Cancelled;
    let _ = format!("{err:?}");
}
