//! Shared test helpers for license tests.

#![allow(dead_code)]

use std::collections::BTreeMap;
use std::sync::Arc;

use tiergate_license::{
    CheckerConfig, InMemoryStore, KeyResolver, LicenseChecker, LicensePayload, LicenseRecord,
    LicenseSelector, LicenseSigner, LicenseValidator, OperatorLicenseType, SecretData,
};

pub const NAMESPACE: &str = "tiergate-system";
pub const DAY_MS: i64 = 24 * 60 * 60 * 1000;

/// Fixed reference instant for tests that pass `now` explicitly.
pub const T: i64 = 1_700_000_000_000;

/// Returns a deterministic issuer signer from a fixed seed.
pub fn issuer() -> LicenseSigner {
    let seed: [u8; 32] = [
        1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15, 16, 17, 18, 19, 20, 21, 22, 23, 24,
        25, 26, 27, 28, 29, 30, 31, 32,
    ];
    LicenseSigner::from_bytes(&seed)
}

/// Returns the signer the operator uses for managed trials.
pub fn trial_issuer() -> LicenseSigner {
    LicenseSigner::from_bytes(&[42; 32])
}

/// Returns a signer nobody trusts.
pub fn forger() -> LicenseSigner {
    LicenseSigner::from_bytes(&[66; 32])
}

pub fn now() -> i64 {
    tiergate_license::now_millis()
}

pub fn future() -> i64 {
    now() + 30 * DAY_MS
}

pub fn past() -> i64 {
    now() - DAY_MS
}

/// A record of `license_type` expiring at `expiry`, signed by the issuer.
pub fn signed(license_type: OperatorLicenseType, expiry: i64) -> LicenseRecord {
    issuer()
        .sign(LicensePayload::new(license_type, expiry).issued_to("Acme Corp"))
        .unwrap()
}

/// A managed-trial record signed with the trial key.
pub fn signed_trial(expiry: i64) -> LicenseRecord {
    trial_issuer()
        .sign(LicensePayload::new(OperatorLicenseType::Trial, expiry).managed_trial())
        .unwrap()
}

/// A record signed with an untrusted key.
pub fn forged(license_type: OperatorLicenseType, expiry: i64) -> LicenseRecord {
    forger()
        .sign(LicensePayload::new(license_type, expiry))
        .unwrap()
}

/// Secret data holding the trial public key.
pub fn trial_secret() -> SecretData {
    BTreeMap::from([("pubkey".to_string(), trial_issuer().public_key().to_vec())])
}

pub fn resolver(store: &Arc<InMemoryStore>) -> KeyResolver {
    KeyResolver::from_config(store.clone(), &CheckerConfig::default())
        .with_operator_key(issuer().public_key())
}

pub fn validator(store: &Arc<InMemoryStore>) -> LicenseValidator {
    LicenseValidator::new(resolver(store))
}

pub fn selector(store: &Arc<InMemoryStore>) -> LicenseSelector {
    LicenseSelector::new(validator(store))
}

/// A checker over `store` trusting the test issuer.
pub fn checker(store: &Arc<InMemoryStore>, config: CheckerConfig) -> LicenseChecker {
    let resolver = KeyResolver::from_config(store.clone(), &config)
        .with_operator_key(issuer().public_key());
    LicenseChecker::with_resolver(store.clone(), resolver, config)
}

/// Installs `records` in the default license scope.
pub fn store_with(records: impl IntoIterator<Item = LicenseRecord>) -> Arc<InMemoryStore> {
    let store = Arc::new(InMemoryStore::new());
    for record in records {
        store.insert_record(NAMESPACE, record);
    }
    store
}

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
