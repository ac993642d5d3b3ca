//! Record and secret store abstractions.
//!
//! The checker never talks to a concrete backend. It reads license records
//! and trial key secrets through these traits, which the embedding
//! controller implements over its cluster-state client.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{PoisonError, RwLock};

use async_trait::async_trait;
use tiergate_types::LicenseRecord;
use uuid::Uuid;

use crate::error::StoreError;

/// Raw key/value data of a secret.
pub type SecretData = BTreeMap<String, Vec<u8>>;

/// Lists license records.
#[async_trait]
pub trait LicenseStore: Send + Sync {
    /// Returns every license record in `scope`, in store order.
    async fn list_license_records(&self, scope: &str) -> Result<Vec<LicenseRecord>, StoreError>;
}

/// Reads secrets.
#[async_trait]
pub trait SecretStore: Send + Sync {
    /// Returns the data of secret `name` in `namespace`, or `None` if it does not exist.
    async fn get_secret(&self, namespace: &str, name: &str)
    -> Result<Option<SecretData>, StoreError>;
}

/// An in-memory record and secret store.
///
/// Used by tests and by embedders that already hold the records in memory.
/// Failures can be injected for either read path.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    records: RwLock<BTreeMap<String, Vec<LicenseRecord>>>,
    secrets: RwLock<BTreeMap<(String, String), SecretData>>,
    list_failure: RwLock<Option<StoreError>>,
    secret_failure: RwLock<Option<StoreError>>,
    list_calls: AtomicUsize,
    secret_reads: AtomicUsize,
}

impl InMemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a record to `scope`, after any records already there.
    pub fn insert_record(&self, scope: &str, record: LicenseRecord) {
        self.records
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(scope.to_string())
            .or_default()
            .push(record);
    }

    /// Removes the record with `uid` from `scope`. Returns true if it was present.
    pub fn remove_record(&self, scope: &str, uid: Uuid) -> bool {
        let mut records = self.records.write().unwrap_or_else(PoisonError::into_inner);
        let Some(scoped) = records.get_mut(scope) else {
            return false;
        };
        let before = scoped.len();
        scoped.retain(|r| r.uid() != uid);
        scoped.len() != before
    }

    /// Stores secret `name` in `namespace`, replacing any previous data.
    pub fn insert_secret(&self, namespace: &str, name: &str, data: SecretData) {
        self.secrets
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert((namespace.to_string(), name.to_string()), data);
    }

    /// Deletes secret `name` from `namespace`.
    pub fn remove_secret(&self, namespace: &str, name: &str) {
        self.secrets
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&(namespace.to_string(), name.to_string()));
    }

    /// Makes every listing fail with `error` until cleared with `None`.
    pub fn fail_listing(&self, error: Option<StoreError>) {
        *self.list_failure.write().unwrap_or_else(PoisonError::into_inner) = error;
    }

    /// Makes every secret read fail with `error` until cleared with `None`.
    pub fn fail_secret_reads(&self, error: Option<StoreError>) {
        *self.secret_failure.write().unwrap_or_else(PoisonError::into_inner) = error;
    }

    /// Number of listings served so far, including failed ones.
    #[must_use]
    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    /// Number of secret reads served so far, including failed ones.
    #[must_use]
    pub fn secret_reads(&self) -> usize {
        self.secret_reads.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LicenseStore for InMemoryStore {
    async fn list_license_records(&self, scope: &str) -> Result<Vec<LicenseRecord>, StoreError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(err) = self
            .list_failure
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
        {
            return Err(err);
        }
        Ok(self
            .records
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(scope)
            .cloned()
            .unwrap_or_default())
    }
}

#[async_trait]
impl SecretStore for InMemoryStore {
    async fn get_secret(
        &self,
        namespace: &str,
        name: &str,
    ) -> Result<Option<SecretData>, StoreError> {
        self.secret_reads.fetch_add(1, Ordering::SeqCst);
        if let Some(err) = self
            .secret_failure
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
        {
            return Err(err);
        }
        Ok(self
            .secrets
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&(namespace.to_string(), name.to_string()))
            .cloned())
    }
}
