//! The license checker consumed by feature-gated call sites.

use std::sync::Arc;

use async_trait::async_trait;
use tiergate_types::{LicenseRecord, OperatorLicenseType};
use tracing::debug;

use crate::config::{CheckerConfig, EnforcementMode};
use crate::context::CheckContext;
use crate::error::{LicenseError, LicenseResult};
use crate::key::KeyResolver;
use crate::selector::{LicenseSelector, sort_by_precedence};
use crate::store::{LicenseStore, SecretStore};
use crate::validator::LicenseValidator;

/// Answers licensing questions for feature gating.
#[async_trait]
pub trait Checker: Send + Sync {
    /// Returns the active license, or `None` if no installed license is valid.
    async fn current_license(&self, ctx: &CheckContext) -> LicenseResult<Option<LicenseRecord>>;

    /// Returns true if the active license unlocks gated features.
    async fn features_enabled(&self, ctx: &CheckContext) -> LicenseResult<bool>;

    /// Returns true if `record` is valid right now.
    async fn is_valid(&self, ctx: &CheckContext, record: &LicenseRecord) -> LicenseResult<bool>;

    /// Returns the tier of the active license, or [`OperatorLicenseType::None`].
    async fn operator_license_type(&self, ctx: &CheckContext)
    -> LicenseResult<OperatorLicenseType>;
}

/// Checker backed by the license record store.
#[derive(Clone)]
pub struct LicenseChecker {
    records: Arc<dyn LicenseStore>,
    selector: LicenseSelector,
    config: CheckerConfig,
}

impl LicenseChecker {
    /// Creates a checker verifying regular licenses with the embedded operator key.
    pub fn new(
        records: Arc<dyn LicenseStore>,
        secrets: Arc<dyn SecretStore>,
        config: CheckerConfig,
    ) -> Self {
        let resolver = KeyResolver::from_config(secrets, &config);
        Self::with_resolver(records, resolver, config)
    }

    /// Creates a checker with a caller-built key resolver.
    pub fn with_resolver(
        records: Arc<dyn LicenseStore>,
        resolver: KeyResolver,
        config: CheckerConfig,
    ) -> Self {
        Self {
            records,
            selector: LicenseSelector::new(LicenseValidator::new(resolver)),
            config,
        }
    }

    #[must_use]
    pub fn config(&self) -> &CheckerConfig {
        &self.config
    }

    async fn list(&self, ctx: &CheckContext) -> LicenseResult<Vec<LicenseRecord>> {
        ctx.run(async {
            self.records
                .list_license_records(&self.config.license_scope)
                .await
                .map_err(LicenseError::from)
        })
        .await
    }
}

#[async_trait]
impl Checker for LicenseChecker {
    async fn current_license(&self, ctx: &CheckContext) -> LicenseResult<Option<LicenseRecord>> {
        let mut records = self.list(ctx).await?;
        debug!(
            scope = %self.config.license_scope,
            candidates = records.len(),
            "listed licenses"
        );

        match self.config.mode {
            EnforcementMode::Enforced => self.selector.select_active(ctx, records).await,
            EnforcementMode::Permissive => {
                sort_by_precedence(&mut records);
                Ok(records.into_iter().next())
            }
        }
    }

    async fn features_enabled(&self, ctx: &CheckContext) -> LicenseResult<bool> {
        if self.config.mode == EnforcementMode::Permissive {
            return Ok(true);
        }
        let current = self.current_license(ctx).await?;
        Ok(current.is_some_and(|l| self.config.policy.unlocks(l.license_type())))
    }

    async fn is_valid(&self, ctx: &CheckContext, record: &LicenseRecord) -> LicenseResult<bool> {
        if self.config.mode == EnforcementMode::Permissive {
            return Ok(true);
        }
        self.selector.validator().is_valid(ctx, record).await
    }

    async fn operator_license_type(
        &self,
        ctx: &CheckContext,
    ) -> LicenseResult<OperatorLicenseType> {
        if self.config.mode == EnforcementMode::Permissive {
            return Ok(OperatorLicenseType::Enterprise);
        }
        let current = self.current_license(ctx).await?;
        Ok(current.map_or(OperatorLicenseType::None, |l| l.license_type()))
    }
}

/// A checker with fixed answers for testing feature-gated code.
pub mod mock {
    use super::*;

    /// Returns caller-configured answers without touching any store.
    #[derive(Debug, Clone, Default)]
    pub struct MockChecker {
        /// Answer for `features_enabled` and `is_valid`.
        pub enterprise_enabled: bool,
        /// Answer for `current_license`.
        pub license: Option<LicenseRecord>,
        /// Answer for `operator_license_type`.
        pub license_type: OperatorLicenseType,
    }

    impl MockChecker {
        /// A checker reporting an enterprise license with features enabled.
        #[must_use]
        pub fn enabled() -> Self {
            Self {
                enterprise_enabled: true,
                license: None,
                license_type: OperatorLicenseType::Enterprise,
            }
        }

        /// A checker reporting no license and features disabled.
        #[must_use]
        pub fn disabled() -> Self {
            Self::default()
        }

        /// Sets the license returned by `current_license`.
        #[must_use]
        pub fn with_license(mut self, license: LicenseRecord) -> Self {
            self.license_type = license.license_type();
            self.license = Some(license);
            self
        }
    }

    #[async_trait]
    impl Checker for MockChecker {
        async fn current_license(
            &self,
            _ctx: &CheckContext,
        ) -> LicenseResult<Option<LicenseRecord>> {
            Ok(self.license.clone())
        }

        async fn features_enabled(&self, _ctx: &CheckContext) -> LicenseResult<bool> {
            Ok(self.enterprise_enabled)
        }

        async fn is_valid(
            &self,
            _ctx: &CheckContext,
            _record: &LicenseRecord,
        ) -> LicenseResult<bool> {
            Ok(self.enterprise_enabled)
        }

        async fn operator_license_type(
            &self,
            _ctx: &CheckContext,
        ) -> LicenseResult<OperatorLicenseType> {
            Ok(self.license_type)
        }
    }
}
