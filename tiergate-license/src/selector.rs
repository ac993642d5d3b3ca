//! Active license selection.
//!
//! Candidates are ranked by tier (highest first), then by expiry (latest
//! first). The first candidate that validates wins. A fault while
//! validating any candidate aborts the whole pass, even when a lower-ranked
//! candidate would have been valid.

use chrono::{DateTime, Utc};
use tiergate_types::LicenseRecord;
use tracing::{debug, info, warn};

use crate::context::CheckContext;
use crate::error::LicenseResult;
use crate::validator::{LicenseValidator, now_millis};

/// Event reason reported for a license that fails validation.
pub const EVENT_INVALID_LICENSE: &str = "InvalidLicense";

/// Sorts `records` into selection precedence. Stable: exact ties keep input order.
pub fn sort_by_precedence(records: &mut [LicenseRecord]) {
    records.sort_by(|a, b| {
        b.license_type()
            .cmp(&a.license_type())
            .then_with(|| b.expiry_date_in_millis().cmp(&a.expiry_date_in_millis()))
    });
}

/// Picks the active license among candidate records.
#[derive(Clone)]
pub struct LicenseSelector {
    validator: LicenseValidator,
}

impl LicenseSelector {
    #[must_use]
    pub fn new(validator: LicenseValidator) -> Self {
        Self { validator }
    }

    /// Returns the validator used for each candidate.
    #[must_use]
    pub fn validator(&self) -> &LicenseValidator {
        &self.validator
    }

    /// Selects the active license as of now.
    ///
    /// # Errors
    ///
    /// Returns the first validation fault encountered, or a context error.
    /// `Ok(None)` means no candidate is valid.
    pub async fn select_active(
        &self,
        ctx: &CheckContext,
        records: Vec<LicenseRecord>,
    ) -> LicenseResult<Option<LicenseRecord>> {
        let now = now_millis();
        self.select_active_at(ctx, records, now).await
    }

    /// Selects the active license as of `now_millis`.
    ///
    /// # Errors
    ///
    /// See [`LicenseSelector::select_active`].
    pub async fn select_active_at(
        &self,
        ctx: &CheckContext,
        mut records: Vec<LicenseRecord>,
        now_millis: i64,
    ) -> LicenseResult<Option<LicenseRecord>> {
        sort_by_precedence(&mut records);

        for record in records {
            ctx.check()?;
            let validity = match self.validator.validate(ctx, &record, now_millis).await {
                Ok(validity) => validity,
                Err(err) => {
                    warn!(uid = %record.uid(), error = %err, "license validation failed");
                    return Err(err);
                }
            };

            if validity.is_valid() {
                info!(
                    uid = %record.uid(),
                    license_type = %record.license_type(),
                    expires = %format_millis(record.expiry_date_in_millis()),
                    "selected active license"
                );
                return Ok(Some(record));
            }

            warn!(
                reason = EVENT_INVALID_LICENSE,
                uid = %record.uid(),
                license_type = %record.license_type(),
                validity = %validity,
                "skipping invalid license"
            );
        }

        debug!("no valid license found");
        Ok(None)
    }
}

fn format_millis(millis: i64) -> String {
    DateTime::<Utc>::from_timestamp_millis(millis)
        .map_or_else(|| millis.to_string(), |t| t.to_rfc3339())
}
