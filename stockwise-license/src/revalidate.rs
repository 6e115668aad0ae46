//! Client-triggered revalidation of a specific license key.
//!
//! Stronger than the heartbeat: the stored signature is recomputed on
//! every call, catching records altered directly in storage without going
//! through issuance. Independent of the heartbeat's debounce window.
//!
//! This path never deletes the active-license pointer. It may serve
//! read-mostly or offline-tolerant clients that must not sign server-side
//! state changes; deactivation stays the heartbeat's job.

use crate::config::{FailureMode, LicenseConfig};
use crate::error::LicenseResult;
use crate::record::{deny, LicenseStatus, Validation};
use crate::signature::SignatureEngine;
use crate::store::LicenseStore;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::warn;

/// Signature-verifying re-check of a caller-supplied license key.
pub struct Revalidator {
    store: Arc<dyn LicenseStore>,
    engine: SignatureEngine,
    config: LicenseConfig,
}

impl Revalidator {
    #[must_use]
    pub fn new(
        store: Arc<dyn LicenseStore>,
        engine: SignatureEngine,
        config: LicenseConfig,
    ) -> Self {
        Self {
            store,
            engine,
            config,
        }
    }

    /// Revalidates the given key at the current time.
    ///
    /// Infrastructure errors never propagate; they resolve according to
    /// the configured failure mode.
    pub fn revalidate(&self, license_key: &str) -> Validation {
        self.revalidate_at(license_key, Utc::now())
    }

    /// Like [`revalidate`](Self::revalidate) with an explicit clock.
    pub fn revalidate_at(&self, license_key: &str, now: DateTime<Utc>) -> Validation {
        match self.run(license_key, now) {
            Ok(validation) => validation,
            Err(e) => {
                warn!(license_key, "revalidation failed: {e}");
                match self.config.failure_mode {
                    FailureMode::Permissive => Validation::valid(),
                    FailureMode::Strict => Validation::invalid(deny::UNAVAILABLE),
                }
            }
        }
    }

    fn run(&self, license_key: &str, now: DateTime<Utc>) -> LicenseResult<Validation> {
        let Some(mut record) = self.store.get_license(license_key)? else {
            return Ok(Validation::invalid(deny::NOT_FOUND));
        };

        if !self.engine.verify(&record, &record.signature) {
            warn!(license_key, "license signature mismatch");
            return Ok(Validation::invalid(deny::TAMPERED));
        }
        if record.is_expired_at(now) {
            return Ok(Validation::invalid(deny::EXPIRED));
        }
        if record.status == LicenseStatus::Suspended {
            return Ok(Validation::invalid(deny::SUSPENDED));
        }
        if self.config.enforce_installation_limit
            && record.install_count > record.max_installations
        {
            return Ok(Validation::invalid(deny::INSTALL_LIMIT));
        }

        record.last_validated = Some(now);
        self.store.put_license(&record)?;
        Ok(Validation::valid())
    }
}
