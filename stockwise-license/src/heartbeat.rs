//! Server-side periodic license validation.
//!
//! The heartbeat is debounced: within the configured interval of the last
//! full check it short-circuits to valid without reading the license
//! tables, so protected page renders don't hit the store. On expiry or
//! suspension the active-license pointer is deleted rather than flagged: a
//! leftover pointer can never validate again through half-updated state.

use crate::actor::Actor;
use crate::config::{FailureMode, LicenseConfig};
use crate::error::LicenseResult;
use crate::record::{deny, LicenseStatus, Validation};
use crate::store::{LicenseStore, ACTIVE_LICENSE_KEY, LAST_CHECK_KEY};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Debounced periodic validator of the active-license pointer.
pub struct HeartbeatValidator {
    store: Arc<dyn LicenseStore>,
    config: LicenseConfig,
}

impl HeartbeatValidator {
    #[must_use]
    pub fn new(store: Arc<dyn LicenseStore>, config: LicenseConfig) -> Self {
        Self { store, config }
    }

    /// Runs the heartbeat for the given actor at the current time.
    ///
    /// Infrastructure errors never propagate; they resolve according to
    /// the configured failure mode.
    pub fn check(&self, actor: Option<&Actor>) -> Validation {
        self.check_at(actor, Utc::now())
    }

    /// Like [`check`](Self::check) with an explicit clock.
    pub fn check_at(&self, actor: Option<&Actor>, now: DateTime<Utc>) -> Validation {
        if actor.is_some_and(|a| a.role.bypasses_heartbeat()) {
            return Validation::valid();
        }
        match self.run(now) {
            Ok(validation) => validation,
            Err(e) => {
                warn!("heartbeat check failed: {e}");
                match self.config.failure_mode {
                    FailureMode::Permissive => Validation::valid(),
                    FailureMode::Strict => Validation::invalid(deny::UNAVAILABLE),
                }
            }
        }
    }

    fn run(&self, now: DateTime<Utc>) -> LicenseResult<Validation> {
        if let Some(last_check) = self.store.get_setting(LAST_CHECK_KEY)? {
            // An unparseable timestamp is treated as stale, not fatal.
            if let Ok(last) = DateTime::parse_from_rfc3339(&last_check) {
                if now - last.with_timezone(&Utc) < self.config.heartbeat_interval {
                    debug!("heartbeat debounced");
                    return Ok(Validation::valid());
                }
            }
        }

        let Some(license_key) = self.store.get_setting(ACTIVE_LICENSE_KEY)? else {
            return Ok(Validation::invalid(deny::NO_ACTIVE_LICENSE));
        };
        let Some(mut record) = self.store.get_license(&license_key)? else {
            return Ok(Validation::invalid(deny::NOT_FOUND));
        };

        if record.is_expired_at(now) {
            info!(license_key = %record.license_key, "active license expired, deactivating");
            self.store.delete_setting(ACTIVE_LICENSE_KEY)?;
            return Ok(Validation::invalid(deny::EXPIRED));
        }
        if record.status == LicenseStatus::Suspended {
            info!(license_key = %record.license_key, "active license suspended, deactivating");
            self.store.delete_setting(ACTIVE_LICENSE_KEY)?;
            return Ok(Validation::invalid(deny::SUSPENDED));
        }

        self.store.put_setting(LAST_CHECK_KEY, &now.to_rfc3339())?;
        record.last_validated = Some(now);
        self.store.put_license(&record)?;
        Ok(Validation::valid())
    }
}
