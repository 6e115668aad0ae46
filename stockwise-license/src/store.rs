//! Persistence abstraction over license records and system settings.
//!
//! Two logical tables: `licenses`, keyed by license key, and
//! `system_settings`, keyed by setting key. The settings table carries two
//! singleton entries: the active-license pointer and the last heartbeat
//! check time.
//!
//! Implementations must make individual operations atomic. Read-then-write
//! sequences in the validators are not; racing heartbeats only contend on
//! advisory fields, and the enforcement decisions are idempotent.

use crate::error::{LicenseError, LicenseResult};
use crate::record::LicenseRecord;
use std::collections::HashMap;
use std::sync::Mutex;

/// Setting key naming the license that governs this installation.
pub const ACTIVE_LICENSE_KEY: &str = "active_license";

/// Setting key holding the RFC 3339 time of the last full heartbeat check.
pub const LAST_CHECK_KEY: &str = "last_license_check";

/// Storage for license records and singleton settings.
pub trait LicenseStore: Send + Sync {
    fn get_license(&self, license_key: &str) -> LicenseResult<Option<LicenseRecord>>;

    /// Inserts or replaces the record under its license key.
    fn put_license(&self, record: &LicenseRecord) -> LicenseResult<()>;

    fn get_setting(&self, setting_key: &str) -> LicenseResult<Option<String>>;

    fn put_setting(&self, setting_key: &str, value: &str) -> LicenseResult<()>;

    /// Deleting a missing setting is not an error.
    fn delete_setting(&self, setting_key: &str) -> LicenseResult<()>;
}

/// In-memory store for tests and single-process embedding.
#[derive(Default)]
pub struct MemoryStore {
    licenses: Mutex<HashMap<String, LicenseRecord>>,
    settings: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl LicenseStore for MemoryStore {
    fn get_license(&self, license_key: &str) -> LicenseResult<Option<LicenseRecord>> {
        let licenses = self
            .licenses
            .lock()
            .map_err(|_| LicenseError::Store("license table lock poisoned".into()))?;
        Ok(licenses.get(license_key).cloned())
    }

    fn put_license(&self, record: &LicenseRecord) -> LicenseResult<()> {
        let mut licenses = self
            .licenses
            .lock()
            .map_err(|_| LicenseError::Store("license table lock poisoned".into()))?;
        licenses.insert(record.license_key.clone(), record.clone());
        Ok(())
    }

    fn get_setting(&self, setting_key: &str) -> LicenseResult<Option<String>> {
        let settings = self
            .settings
            .lock()
            .map_err(|_| LicenseError::Store("settings table lock poisoned".into()))?;
        Ok(settings.get(setting_key).cloned())
    }

    fn put_setting(&self, setting_key: &str, value: &str) -> LicenseResult<()> {
        let mut settings = self
            .settings
            .lock()
            .map_err(|_| LicenseError::Store("settings table lock poisoned".into()))?;
        settings.insert(setting_key.to_string(), value.to_string());
        Ok(())
    }

    fn delete_setting(&self, setting_key: &str) -> LicenseResult<()> {
        let mut settings = self
            .settings
            .lock()
            .map_err(|_| LicenseError::Store("settings table lock poisoned".into()))?;
        settings.remove(setting_key);
        Ok(())
    }
}
