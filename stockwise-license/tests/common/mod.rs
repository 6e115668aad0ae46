//! Shared test helpers for license tests.

#![allow(dead_code)]

use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::sync::Mutex;
use stockwise_license::{
    IssueRequest, LicenseError, LicenseRecord, LicenseResult, LicenseStore, LicenseTier,
    SignatureEngine,
};

/// Returns an engine keyed with a fixed test secret.
pub fn test_engine() -> SignatureEngine {
    SignatureEngine::new(b"stockwise-test-secret")
}

/// An issuance request with sane defaults.
pub fn issue_request(tier: LicenseTier) -> IssueRequest {
    IssueRequest {
        client_name: "Acme Warehousing".to_string(),
        client_email: "ops@acme.example".to_string(),
        client_company: Some("Acme Inc".to_string()),
        license_type: tier,
        expiry_date: None,
        amount: Some(499.0),
        notes: None,
    }
}

/// An issuance request expiring at the given offset from now.
pub fn issue_request_expiring(tier: LicenseTier, from_now: Duration) -> IssueRequest {
    IssueRequest {
        expiry_date: Some(Utc::now() + from_now),
        ..issue_request(tier)
    }
}

/// A signed record built outside the issuance path, for direct store
/// manipulation in tamper tests.
pub fn signed_record(
    engine: &SignatureEngine,
    tier: LicenseTier,
    expiry: Option<DateTime<Utc>>,
) -> LicenseRecord {
    let limits = tier.limits();
    let mut record = LicenseRecord {
        license_key: format!("{}-TEST-0-0000", tier.key_prefix()),
        client_name: "Acme Warehousing".to_string(),
        client_email: "ops@acme.example".to_string(),
        client_company: None,
        license_type: tier,
        features: tier.features(),
        max_branches: limits.max_branches,
        max_users: limits.max_users,
        status: stockwise_license::LicenseStatus::Active,
        issued_date: Utc::now(),
        expiry_date: expiry,
        last_validated: None,
        signature: String::new(),
        installation_domain: None,
        installation_ip: None,
        install_count: 0,
        max_installations: 1,
        amount: None,
        notes: None,
    };
    record.signature = engine.sign(&record).unwrap();
    record
}

/// A store whose every operation fails, simulating an outage.
pub struct FailingStore;

impl LicenseStore for FailingStore {
    fn get_license(&self, _license_key: &str) -> LicenseResult<Option<LicenseRecord>> {
        Err(LicenseError::Store("store unreachable".into()))
    }

    fn put_license(&self, _record: &LicenseRecord) -> LicenseResult<()> {
        Err(LicenseError::Store("store unreachable".into()))
    }

    fn get_setting(&self, _setting_key: &str) -> LicenseResult<Option<String>> {
        Err(LicenseError::Store("store unreachable".into()))
    }

    fn put_setting(&self, _setting_key: &str, _value: &str) -> LicenseResult<()> {
        Err(LicenseError::Store("store unreachable".into()))
    }

    fn delete_setting(&self, _setting_key: &str) -> LicenseResult<()> {
        Err(LicenseError::Store("store unreachable".into()))
    }
}

/// Wraps a store and counts `get_setting` calls per key, to observe the
/// heartbeat debounce.
pub struct CountingStore<S> {
    inner: S,
    setting_reads: Mutex<HashMap<String, u32>>,
}

impl<S> CountingStore<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            setting_reads: Mutex::new(HashMap::new()),
        }
    }

    pub fn setting_reads(&self, setting_key: &str) -> u32 {
        self.setting_reads
            .lock()
            .unwrap()
            .get(setting_key)
            .copied()
            .unwrap_or(0)
    }
}

impl<S: LicenseStore> LicenseStore for CountingStore<S> {
    fn get_license(&self, license_key: &str) -> LicenseResult<Option<LicenseRecord>> {
        self.inner.get_license(license_key)
    }

    fn put_license(&self, record: &LicenseRecord) -> LicenseResult<()> {
        self.inner.put_license(record)
    }

    fn get_setting(&self, setting_key: &str) -> LicenseResult<Option<String>> {
        *self
            .setting_reads
            .lock()
            .unwrap()
            .entry(setting_key.to_string())
            .or_insert(0) += 1;
        self.inner.get_setting(setting_key)
    }

    fn put_setting(&self, setting_key: &str, value: &str) -> LicenseResult<()> {
        self.inner.put_setting(setting_key, value)
    }

    fn delete_setting(&self, setting_key: &str) -> LicenseResult<()> {
        self.inner.delete_setting(setting_key)
    }
}
