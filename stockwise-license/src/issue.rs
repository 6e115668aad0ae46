//! License issuance, activation, and the public license overview.

use crate::error::{LicenseError, LicenseResult};
use crate::keygen::generate_key;
use crate::record::{LicenseRecord, LicenseStatus};
use crate::signature::SignatureEngine;
use crate::store::{LicenseStore, ACTIVE_LICENSE_KEY};
use crate::tier::{FeatureMap, LicenseTier};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

/// A validated-at-the-boundary request to issue a license.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueRequest {
    pub client_name: String,
    pub client_email: String,
    #[serde(default)]
    pub client_company: Option<String>,
    pub license_type: LicenseTier,
    #[serde(default)]
    pub expiry_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub amount: Option<f64>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Unauthenticated-safe summary of the governing license.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LicenseSummary {
    pub license_type: LicenseTier,
    pub features: FeatureMap,
    pub max_branches: u32,
    pub max_users: u32,
    #[serde(default)]
    pub expiry_date: Option<DateTime<Utc>>,
    pub client_name: String,
}

/// Current-license overview for the surrounding application.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LicenseOverview {
    pub active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license: Option<LicenseSummary>,
    pub expired: bool,
    pub suspended: bool,
}

impl LicenseOverview {
    fn inactive() -> Self {
        Self {
            active: false,
            license: None,
            expired: false,
            suspended: false,
        }
    }
}

/// Issues signed licenses and manages the active-license pointer.
pub struct Issuer {
    store: Arc<dyn LicenseStore>,
    engine: SignatureEngine,
}

impl Issuer {
    #[must_use]
    pub fn new(store: Arc<dyn LicenseStore>, engine: SignatureEngine) -> Self {
        Self { store, engine }
    }

    /// Issues and persists a signed license record.
    ///
    /// The caller must already have passed the admin boundary check; this
    /// layer validates the request fields only. On a validation error
    /// nothing is persisted.
    ///
    /// # Errors
    ///
    /// Returns [`LicenseError::InvalidRequest`] for missing or malformed
    /// identity fields, or a store error if persisting fails.
    pub fn issue(&self, request: &IssueRequest) -> LicenseResult<LicenseRecord> {
        self.issue_at(request, Utc::now())
    }

    /// Like [`issue`](Self::issue) with an explicit clock.
    pub fn issue_at(
        &self,
        request: &IssueRequest,
        now: DateTime<Utc>,
    ) -> LicenseResult<LicenseRecord> {
        validate_request(request)?;

        let tier = request.license_type;
        let limits = tier.limits();
        let mut record = LicenseRecord {
            license_key: generate_key(&request.client_email, tier),
            client_name: request.client_name.trim().to_string(),
            client_email: request.client_email.trim().to_lowercase(),
            client_company: request.client_company.clone(),
            license_type: tier,
            features: tier.features(),
            max_branches: limits.max_branches,
            max_users: limits.max_users,
            status: LicenseStatus::Active,
            issued_date: now,
            expiry_date: request.expiry_date,
            last_validated: None,
            signature: String::new(),
            installation_domain: None,
            installation_ip: None,
            install_count: 0,
            max_installations: 1,
            amount: request.amount,
            notes: request.notes.clone(),
        };
        record.signature = self.engine.sign(&record)?;

        self.store.put_license(&record)?;
        info!(license_key = %record.license_key, tier = %tier, "issued license");
        Ok(record)
    }

    /// Marks a previously issued license as the one governing this
    /// installation.
    ///
    /// # Errors
    ///
    /// Returns [`LicenseError::NotFound`] if no record exists under the
    /// key.
    pub fn activate(&self, license_key: &str) -> LicenseResult<()> {
        if self.store.get_license(license_key)?.is_none() {
            return Err(LicenseError::NotFound(license_key.to_string()));
        }
        self.store.put_setting(ACTIVE_LICENSE_KEY, license_key)?;
        info!(license_key, "activated license");
        Ok(())
    }

    /// Read-only overview of the governing license, safe to expose without
    /// authentication.
    pub fn current(&self) -> LicenseResult<LicenseOverview> {
        self.current_at(Utc::now())
    }

    /// Like [`current`](Self::current) with an explicit clock.
    pub fn current_at(&self, now: DateTime<Utc>) -> LicenseResult<LicenseOverview> {
        let Some(license_key) = self.store.get_setting(ACTIVE_LICENSE_KEY)? else {
            return Ok(LicenseOverview::inactive());
        };
        let Some(record) = self.store.get_license(&license_key)? else {
            return Ok(LicenseOverview::inactive());
        };

        let expired = record.is_expired_at(now);
        let suspended = record.status == LicenseStatus::Suspended;
        Ok(LicenseOverview {
            active: !expired && !suspended,
            license: Some(LicenseSummary {
                license_type: record.license_type,
                features: record.features,
                max_branches: record.max_branches,
                max_users: record.max_users,
                expiry_date: record.expiry_date,
                client_name: record.client_name,
            }),
            expired,
            suspended,
        })
    }
}

fn validate_request(request: &IssueRequest) -> LicenseResult<()> {
    if request.client_name.trim().is_empty() {
        return Err(LicenseError::InvalidRequest("client name is required".into()));
    }
    let email = request.client_email.trim();
    if email.is_empty() {
        return Err(LicenseError::InvalidRequest("client email is required".into()));
    }
    if !email.contains('@') {
        return Err(LicenseError::InvalidRequest(format!(
            "client email is malformed: {email}"
        )));
    }
    Ok(())
}
