//! The persisted license record and validation outcomes.

use crate::tier::{FeatureMap, LicenseTier};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Canonical denial reasons shared by the heartbeat and revalidation paths.
pub mod deny {
    /// No active-license pointer is set for this installation.
    pub const NO_ACTIVE_LICENSE: &str = "No active license";
    /// The pointed-at or supplied key has no record.
    pub const NOT_FOUND: &str = "License not found";
    /// The record's expiry date has passed.
    pub const EXPIRED: &str = "License expired";
    /// The record was suspended by the issuer.
    pub const SUSPENDED: &str = "License suspended";
    /// The record's stored signature no longer matches its content fields.
    pub const TAMPERED: &str = "License tampered";
    /// More installations than the record allows (enforcement is opt-in).
    pub const INSTALL_LIMIT: &str = "Installation limit exceeded";
    /// The store was unreachable and the validator is running strict.
    pub const UNAVAILABLE: &str = "License check unavailable";
}

/// Lifecycle status of a license record.
///
/// `Expired` and `Suspended` both deny access; they stay distinct for
/// audit and UX. Enforcement uses the expiry date and the `Suspended`
/// status; the `Expired` status value itself is audit metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LicenseStatus {
    Active,
    Expired,
    Suspended,
    Trial,
}

impl LicenseStatus {
    /// Returns true for statuses that deny access outright.
    #[must_use]
    pub fn denies_access(&self) -> bool {
        matches!(self, Self::Expired | Self::Suspended)
    }
}

/// The persisted entitlement document.
///
/// `features`, `max_branches`, and `max_users` are always derived from
/// `license_type` via the tier table at issuance. The signature covers the
/// content fields only; fields legitimately mutated after issuance
/// (`last_validated`, installation metadata, `status`) are excluded.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LicenseRecord {
    /// Unique opaque key, primary lookup handle.
    pub license_key: String,
    pub client_name: String,
    pub client_email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_company: Option<String>,
    pub license_type: LicenseTier,
    pub features: FeatureMap,
    pub max_branches: u32,
    pub max_users: u32,
    pub status: LicenseStatus,
    pub issued_date: DateTime<Utc>,
    /// Absent means perpetual.
    #[serde(default)]
    pub expiry_date: Option<DateTime<Utc>>,
    /// Updated on every successful check; advisory telemetry only.
    #[serde(default)]
    pub last_validated: Option<DateTime<Utc>>,
    /// HMAC over the content fields at issuance time.
    pub signature: String,
    // Installation metadata: tracked, enforced only when configured.
    #[serde(default)]
    pub installation_domain: Option<String>,
    #[serde(default)]
    pub installation_ip: Option<String>,
    #[serde(default)]
    pub install_count: u32,
    #[serde(default = "default_max_installations")]
    pub max_installations: u32,
    // Payment metadata, for support and audit only.
    #[serde(default)]
    pub amount: Option<f64>,
    #[serde(default)]
    pub notes: Option<String>,
}

fn default_max_installations() -> u32 {
    1
}

impl LicenseRecord {
    /// Returns true if the record has an expiry date that has passed.
    #[must_use]
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expiry_date.is_some_and(|expiry| expiry <= now)
    }
}

/// Outcome of a heartbeat or revalidation check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Validation {
    pub valid: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl Validation {
    /// A passed check.
    #[must_use]
    pub fn valid() -> Self {
        Self {
            valid: true,
            reason: None,
        }
    }

    /// A failed check with a caller-facing reason.
    #[must_use]
    pub fn invalid(reason: impl Into<String>) -> Self {
        Self {
            valid: false,
            reason: Some(reason.into()),
        }
    }
}
