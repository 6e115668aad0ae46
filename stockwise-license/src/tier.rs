//! License tiers and the tier-to-feature table.
//!
//! The feature and quota tables are the single source of truth: a record's
//! `features` map is always derived from its tier at issuance and never
//! hand-edited.

use crate::error::LicenseError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Feature name to enabled flag, as carried on a license record.
///
/// A `BTreeMap` so serialized form is key-ordered and therefore stable
/// under signing.
pub type FeatureMap = BTreeMap<String, bool>;

/// Features bundled with every tier.
pub const CORE_FEATURES: &[&str] = &[
    "dashboard",
    "inventory",
    "branchRequests",
    "complaints",
    "messaging",
    "notifications",
];

/// Features the professional tier adds on top of the core set.
pub const PROFESSIONAL_FEATURES: &[&str] = &[
    "anomalyDetection",
    "advancedAnalytics",
    "reporting",
    "smartQuery",
    "pwa",
];

/// Features the enterprise tier adds on top of professional.
pub const ENTERPRISE_FEATURES: &[&str] = &[
    "whiteLabel",
    "apiAccess",
    "smsNotifications",
    "multiSite",
];

/// The license tier (closed set).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LicenseTier {
    /// Core functionality only.
    Basic,
    /// Core plus analytics, reporting, and PWA features.
    Professional,
    /// Everything, with effectively unbounded quotas.
    Enterprise,
}

impl LicenseTier {
    /// Returns the human-recognizable license key prefix for this tier.
    #[must_use]
    pub fn key_prefix(&self) -> &'static str {
        match self {
            Self::Basic => "BAS",
            Self::Professional => "PRO",
            Self::Enterprise => "ENT",
        }
    }

    /// Returns the feature map for this tier.
    ///
    /// Each tier's map is a superset of every lower tier's map.
    #[must_use]
    pub fn features(&self) -> FeatureMap {
        let mut map = FeatureMap::new();
        for feature in CORE_FEATURES {
            map.insert((*feature).to_string(), true);
        }
        if matches!(self, Self::Professional | Self::Enterprise) {
            for feature in PROFESSIONAL_FEATURES {
                map.insert((*feature).to_string(), true);
            }
        }
        if matches!(self, Self::Enterprise) {
            for feature in ENTERPRISE_FEATURES {
                map.insert((*feature).to_string(), true);
            }
        }
        map
    }

    /// Returns the branch and user quotas for this tier.
    #[must_use]
    pub fn limits(&self) -> TierLimits {
        match self {
            Self::Basic => TierLimits {
                max_branches: 5,
                max_users: 10,
            },
            Self::Professional => TierLimits {
                max_branches: 20,
                max_users: 50,
            },
            Self::Enterprise => TierLimits {
                max_branches: u32::MAX,
                max_users: u32::MAX,
            },
        }
    }
}

impl fmt::Display for LicenseTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Basic => "basic",
            Self::Professional => "professional",
            Self::Enterprise => "enterprise",
        };
        f.write_str(s)
    }
}

impl FromStr for LicenseTier {
    type Err = LicenseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "basic" => Ok(Self::Basic),
            "professional" => Ok(Self::Professional),
            "enterprise" => Ok(Self::Enterprise),
            other => Err(LicenseError::UnknownTier(other.to_string())),
        }
    }
}

/// Branch and user quotas for a tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierLimits {
    /// Maximum number of branches the installation may create.
    pub max_branches: u32,
    /// Maximum number of user accounts.
    pub max_users: u32,
}
