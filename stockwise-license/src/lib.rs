//! License enforcement for StockWise.
//!
//! This crate is the core of the license subsystem:
//! - Signed license issuance with tier-derived features and quotas
//! - Debounced server-side heartbeat validation
//! - Client-triggered revalidation with signature verification
//! - Pure feature gating over a license's feature map
//!
//! # Design Principles
//!
//! - **Fail safe on infrastructure**: a store outage is never treated as a
//!   license violation; the validators resolve it per the configured
//!   failure mode (permissive by default)
//! - **Fail closed on entitlement**: an expired or suspended license
//!   deactivates the installation immediately
//! - **Tamper evidence**: records carry an HMAC signature over their
//!   content fields; revalidation recomputes it on every check
//! - **Structured outcomes**: every path yields a [`Validation`] or a
//!   typed error, never an unhandled fault

mod actor;
mod config;
mod error;
mod gate;
mod heartbeat;
mod issue;
mod keygen;
mod record;
mod revalidate;
mod signature;
mod store;
mod tier;

pub use actor::{Actor, Role};
pub use config::{FailureMode, LicenseConfig};
pub use error::{LicenseError, LicenseResult};
pub use gate::can_access;
pub use heartbeat::HeartbeatValidator;
pub use issue::{IssueRequest, Issuer, LicenseOverview, LicenseSummary};
pub use keygen::generate_key;
pub use record::{deny, LicenseRecord, LicenseStatus, Validation};
pub use revalidate::Revalidator;
pub use signature::SignatureEngine;
pub use store::{LicenseStore, MemoryStore, ACTIVE_LICENSE_KEY, LAST_CHECK_KEY};
pub use tier::{
    FeatureMap, LicenseTier, TierLimits, CORE_FEATURES, ENTERPRISE_FEATURES,
    PROFESSIONAL_FEATURES,
};
