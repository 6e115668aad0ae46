//! Tamper-evident license signatures.
//!
//! A signature is an HMAC-SHA256 digest over a canonical JSON
//! serialization of the record's content fields, base64-encoded. The
//! canonical form serializes a fixed field subset in declaration order,
//! with the feature map key-ordered, so the digest is deterministic.
//!
//! Fields mutated after issuance (`lastValidated`, `status`, installation
//! and payment metadata) are excluded so legitimate updates never
//! invalidate the signature.

use crate::error::LicenseResult;
use crate::record::LicenseRecord;
use crate::tier::{FeatureMap, LicenseTier};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use serde::Serialize;
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// The signed subset of a record.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CanonicalFields<'a> {
    license_key: &'a str,
    client_email: &'a str,
    license_type: LicenseTier,
    features: &'a FeatureMap,
    max_branches: u32,
    max_users: u32,
    expiry_date: Option<DateTime<Utc>>,
}

fn canonical_bytes(record: &LicenseRecord) -> serde_json::Result<Vec<u8>> {
    serde_json::to_vec(&CanonicalFields {
        license_key: &record.license_key,
        client_email: &record.client_email,
        license_type: record.license_type,
        features: &record.features,
        max_branches: record.max_branches,
        max_users: record.max_users,
        expiry_date: record.expiry_date,
    })
}

/// Signs and verifies license records with a server-held secret.
#[derive(Clone)]
pub struct SignatureEngine {
    mac: HmacSha256,
}

impl SignatureEngine {
    /// Creates an engine keyed with the given secret.
    #[must_use]
    pub fn new(secret: &[u8]) -> Self {
        Self {
            mac: HmacSha256::new_from_slice(secret)
                .expect("HMAC accepts keys of any length"),
        }
    }

    /// Computes the signature over the record's content fields.
    ///
    /// # Errors
    ///
    /// Returns an error only if canonical serialization fails.
    pub fn sign(&self, record: &LicenseRecord) -> LicenseResult<String> {
        let mut mac = self.mac.clone();
        mac.update(&canonical_bytes(record)?);
        Ok(BASE64.encode(mac.finalize().into_bytes()))
    }

    /// Recomputes the digest and compares in constant time.
    ///
    /// Returns false on any mismatch, including signatures that fail to
    /// decode. Never errors: callers decide the user-facing consequence.
    #[must_use]
    pub fn verify(&self, record: &LicenseRecord, signature: &str) -> bool {
        let Ok(bytes) = canonical_bytes(record) else {
            return false;
        };
        let Ok(expected) = BASE64.decode(signature.trim()) else {
            return false;
        };
        let mut mac = self.mac.clone();
        mac.update(&bytes);
        mac.verify_slice(&expected).is_ok()
    }
}
