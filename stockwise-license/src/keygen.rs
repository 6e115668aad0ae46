//! License key generation.
//!
//! Keys are human-traceable: `PRO-9F2A3C41-18C2B4D9E21-A7F3D912` is a
//! tier prefix, a salted hash fragment of the client email, a millisecond
//! timestamp, and a random fragment. The random component makes repeated
//! calls with identical inputs produce distinct keys.

use crate::tier::LicenseTier;
use chrono::Utc;
use sha2::{Digest, Sha256};
use uuid::Uuid;

/// Domain separator for the email hash. Not a secret; it only keeps the
/// fragment distinct from other SHA-256 uses of the same email.
const KEY_SALT: &str = "stockwise-license-v1";

/// Derives a unique license key for the given client and tier.
#[must_use]
pub fn generate_key(client_email: &str, tier: LicenseTier) -> String {
    let mut hasher = Sha256::new();
    hasher.update(KEY_SALT.as_bytes());
    hasher.update(client_email.trim().to_lowercase().as_bytes());
    let digest = hasher.finalize();

    let email_part: String = digest[..4].iter().map(|b| format!("{b:02X}")).collect();
    let millis = Utc::now().timestamp_millis();
    let random = Uuid::new_v4().simple().to_string();

    format!(
        "{}-{}-{:X}-{}",
        tier.key_prefix(),
        email_part,
        millis,
        random[..8].to_uppercase()
    )
}
