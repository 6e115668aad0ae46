//! Feature gating.

use crate::record::LicenseRecord;
use crate::tier::CORE_FEATURES;

/// Returns whether the named feature is unlocked for the license.
///
/// No license means no access (a boolean, not an error). Core features are
/// bundled with every tier; anything else must be explicitly enabled in
/// the record's feature map. Pure and never panics.
#[must_use]
pub fn can_access(license: Option<&LicenseRecord>, feature: &str) -> bool {
    let Some(license) = license else {
        return false;
    };
    if CORE_FEATURES.contains(&feature) {
        return true;
    }
    license.features.get(feature).copied().unwrap_or(false)
}
