//! Runtime policy for the validation paths.

use chrono::Duration;

/// How the validators react when the store is unreachable.
///
/// Permissive is the product default: an outage is not a license
/// violation, and locking out a paying customer over a transient error is
/// the worse failure mode. Strict is available for deployments that prefer
/// to fail closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailureMode {
    #[default]
    Permissive,
    Strict,
}

/// Policy knobs injected into the validation components.
#[derive(Debug, Clone)]
pub struct LicenseConfig {
    /// Minimum gap between full heartbeat checks; shorter gaps
    /// short-circuit to valid.
    pub heartbeat_interval: Duration,
    pub failure_mode: FailureMode,
    /// When set, revalidation rejects records whose install count exceeds
    /// the record's maximum. Off by default.
    pub enforce_installation_limit: bool,
}

impl Default for LicenseConfig {
    fn default() -> Self {
        Self {
            heartbeat_interval: Duration::hours(24),
            failure_mode: FailureMode::default(),
            enforce_installation_limit: false,
        }
    }
}
