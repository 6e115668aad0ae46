//! Error types for the licensing core.

use thiserror::Error;

/// Result type for license operations.
pub type LicenseResult<T> = Result<T, LicenseError>;

/// Licensing-specific errors.
///
/// Lifecycle outcomes (expired, suspended, tampered) are not errors; they
/// are carried in [`crate::Validation`] results. These variants cover
/// issuance validation and infrastructure failures.
#[derive(Debug, Error)]
pub enum LicenseError {
    /// A required issuance field is missing or malformed.
    #[error("invalid license request: {0}")]
    InvalidRequest(String),

    /// License tier outside the closed basic/professional/enterprise set.
    #[error("unknown license tier: {0}")]
    UnknownTier(String),

    /// Unknown actor role string.
    #[error("unknown actor role: {0}")]
    UnknownRole(String),

    /// No license record under the given key.
    #[error("license not found: {0}")]
    NotFound(String),

    /// The underlying store failed.
    #[error("store error: {0}")]
    Store(String),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
