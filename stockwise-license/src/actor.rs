//! The authenticated actor handed in by the surrounding application.
//!
//! Authentication and route authorization live outside this crate; the
//! core only consumes the already-resolved identity and role.

use crate::error::LicenseError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Application role of the current actor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// The system administrator (the license issuer's own operator).
    SuperAdmin,
    /// Installation administrator.
    Admin,
    /// Branch manager.
    Manager,
    /// Regular staff account.
    Staff,
}

impl Role {
    /// Superadmins are never asked to heartbeat.
    #[must_use]
    pub fn bypasses_heartbeat(&self) -> bool {
        matches!(self, Self::SuperAdmin)
    }

    /// Only superadmins may issue or activate licenses.
    #[must_use]
    pub fn can_issue(&self) -> bool {
        matches!(self, Self::SuperAdmin)
    }
}

impl FromStr for Role {
    type Err = LicenseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "superadmin" => Ok(Self::SuperAdmin),
            "admin" => Ok(Self::Admin),
            "manager" => Ok(Self::Manager),
            "staff" => Ok(Self::Staff),
            other => Err(LicenseError::UnknownRole(other.to_string())),
        }
    }
}

/// The current authenticated actor (id plus role).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub id: String,
    pub role: Role,
}
