//! Staff roles and the elevated-permission allow-list.
//!
//! Callers hand over free-form role labels ("Admin", "CA Manager",
//! "ca_manager", "CA+Recruiter", ...). They are normalized here into a closed
//! [`Role`] enumeration so no other module compares role strings.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::messaging::MessagingError;

/// A staff role inside the agency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Agency administrator.
    Admin,
    /// Manager of the career-advisor team.
    CaManager,
    /// Dual role: career advisor and recruiter.
    CaRecruiter,
    /// Career advisor (CA) handling candidates directly.
    Ca,
    /// Recruiter working the client side.
    Recruiter,
    /// Read-only staff.
    Viewer,
}

/// Roles allowed to reply as a human agent inside the extended window.
pub const ELEVATED_ROLES: &[Role] = &[Role::Admin, Role::CaManager, Role::CaRecruiter, Role::Ca];

impl Role {
    /// Whether this role may send during the human-agent window.
    pub fn has_elevated_permission(self) -> bool {
        ELEVATED_ROLES.contains(&self)
    }

    /// Canonical label, matching the serde representation.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::CaManager => "ca_manager",
            Self::CaRecruiter => "ca_recruiter",
            Self::Ca => "ca",
            Self::Recruiter => "recruiter",
            Self::Viewer => "viewer",
        }
    }

    /// Parse a role label, falling back to [`Role::Viewer`] for anything
    /// unrecognized.
    pub fn from_label_lossy(label: &str) -> Self {
        label.parse().unwrap_or(Self::Viewer)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = MessagingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // "CA Manager", "ca-manager" and "CA_MANAGER" all collapse to "camanager".
        let key: String = s
            .chars()
            .filter(|c| !matches!(c, ' ' | '_' | '-'))
            .flat_map(char::to_lowercase)
            .collect();

        match key.as_str() {
            "admin" | "administrator" | "owner" => Ok(Self::Admin),
            "camanager" | "manager" => Ok(Self::CaManager),
            "ca+recruiter" | "carecruiter" | "dual" | "dualrole" => Ok(Self::CaRecruiter),
            "ca" | "careeradvisor" | "staff" => Ok(Self::Ca),
            "recruiter" => Ok(Self::Recruiter),
            "viewer" | "readonly" => Ok(Self::Viewer),
            _ => Err(MessagingError::InvalidRole(s.to_owned())),
        }
    }
}
