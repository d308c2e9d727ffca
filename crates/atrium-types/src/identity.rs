//! Identity types

use serde::{Deserialize, Serialize};

use crate::id::{IdentityId, TenantId};

/// Role of an identity within its tenant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Tenant owner - full control of the tenant
    Owner,
    /// Administrator - manages identities and settings
    Admin,
    /// Regular member
    Member,
}

impl Role {
    /// Whether this role carries administrative privileges
    pub const fn is_admin(&self) -> bool {
        matches!(self, Self::Owner | Self::Admin)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Owner => write!(f, "owner"),
            Self::Admin => write!(f, "admin"),
            Self::Member => write!(f, "member"),
        }
    }
}

impl std::str::FromStr for Role {
    type Err = RoleParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "owner" => Ok(Self::Owner),
            "admin" => Ok(Self::Admin),
            "member" => Ok(Self::Member),
            other => Err(RoleParseError(other.to_string())),
        }
    }
}

/// Error parsing a role from a string
#[derive(Debug, Clone, thiserror::Error)]
#[error("invalid role: {0}")]
pub struct RoleParseError(pub String);

/// An authenticated identity resolved from the identity store
///
/// Immutable within a request's lifetime; loaded fresh from the store on
/// every authentication check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// Identity ID
    pub id: IdentityId,
    /// Email address
    pub email: String,
    /// Tenant this identity belongs to
    pub tenant_id: TenantId,
    /// Role within the tenant
    pub role: Role,
    /// Whether the account is active
    pub active: bool,
}
