//! Database row models
//!
//! These types map directly to database rows using SQLx's FromRow derive.

use atrium_types::{Identity, IdentityId, Role, TenantId};
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Identity row from the database
#[derive(Debug, Clone, FromRow)]
pub struct IdentityRow {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub email: String,
    pub role: String,
    pub password_hash: String,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl IdentityRow {
    /// Convert to the domain identity type
    ///
    /// Unknown role strings downgrade to `Member` rather than failing the
    /// request; the row is still a valid identity.
    pub fn to_identity(&self) -> Identity {
        Identity {
            id: IdentityId::from(self.id),
            email: self.email.clone(),
            tenant_id: TenantId::from(self.tenant_id),
            role: self.role.parse().unwrap_or(Role::Member),
            active: self.active,
        }
    }
}
