//! Repository traits
//!
//! Define async repository interfaces for identity lookups.

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::DbResult;
use crate::models::IdentityRow;

/// Identity repository trait
///
/// The authentication core resolves identities through this trait and
/// never writes to the store. Lookups run against live data on every call;
/// callers must not cache rows across requests.
#[async_trait]
pub trait IdentityRepository: Send + Sync {
    /// Find an identity by ID
    async fn find_by_id(&self, id: Uuid) -> DbResult<Option<IdentityRow>>;

    /// Find an identity by email
    async fn find_by_email(&self, email: &str) -> DbResult<Option<IdentityRow>>;
}
