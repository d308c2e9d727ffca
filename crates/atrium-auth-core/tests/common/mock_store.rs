//! In-memory identity store for testing

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use atrium_db::{DbError, DbResult, IdentityRepository, IdentityRow};
use chrono::Utc;
use dashmap::DashMap;
use uuid::Uuid;

/// In-memory identity repository for testing
///
/// Can be switched into an "outage" mode where every lookup fails the way
/// an exhausted connection pool would.
#[derive(Default, Clone)]
pub struct MockIdentityRepository {
    identities: Arc<DashMap<Uuid, IdentityRow>>,
    by_email: Arc<DashMap<String, Uuid>>,
    unavailable: Arc<AtomicBool>,
}

impl MockIdentityRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a test identity directly
    pub fn insert(&self, row: IdentityRow) {
        self.by_email.insert(row.email.clone(), row.id);
        self.identities.insert(row.id, row);
    }

    /// Build an active identity row with the given role and password hash
    #[allow(dead_code)]
    pub fn identity_row(email: &str, role: &str, password_hash: &str) -> IdentityRow {
        IdentityRow {
            id: Uuid::new_v4(),
            tenant_id: Uuid::new_v4(),
            email: email.to_string(),
            role: role.to_string(),
            password_hash: password_hash.to_string(),
            active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    /// Deactivate a stored identity
    #[allow(dead_code)]
    pub fn deactivate(&self, id: Uuid) {
        if let Some(mut row) = self.identities.get_mut(&id) {
            row.active = false;
        }
    }

    /// Toggle outage mode: lookups fail like a timed-out pool
    #[allow(dead_code)]
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    fn check_available(&self) -> DbResult<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            Err(DbError::Sqlx(sqlx::Error::PoolTimedOut))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl IdentityRepository for MockIdentityRepository {
    async fn find_by_id(&self, id: Uuid) -> DbResult<Option<IdentityRow>> {
        self.check_available()?;
        Ok(self.identities.get(&id).map(|r| r.value().clone()))
    }

    async fn find_by_email(&self, email: &str) -> DbResult<Option<IdentityRow>> {
        self.check_available()?;
        Ok(self
            .by_email
            .get(email)
            .and_then(|id| self.identities.get(id.value()).map(|r| r.value().clone())))
    }
}
