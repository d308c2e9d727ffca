//! PostgreSQL identity repository implementation

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::DbResult;
use crate::models::IdentityRow;
use crate::repo::IdentityRepository;

/// PostgreSQL identity repository
#[derive(Clone)]
pub struct PgIdentityRepository {
    pool: PgPool,
}

impl PgIdentityRepository {
    /// Create a new identity repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl IdentityRepository for PgIdentityRepository {
    async fn find_by_id(&self, id: Uuid) -> DbResult<Option<IdentityRow>> {
        let identity = sqlx::query_as::<_, IdentityRow>(
            r#"
            SELECT id, tenant_id, email, role, password_hash, active,
                   created_at, updated_at
            FROM identities
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(identity)
    }

    async fn find_by_email(&self, email: &str) -> DbResult<Option<IdentityRow>> {
        let identity = sqlx::query_as::<_, IdentityRow>(
            r#"
            SELECT id, tenant_id, email, role, password_hash, active,
                   created_at, updated_at
            FROM identities
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(identity)
    }
}
