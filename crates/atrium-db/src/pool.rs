//! Database connection pool

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::time::Duration;

/// Database connection pool type alias
pub type DbPool = PgPool;

/// Pool construction options
#[derive(Debug, Clone)]
pub struct PoolOptions {
    /// Maximum number of connections
    pub max_connections: u32,
    /// How long to wait for a connection before giving up
    ///
    /// An exhausted pool surfaces as `sqlx::Error::PoolTimedOut`, which the
    /// auth core maps to its dependency-unavailable outcome.
    pub acquire_timeout: Duration,
}

impl Default for PoolOptions {
    fn default() -> Self {
        Self {
            max_connections: 10,
            acquire_timeout: Duration::from_secs(5),
        }
    }
}

/// Create a new database connection pool with default options
pub async fn create_pool(database_url: &str) -> Result<DbPool, sqlx::Error> {
    create_pool_with_options(database_url, PoolOptions::default()).await
}

/// Create a new database connection pool with explicit options
pub async fn create_pool_with_options(
    database_url: &str,
    options: PoolOptions,
) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(options.max_connections)
        .acquire_timeout(options.acquire_timeout)
        .connect(database_url)
        .await
}
