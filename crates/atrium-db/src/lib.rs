//! Atrium DB - Identity store
//!
//! SQLx-based identity lookup for Atrium services. This crate is read-only
//! from the authentication core's point of view: the core resolves
//! identities, it never writes them.
//!
//! # Example
//!
//! ```rust,ignore
//! use atrium_db::{create_pool, PgIdentityRepository};
//!
//! let pool = create_pool("postgres://localhost/atrium").await?;
//! let identities = PgIdentityRepository::new(pool);
//!
//! let identity = identities.find_by_email("user@example.com").await?;
//! ```

pub mod error;
pub mod models;
pub mod pg;
pub mod pool;
pub mod repo;

pub use error::{DbError, DbResult};
pub use models::IdentityRow;
pub use pg::PgIdentityRepository;
pub use pool::{create_pool, create_pool_with_options, DbPool, PoolOptions};
pub use repo::IdentityRepository;
