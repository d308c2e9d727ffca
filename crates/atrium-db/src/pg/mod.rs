//! PostgreSQL repository implementations

mod identity;

pub use identity::PgIdentityRepository;
