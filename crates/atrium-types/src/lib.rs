//! Atrium Types - Shared domain types
//!
//! This crate contains domain types used across Atrium services:
//! - Identity and tenant identifiers
//! - Roles and token scopes
//! - Authentication wire types

pub mod id;
pub mod identity;
pub mod token;

pub use id::*;
pub use identity::*;
pub use token::*;
