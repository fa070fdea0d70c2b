//! Domain layer - Pure business abstractions
//!
//! This layer contains NO framework dependencies (no SeaORM, no Axum).
//! Only trait definitions, access rules and domain error types.

pub mod errors;
pub mod permissions;
pub mod repositories;

pub use errors::{DomainError, FieldErrors};
pub use permissions::{Actor, ReadAccess};
pub use repositories::*;
