//! Infrastructure adapters for application ports.

#![forbid(unsafe_code)]

mod in_memory_school_round_repository;
mod postgres_audit_repository;
mod postgres_authorization_repository;
mod postgres_school_round_repository;

pub use in_memory_school_round_repository::InMemorySchoolRoundRepository;
pub use postgres_audit_repository::PostgresAuditRepository;
pub use postgres_authorization_repository::PostgresAuthorizationRepository;
pub use postgres_school_round_repository::PostgresSchoolRoundRepository;
