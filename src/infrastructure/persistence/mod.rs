//! PostgreSQL repository implementations.
//!
//! Concrete implementations of domain repository traits using SQLx.
//!
//! # Repositories
//!
//! - [`PgLinkRepository`] - Short link storage and retrieval

pub mod pg_link_repository;

pub use pg_link_repository::PgLinkRepository;
