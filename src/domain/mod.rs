//! Domain layer containing business entities and admission control.
//!
//! # Architecture
//!
//! - [`entities`] - Core business data structures
//! - [`repositories`] - Data access trait definitions
//! - [`token_bucket`] - Per-client token bucket
//! - [`client_registry`] - Per-identity buckets with idle eviction
//!
//! # Admission Flow
//!
//! 1. HTTP handler extracts the client identity from the connection
//! 2. [`client_registry::ClientRegistry::admit`] finds or creates the client's bucket
//! 3. [`token_bucket::TokenBucket::try_acquire`] decides without blocking
//! 4. [`client_registry::run_client_sweeper`] drops idle clients in the background

pub mod client_registry;
pub mod entities;
pub mod repositories;
pub mod token_bucket;
