//! Application layer services implementing the request paths.
//!
//! Services consume repository and cache traits and provide a small API for
//! HTTP handlers.
//!
//! # Available Services
//!
//! - [`services::resolver::CacheAsideResolver`] - Cache-aside resolution and link storage
//! - [`services::gateway::ResolutionGateway`] - Admission control in front of the resolver

pub mod services;
