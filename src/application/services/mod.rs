//! Business logic services for the application layer.

pub mod gateway;
pub mod resolver;

pub use gateway::ResolutionGateway;
pub use resolver::CacheAsideResolver;
