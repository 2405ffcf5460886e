//! Cache service trait and error types.

use async_trait::async_trait;
use std::time::Duration;

/// Errors that can occur during cache operations.
///
/// These never reach API clients: the resolver logs them and falls back to the
/// durable store.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("Cache connection error: {0}")]
    ConnectionError(String),
    #[error("Cache operation error: {0}")]
    OperationError(String),
}

/// Result type for cache operations.
pub type CacheResult<T> = Result<T, CacheError>;

/// Best-effort lookup layer for short code to URL mappings.
///
/// The cache is never authoritative. Implementations report failures through
/// [`CacheResult`]; callers treat a read error as a miss and a write error as a
/// lost optimization, never as a request failure.
///
/// # Implementations
///
/// - [`crate::infrastructure::cache::RedisCache`] - Redis-backed cache with server-side TTL
/// - [`crate::infrastructure::cache::InMemoryCache`] - Process-local cache with lazy expiry
/// - [`crate::infrastructure::cache::NullCache`] - No-op implementation for disabled caching
#[async_trait]
pub trait CacheService: Send + Sync {
    /// Retrieves the URL cached for a short code.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(url))` on an unexpired hit
    /// - `Ok(None)` on a miss or an expired entry
    async fn get_url(&self, short_code: &str) -> CacheResult<Option<String>>;

    /// Stores a mapping that expires `ttl` after the write.
    ///
    /// Replaces any existing entry for the same code.
    async fn set_url(&self, short_code: &str, long_url: &str, ttl: Duration) -> CacheResult<()>;

    /// Checks if the cache backend is healthy.
    async fn health_check(&self) -> bool;

    /// Short backend name for logs and health output.
    fn backend(&self) -> &'static str;
}
