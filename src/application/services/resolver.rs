//! Cache-aside short code resolution.

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use tracing::{debug, warn};

use crate::domain::entities::{NewShortLink, ShortLink};
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;
use crate::infrastructure::cache::CacheService;

/// Default lifetime of a cached mapping.
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(60 * 60);

/// Resolves short codes through a best-effort cache in front of the durable store.
///
/// # Resolution
///
/// - **Cache hit**: return immediately, the store is not touched
/// - **Cache miss or cache error**: read the store, then write the result back
///   to the cache with a fresh TTL
/// - **Cache write error**: logged, the store result is still returned
///
/// Each resolution performs at most one cache read, one store read and one
/// cache write. Concurrent misses for the same code are not coalesced; each
/// may read the store and rewrite the same entry.
///
/// Creation never touches the cache: the first read populates it.
pub struct CacheAsideResolver {
    link_repository: Arc<dyn LinkRepository>,
    cache: Arc<dyn CacheService>,
    cache_ttl: Duration,
}

impl CacheAsideResolver {
    pub fn new(
        link_repository: Arc<dyn LinkRepository>,
        cache: Arc<dyn CacheService>,
        cache_ttl: Duration,
    ) -> Self {
        Self {
            link_repository,
            cache,
            cache_ttl,
        }
    }

    /// Returns the long URL for `code`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the store has no such code.
    /// Returns [`AppError::ServiceUnavailable`] if the store cannot be reached.
    /// Cache failures never produce an error.
    pub async fn resolve(&self, code: &str) -> Result<String, AppError> {
        match self.cache.get_url(code).await {
            Ok(Some(long_url)) => {
                metrics::counter!("cache_lookups_total", "outcome" => "hit").increment(1);
                debug!(code, "Cache HIT");
                return Ok(long_url);
            }
            Ok(None) => {
                metrics::counter!("cache_lookups_total", "outcome" => "miss").increment(1);
                debug!(code, "Cache MISS");
            }
            Err(e) => {
                metrics::counter!("cache_lookups_total", "outcome" => "error").increment(1);
                warn!(code, error = %e, "Cache read failed, falling back to store");
            }
        }

        let link = self
            .link_repository
            .find_by_code(code)
            .await?
            .ok_or_else(|| AppError::not_found("Short link not found", json!({ "code": code })))?;

        if let Err(e) = self
            .cache
            .set_url(&link.code, &link.long_url, self.cache_ttl)
            .await
        {
            warn!(code, error = %e, "Cache write failed");
        }

        Ok(link.long_url)
    }

    /// Persists a new immutable mapping.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if `code` is already taken.
    /// Returns [`AppError::ServiceUnavailable`] if the store cannot be reached.
    pub async fn store(&self, code: &str, long_url: &str) -> Result<ShortLink, AppError> {
        let link = self
            .link_repository
            .insert(NewShortLink::new(code, long_url))
            .await?;

        Ok(link)
    }

    /// Lists stored links straight from the store.
    pub async fn list(&self, skip: i64, limit: i64) -> Result<Vec<ShortLink>, AppError> {
        Ok(self.link_repository.list(skip, limit).await?)
    }

    /// Whether the durable store answers.
    pub async fn store_healthy(&self) -> bool {
        self.link_repository.health_check().await
    }

    pub fn cache_ttl(&self) -> Duration {
        self.cache_ttl
    }
}
