//! Process-local cache built on moka.

use super::service::{CacheResult, CacheService};
use crate::clock::Clock;
use async_trait::async_trait;
use moka::Expiry;
use moka::future::Cache;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::debug;

/// A cached copy of a short link's target.
///
/// Entries are immutable once written: a refresh replaces the whole entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheEntry {
    pub short_code: String,
    pub long_url: String,
    pub ttl: Duration,
    pub expires_at: Instant,
}

impl CacheEntry {
    pub fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}

/// Lets moka drop entries on its own once their TTL has passed in real time.
struct EntryTtl;

impl Expiry<String, CacheEntry> for EntryTtl {
    fn expire_after_create(
        &self,
        _key: &String,
        value: &CacheEntry,
        _created_at: std::time::Instant,
    ) -> Option<Duration> {
        Some(value.ttl)
    }

    fn expire_after_update(
        &self,
        _key: &String,
        value: &CacheEntry,
        _updated_at: std::time::Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        Some(value.ttl)
    }
}

/// In-memory cache used when Redis is not configured or unreachable.
///
/// moka bounds the entry count and evicts on its own. Reads additionally check
/// `expires_at` against the injected [`Clock`], so an entry is never served
/// past its TTL even before moka gets around to dropping it.
pub struct InMemoryCache {
    entries: Cache<String, CacheEntry>,
    clock: Arc<dyn Clock>,
}

impl InMemoryCache {
    pub fn new(max_entries: usize, clock: Arc<dyn Clock>) -> Self {
        debug!(max_entries, "Using in-memory cache");
        let entries = Cache::builder()
            .max_capacity(max_entries.max(1) as u64)
            .expire_after(EntryTtl)
            .build();

        Self { entries, clock }
    }

    /// Number of live entries after moka has applied pending evictions.
    pub async fn len(&self) -> u64 {
        self.entries.run_pending_tasks().await;
        self.entries.entry_count()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl CacheService for InMemoryCache {
    async fn get_url(&self, short_code: &str) -> CacheResult<Option<String>> {
        let Some(entry) = self.entries.get(short_code).await else {
            return Ok(None);
        };

        if entry.is_expired(self.clock.now()) {
            self.entries.invalidate(short_code).await;
            return Ok(None);
        }

        Ok(Some(entry.long_url))
    }

    async fn set_url(&self, short_code: &str, long_url: &str, ttl: Duration) -> CacheResult<()> {
        let entry = CacheEntry {
            short_code: short_code.to_string(),
            long_url: long_url.to_string(),
            ttl,
            expires_at: self.clock.now() + ttl,
        };

        self.entries.insert(entry.short_code.clone(), entry).await;

        Ok(())
    }

    async fn health_check(&self) -> bool {
        true
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}
