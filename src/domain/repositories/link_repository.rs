//! Repository trait for short link data access.

use crate::domain::entities::{NewShortLink, ShortLink};
use crate::error::StoreError;
use async_trait::async_trait;

/// Durable store for short links.
///
/// Implementations must be safe to call from many request tasks at once.
/// Connectivity failures are reported as [`StoreError::Unavailable`].
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgLinkRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
///
/// # Examples
///
/// See integration tests: `tests/repository_link.rs`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LinkRepository: Send + Sync {
    /// Inserts a new short link.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Duplicate`] if the code already exists.
    async fn insert(&self, new_link: NewShortLink) -> Result<ShortLink, StoreError>;

    /// Finds a link by its short code.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(ShortLink))` if found
    /// - `Ok(None)` if not found
    async fn find_by_code(&self, code: &str) -> Result<Option<ShortLink>, StoreError>;

    /// Lists links ordered by id, skipping `skip` rows and returning at most `limit`.
    async fn list(&self, skip: i64, limit: i64) -> Result<Vec<ShortLink>, StoreError>;

    /// Checks if the store is reachable.
    async fn health_check(&self) -> bool;
}
