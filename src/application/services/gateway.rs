//! Externally visible entry points: admission control in front of resolution.

use std::sync::Arc;

use serde_json::json;
use tracing::{debug, info, warn};

use crate::application::services::resolver::CacheAsideResolver;
use crate::domain::client_registry::ClientRegistry;
use crate::domain::entities::ShortLink;
use crate::error::AppError;
use crate::utils::code_generator::CodeGenerator;

/// Default and maximum page size for listings.
pub const MAX_PAGE_SIZE: i64 = 10;

/// Composes per-client admission with cache-aside resolution.
///
/// # Short code collisions
///
/// Creation retries exactly once with a freshly generated code when the store
/// reports a duplicate. A second collision is returned to the caller as
/// [`AppError::Conflict`].
pub struct ResolutionGateway {
    registry: Arc<ClientRegistry>,
    resolver: Arc<CacheAsideResolver>,
    code_generator: Arc<dyn CodeGenerator>,
}

impl ResolutionGateway {
    pub fn new(
        registry: Arc<ClientRegistry>,
        resolver: Arc<CacheAsideResolver>,
        code_generator: Arc<dyn CodeGenerator>,
    ) -> Self {
        Self {
            registry,
            resolver,
            code_generator,
        }
    }

    /// Admission check for `identity`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::RateLimited`] when the client's bucket is empty.
    pub fn admit(&self, identity: &str) -> Result<(), AppError> {
        if self.registry.admit(identity) {
            metrics::counter!("admission_total", "outcome" => "admitted").increment(1);
            Ok(())
        } else {
            metrics::counter!("admission_total", "outcome" => "denied").increment(1);
            debug!(identity, "Admission denied");
            Err(AppError::rate_limited(
                "The API is at capacity, try again later.",
                json!({}),
            ))
        }
    }

    /// Resolves `code` on behalf of `identity`.
    ///
    /// A denied request never reaches the cache or the store.
    pub async fn handle_resolve(&self, identity: &str, code: &str) -> Result<String, AppError> {
        self.admit(identity)?;
        self.resolver.resolve(code).await
    }

    /// Creates a short link for `long_url` under a generated code.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if both generated codes collide.
    /// Returns [`AppError::ServiceUnavailable`] if the store cannot be reached.
    pub async fn handle_create(&self, long_url: &str) -> Result<ShortLink, AppError> {
        let code = self.code_generator.generate();

        let link = match self.resolver.store(&code, long_url).await {
            Err(AppError::Conflict { .. }) => {
                warn!(code = %code, "Short code collision, retrying with a new code");
                let retry_code = self.code_generator.generate();
                self.resolver.store(&retry_code, long_url).await?
            }
            result => result?,
        };

        metrics::counter!("links_created_total").increment(1);
        info!(code = %link.code, "Short link created");
        Ok(link)
    }

    /// Lists stored links after normalizing the page window.
    ///
    /// Negative `skip` becomes 0. A `limit` outside `1..=10` becomes 10.
    pub async fn handle_list(&self, skip: i64, limit: i64) -> Result<Vec<ShortLink>, AppError> {
        let (skip, limit) = page_window(skip, limit);
        self.resolver.list(skip, limit).await
    }

    pub fn registry(&self) -> &ClientRegistry {
        &self.registry
    }

    pub fn resolver(&self) -> &CacheAsideResolver {
        &self.resolver
    }
}

/// Normalizes a requested `(skip, limit)` pair.
pub fn page_window(skip: i64, limit: i64) -> (i64, i64) {
    let skip = skip.max(0);
    let limit = if (1..=MAX_PAGE_SIZE).contains(&limit) {
        limit
    } else {
        MAX_PAGE_SIZE
    };
    (skip, limit)
}
