//! Shared application state injected into handlers.

use std::sync::Arc;

use crate::application::services::ResolutionGateway;
use crate::infrastructure::cache::CacheService;

/// State shared by every request handler.
///
/// Cheap to clone: all fields are reference counted or `Copy`.
#[derive(Clone)]
pub struct AppState {
    pub gateway: Arc<ResolutionGateway>,
    pub cache: Arc<dyn CacheService>,
    /// Read client identity from forwarding headers instead of the socket peer.
    pub behind_proxy: bool,
}

impl AppState {
    pub fn new(
        gateway: Arc<ResolutionGateway>,
        cache: Arc<dyn CacheService>,
        behind_proxy: bool,
    ) -> Self {
        Self {
            gateway,
            cache,
            behind_proxy,
        }
    }
}
