//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `GET  /health`  - Health check: store, cache, rate limiter (not rate limited)
//! - `/api/v1/*`     - REST API (rate limited per client)
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging
//! - **Path normalization** - Trailing slash handling

use crate::api;
use crate::api::handlers::health_handler;
use crate::api::middleware::tracing;
use crate::state::AppState;
use axum::Router;
use axum::routing::get;
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};

/// Constructs the application router with all routes and middleware.
///
/// The router must be served with
/// `into_make_service_with_connect_info::<SocketAddr>()`: handlers read the
/// peer address to identify clients.
pub fn app_router(state: AppState) -> NormalizePath<Router> {
    let router = Router::new()
        .route("/health", get(health_handler))
        .nest("/api/v1", api::routes::routes())
        .with_state(state)
        .layer(tracing::layer());

    NormalizePathLayer::trim_trailing_slash().layer(router)
}
