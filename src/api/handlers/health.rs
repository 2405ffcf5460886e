//! Handler for health check endpoint.

use axum::{Json, extract::State, http::StatusCode};

use crate::api::dto::health::{CheckStatus, HealthChecks, HealthResponse};
use crate::state::AppState;

/// Returns service health status with component checks.
///
/// # Endpoint
///
/// `GET /health` (not rate limited)
///
/// # Response Codes
///
/// - **200 OK**: The store answers. A failing cache only marks the service `degraded`,
///   since resolution falls back to the store.
/// - **503 Service Unavailable**: The store does not answer
///
/// # Response
///
/// ```json
/// {
///   "status": "healthy",
///   "version": "0.1.0",
///   "checks": {
///     "store": { "status": "ok", "message": "PostgreSQL connected" },
///     "cache": { "status": "ok", "message": "redis backend connected" },
///     "rate_limiter": { "status": "ok", "message": "Tracking 3 clients (2/s, burst 4)" }
///   }
/// }
/// ```
pub async fn health_handler(
    State(state): State<AppState>,
) -> Result<Json<HealthResponse>, (StatusCode, Json<HealthResponse>)> {
    let store_check = check_store(&state).await;

    let cache_check = check_cache(&state).await;

    let limiter_check = check_rate_limiter(&state);

    let store_ok = store_check.is_ok();
    let status = match (store_ok, cache_check.is_ok()) {
        (true, true) => "healthy",
        (true, false) => "degraded",
        (false, _) => "unhealthy",
    };

    let response = HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        checks: HealthChecks {
            store: store_check,
            cache: cache_check,
            rate_limiter: limiter_check,
        },
    };

    if store_ok {
        Ok(Json(response))
    } else {
        Err((StatusCode::SERVICE_UNAVAILABLE, Json(response)))
    }
}

async fn check_store(state: &AppState) -> CheckStatus {
    if state.gateway.resolver().store_healthy().await {
        CheckStatus::ok("Store connected")
    } else {
        CheckStatus::error("Store connection failed")
    }
}

async fn check_cache(state: &AppState) -> CheckStatus {
    let backend = state.cache.backend();
    if state.cache.health_check().await {
        CheckStatus::ok(format!("{} backend connected", backend))
    } else {
        CheckStatus::error(format!("{} backend unreachable", backend))
    }
}

/// Reports how many client buckets are currently held in memory.
fn check_rate_limiter(state: &AppState) -> CheckStatus {
    let registry = state.gateway.registry();
    let policy = registry.policy();
    CheckStatus::ok(format!(
        "Tracking {} clients ({}/s, burst {})",
        registry.tracked_clients(),
        policy.per_second,
        policy.burst
    ))
}
