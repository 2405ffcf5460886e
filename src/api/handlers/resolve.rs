//! Handler for short code resolution.

use axum::{
    Json,
    extract::{ConnectInfo, Path, State},
    http::HeaderMap,
};
use std::net::SocketAddr;

use crate::api::dto::resolve::ResolveResponse;
use crate::error::AppError;
use crate::state::AppState;
use crate::utils::client_ip::client_identity;

/// Returns the long URL behind a short code.
///
/// # Endpoint
///
/// `GET /api/v1/{short_url}`
///
/// # Request Flow
///
/// 1. Admission check for the client identity (denied requests stop here)
/// 2. Cache lookup
/// 3. On miss or cache error, store lookup and cache write-back
///
/// # Errors
///
/// Returns 404 Not Found if the short code doesn't exist.
/// Returns 429 Too Many Requests if the client is over its rate.
/// Returns 503 Service Unavailable if the store cannot be reached.
pub async fn resolve_handler(
    Path(short_url): Path<String>,
    State(state): State<AppState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
) -> Result<Json<ResolveResponse>, AppError> {
    let identity = client_identity(&headers, addr, state.behind_proxy);

    let long_url = state.gateway.handle_resolve(&identity, &short_url).await?;

    Ok(Json(ResolveResponse { long_url }))
}
